//! Linear algebra used by the estimators.
//!
//! Checked matrix operations, closed form inversion and reciprocal condition checks.

pub mod inverse;
pub mod matrix;
pub mod rcond;

pub use inverse::inverse;
pub use matrix::{
    add, add_vector, diagonal, identity, multiply, multiply_vector, quadform_tr, subtract, subtract_vector, transpose,
    transpose_in_place,
};
