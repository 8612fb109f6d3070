//! Closed form matrix inversion.
//!
//! Only 2x2 and 3x3 matrices are supported, using the cofactor / determinant method.
//! There is no pseudo inverse or regularisation fallback, a singular matrix is an error.
//! Callers keep the matrices well conditioned with the measurement and process noise.

use na::{allocator::Allocator, DefaultAllocator, Dim, MatrixN, RealField};
use nalgebra as na;

use crate::error::FilterError;

/// Inverse of a 2x2 or 3x3 matrix.
pub fn inverse<N: RealField, D: Dim>(m: &MatrixN<N, D>) -> Result<MatrixN<N, D>, FilterError>
where
    DefaultAllocator: Allocator<N, D, D>,
{
    let (rows, cols) = m.shape();
    if rows != cols {
        return Err(FilterError::shape((rows, rows), (rows, cols)));
    }
    match rows {
        2 => inverse2(m),
        3 => inverse3(m),
        _ => Err(FilterError::UnsupportedSize { rows, cols }),
    }
}

/// The determinant is near zero relative to the largest element, or NaN.
fn is_singular<N: RealField, D: Dim>(m: &MatrixN<N, D>, det: N) -> bool
where
    DefaultAllocator: Allocator<N, D, D>,
{
    let scale = m.amax();
    let mut limit = N::default_epsilon();
    for _ in 0..m.nrows() {
        limit *= scale;
    }
    // IEC 559 NaN comparisons are never true
    !(det.abs() > limit)
}

fn inverse2<N: RealField, D: Dim>(m: &MatrixN<N, D>) -> Result<MatrixN<N, D>, FilterError>
where
    DefaultAllocator: Allocator<N, D, D>,
{
    let (a, b) = (m[(0, 0)], m[(0, 1)]);
    let (c, d) = (m[(1, 0)], m[(1, 1)]);

    let det = a * d - b * c;
    if is_singular(m, det) {
        return Err(FilterError::Singular);
    }
    let r = N::one() / det;

    let mut inv = m.clone();
    inv[(0, 0)] = r * d;
    inv[(0, 1)] = -r * b;
    inv[(1, 0)] = -r * c;
    inv[(1, 1)] = r * a;
    Ok(inv)
}

fn inverse3<N: RealField, D: Dim>(m: &MatrixN<N, D>) -> Result<MatrixN<N, D>, FilterError>
where
    DefaultAllocator: Allocator<N, D, D>,
{
    let (a, b, c) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let (d, e, f) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let (g, h, i) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

    // Cofactors of the first row
    let c00 = e * i - f * h;
    let c01 = d * i - f * g;
    let c02 = d * h - e * g;

    let det = a * c00 - b * c01 + c * c02;
    if is_singular(m, det) {
        return Err(FilterError::Singular);
    }
    let r = N::one() / det;

    let mut inv = m.clone();
    inv[(0, 0)] = r * c00;
    inv[(0, 1)] = r * (c * h - b * i);
    inv[(0, 2)] = r * (b * f - c * e);
    inv[(1, 0)] = -r * c01;
    inv[(1, 1)] = r * (a * i - c * g);
    inv[(1, 2)] = r * (c * d - a * f);
    inv[(2, 0)] = r * c02;
    inv[(2, 1)] = r * (b * g - a * h);
    inv[(2, 2)] = r * (a * e - b * d);
    Ok(inv)
}
