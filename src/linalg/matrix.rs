#![allow(non_snake_case)]

//! Small dense matrix and vector algebra.
//!
//! Thin checked wrappers over nalgebra operators. Fixed dimensions are verified by the type system,
//! `Dynamic` dimensions are verified here so a mismatch is reported as [`FilterError::DimensionMismatch`]
//! instead of a panic inside nalgebra.

use na::storage::{Storage, StorageMut};
use na::{allocator::Allocator, DefaultAllocator, Dim, Matrix, MatrixMN, MatrixN, RealField, SquareMatrix, Vector, VectorN};
use na::constraint::{DimEq, ShapeConstraint};
use nalgebra as na;

use crate::error::FilterError;

fn check_shape(expected: (usize, usize), actual: (usize, usize)) -> Result<(), FilterError> {
    if expected == actual {
        Ok(())
    } else {
        Err(FilterError::shape(expected, actual))
    }
}

/// Element wise sum `a + b`.
pub fn add<N: RealField, R: Dim, C: Dim>(a: &MatrixMN<N, R, C>, b: &MatrixMN<N, R, C>) -> Result<MatrixMN<N, R, C>, FilterError>
where
    DefaultAllocator: Allocator<N, R, C>,
{
    check_shape(a.shape(), b.shape())?;
    Ok(a + b)
}

/// Element wise difference `a - b`.
pub fn subtract<N: RealField, R: Dim, C: Dim>(a: &MatrixMN<N, R, C>, b: &MatrixMN<N, R, C>) -> Result<MatrixMN<N, R, C>, FilterError>
where
    DefaultAllocator: Allocator<N, R, C>,
{
    check_shape(a.shape(), b.shape())?;
    Ok(a - b)
}

/// Matrix product `a * b`.
pub fn multiply<N: RealField, R1: Dim, C1: Dim, C2: Dim>(
    a: &MatrixMN<N, R1, C1>,
    b: &MatrixMN<N, C1, C2>,
) -> Result<MatrixMN<N, R1, C2>, FilterError>
where
    DefaultAllocator: Allocator<N, R1, C1> + Allocator<N, C1, C2> + Allocator<N, R1, C2>,
{
    if a.ncols() != b.nrows() {
        return Err(FilterError::shape((a.ncols(), b.ncols()), b.shape()));
    }
    Ok(a * b)
}

/// Matrix vector product `a * v`.
pub fn multiply_vector<N: RealField, R: Dim, C: Dim>(a: &MatrixMN<N, R, C>, v: &VectorN<N, C>) -> Result<VectorN<N, R>, FilterError>
where
    DefaultAllocator: Allocator<N, R, C> + Allocator<N, C> + Allocator<N, R>,
{
    check_shape((a.ncols(), 1), v.shape())?;
    Ok(a * v)
}

/// Element wise vector sum `a + b`.
pub fn add_vector<N: RealField, D: Dim>(a: &VectorN<N, D>, b: &VectorN<N, D>) -> Result<VectorN<N, D>, FilterError>
where
    DefaultAllocator: Allocator<N, D>,
{
    add(a, b)
}

/// Element wise vector difference `a - b`.
pub fn subtract_vector<N: RealField, D: Dim>(a: &VectorN<N, D>, b: &VectorN<N, D>) -> Result<VectorN<N, D>, FilterError>
where
    DefaultAllocator: Allocator<N, D>,
{
    subtract(a, b)
}

/// Transpose into a new matrix.
pub fn transpose<N: RealField, R: Dim, C: Dim>(a: &MatrixMN<N, R, C>) -> MatrixMN<N, C, R>
where
    DefaultAllocator: Allocator<N, R, C> + Allocator<N, C, R>,
{
    a.transpose()
}

/// Transpose in place, only square matrices can be transposed in place.
pub fn transpose_in_place<N: RealField, R: Dim, C: Dim>(a: &mut MatrixMN<N, R, C>) -> Result<(), FilterError>
where
    DefaultAllocator: Allocator<N, R, C>,
{
    let (rows, cols) = a.shape();
    if rows != cols {
        return Err(FilterError::shape((rows, rows), (rows, cols)));
    }
    for i in 0..rows {
        for j in (i + 1)..cols {
            let t = a[(i, j)];
            a[(i, j)] = a[(j, i)];
            a[(j, i)] = t;
        }
    }
    Ok(())
}

/// Identity matrix of dimension `d`.
pub fn identity<N: RealField, D: Dim>(d: D) -> MatrixN<N, D>
where
    DefaultAllocator: Allocator<N, D, D>,
{
    MatrixN::identity_generic(d, d)
}

/// Diagonal matrix of dimension `d` with `value` on the diagonal.
pub fn diagonal<N: RealField, D: Dim>(d: D, value: N) -> MatrixN<N, D>
where
    DefaultAllocator: Allocator<N, D, D>,
{
    MatrixN::from_diagonal_element_generic(d, d, value)
}

/// Computes the quadratic form `self = alpha * lhs * mid * lhs.transpose() + beta * self`.
///
/// 'mid' is a diagonal matrix represented by a Vector.
pub fn quadform_tr<N: RealField, D1, S, R3, C3, S3, D4, S4>(
    mat: &mut SquareMatrix<N, D1, S>,
    alpha: N,
    lhs: &Matrix<N, R3, C3, S3>,
    mid: &Vector<N, D4, S4>,
    beta: N,
) where
    D1: Dim,
    S: StorageMut<N, D1, D1>,
    R3: Dim,
    C3: Dim,
    D4: Dim,
    S3: Storage<N, R3, C3>,
    S4: Storage<N, D4>,
    ShapeConstraint: DimEq<D1, R3> + DimEq<C3, D4>,
{
    if mid.nrows() == 0 {
        *mat *= beta;
        return;
    }

    mat.ger(alpha * mid[0], &lhs.column(0), &lhs.column(0), beta);

    for j in 1..mid.nrows() {
        mat.ger(alpha * mid[j], &lhs.column(j), &lhs.column(j), N::one());
    }
}
