#![allow(non_snake_case)]

//! Estimation models.
//!
//! State representations and linear system models are structs.
//! The conversion between a domain State or Measurement and its numeric vector is defined as traits,
//! so an estimator is parameterised by the domain types it filters.

use na::{allocator::Allocator, DefaultAllocator, Dim, MatrixMN, MatrixN, RealField, VectorN, U1};
use nalgebra as na;

/// Kalman State.
///
/// Linear representation as a state vector and the state covariance (symmetric positive semi-definite) matrix.
#[derive(PartialEq, Clone, Debug)]
pub struct KalmanState<N: RealField, D: Dim>
where
    DefaultAllocator: Allocator<N, D, D> + Allocator<N, D>,
{
    /// State vector
    pub x: VectorN<N, D>,
    /// State covariance matrix (symmetric positive semi-definite)
    pub X: MatrixN<N, D>,
}

impl<N: RealField, D: Dim> KalmanState<N, D>
where
    DefaultAllocator: Allocator<N, D, D> + Allocator<N, D>,
{
    pub fn new_zero(d: D) -> KalmanState<N, D> {
        KalmanState {
            x: VectorN::zeros_generic(d, U1),
            X: MatrixN::zeros_generic(d, d),
        }
    }
}

/// Conversion between a domain state and its state vector.
///
/// `from_vector(&s.to_vector())` must reproduce `s`.
pub trait StateVector<N: RealField, D: Dim>: Sized
where
    DefaultAllocator: Allocator<N, D>,
{
    fn to_vector(&self) -> VectorN<N, D>;

    fn from_vector(x: &VectorN<N, D>) -> Self;
}

/// Conversion of a domain measurement to its measurement vector.
pub trait MeasurementVector<N: RealField, ZD: Dim>
where
    DefaultAllocator: Allocator<N, ZD>,
{
    fn to_vector(&self) -> VectorN<N, ZD>;
}

impl<N: RealField, D: Dim> StateVector<N, D> for VectorN<N, D>
where
    DefaultAllocator: Allocator<N, D>,
{
    fn to_vector(&self) -> VectorN<N, D> {
        self.clone()
    }

    fn from_vector(x: &VectorN<N, D>) -> Self {
        x.clone()
    }
}

impl<N: RealField, ZD: Dim> MeasurementVector<N, ZD> for VectorN<N, ZD>
where
    DefaultAllocator: Allocator<N, ZD>,
{
    fn to_vector(&self) -> VectorN<N, ZD> {
        self.clone()
    }
}

/// Linear prediction model.
///
/// Prediction is represented by a state transition matrix and a control input matrix.
#[derive(PartialEq, Clone, Debug)]
pub struct LinearPredictModel<N: RealField, D: Dim, CD: Dim>
where
    DefaultAllocator: Allocator<N, D, D> + Allocator<N, D, CD>,
{
    /// State transition matrix
    pub Fx: MatrixN<N, D>,
    /// Control input matrix
    pub Bu: MatrixMN<N, D, CD>,
}

impl<N: RealField, D: Dim, CD: Dim> LinearPredictModel<N, D, CD>
where
    DefaultAllocator: Allocator<N, D, D> + Allocator<N, D, CD>,
{
    /// Identity transition without control input.
    pub fn new_identity(d: D, cd: CD) -> Self {
        LinearPredictModel {
            Fx: MatrixN::identity_generic(d, d),
            Bu: MatrixMN::zeros_generic(d, cd),
        }
    }
}

/// Linear observation model.
///
/// Observation is represented by an observation matrix.
#[derive(PartialEq, Clone, Debug)]
pub struct LinearObserveModel<N: RealField, D: Dim, ZD: Dim>
where
    DefaultAllocator: Allocator<N, ZD, D>,
{
    /// Observation matrix
    pub Hx: MatrixMN<N, ZD, D>,
}

impl<N: RealField, D: Dim, ZD: Dim> LinearObserveModel<N, D, ZD>
where
    DefaultAllocator: Allocator<N, ZD, D>,
{
    /// Observes the leading `zd` state elements.
    pub fn new_identity(d: D, zd: ZD) -> Self {
        LinearObserveModel {
            Hx: MatrixMN::identity_generic(zd, d),
        }
    }
}

/// Innovation statistics of the last gain update.
///
/// Residual covariance S, its inverse and the Kalman gain W.
#[derive(PartialEq, Clone, Debug)]
pub struct Innovation<N: RealField, D: Dim, ZD: Dim>
where
    DefaultAllocator: Allocator<N, ZD, ZD> + Allocator<N, D, ZD>,
{
    /// Residual covariance
    pub S: MatrixN<N, ZD>,
    /// Inverse residual covariance
    pub SI: MatrixN<N, ZD>,
    /// Kalman gain
    pub W: MatrixMN<N, D, ZD>,
}

impl<N: RealField, D: Dim, ZD: Dim> Innovation<N, D, ZD>
where
    DefaultAllocator: Allocator<N, ZD, ZD> + Allocator<N, D, ZD>,
{
    pub fn new_zero(d: D, zd: ZD) -> Self {
        Innovation {
            S: MatrixN::zeros_generic(zd, zd),
            SI: MatrixN::zeros_generic(zd, zd),
            W: MatrixMN::zeros_generic(d, zd),
        }
    }
}
