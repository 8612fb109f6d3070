#![allow(non_snake_case)]

//! Discrete linear Kalman filter.
//!
//! A [`StateSpaceFilter`] using the canonical discrete time prediction and correction equations on the
//! Kalman state x,X. The Kalman gain is refreshed by every prediction, a correction uses the gain of the
//! preceding prediction.
//!
//! [`StateSpaceFilter`]: ../filter/trait.StateSpaceFilter.html

use std::marker::PhantomData;

use na::{allocator::Allocator, DefaultAllocator, Dim, MatrixN, RealField, VectorN};
use nalgebra as na;

use crate::error::FilterError;
use crate::estimators::filter::{FilterCore, StateSpaceFilter};
use crate::linalg::{add, add_vector, identity, inverse, multiply, multiply_vector, subtract, transpose};
use crate::models::{Innovation, LinearObserveModel, MeasurementVector, StateVector};
use crate::noise::CorrelatedNoise;

/// Covariance correction form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CovarianceUpdate {
    /// X = (I - W.Hx).X
    Standard,
    /// X = (I - W.Hx).X'
    ///
    /// Identical to `Standard` for a symmetric X, it differs only by the rounding asymmetry of X.
    TransposedPrior,
}

impl Default for CovarianceUpdate {
    fn default() -> Self {
        CovarianceUpdate::Standard
    }
}

/// Discrete Kalman filter over a domain State `S` and Measurement `Z`.
#[derive(Clone, Debug)]
pub struct DiscreteKalmanFilter<N: RealField, D: Dim, ZD: Dim, CD: Dim, S, Z>
where
    DefaultAllocator: Allocator<N, D, D>
        + Allocator<N, D>
        + Allocator<N, ZD, ZD>
        + Allocator<N, ZD, D>
        + Allocator<N, D, ZD>
        + Allocator<N, D, CD>,
{
    core: FilterCore<N, D, ZD, CD>,
    covariance_update: CovarianceUpdate,
    _domain: PhantomData<fn() -> (S, Z)>,
}

impl<N: RealField, D: Dim, ZD: Dim, CD: Dim, S, Z> DiscreteKalmanFilter<N, D, ZD, CD, S, Z>
where
    S: StateVector<N, D>,
    DefaultAllocator: Allocator<N, D, D>
        + Allocator<N, D>
        + Allocator<N, ZD, ZD>
        + Allocator<N, ZD, D>
        + Allocator<N, D, ZD>
        + Allocator<N, D, CD>,
{
    pub fn new(initial_state: &S, initial_covariance: MatrixN<N, D>, measurement_dim: ZD, control_dim: CD) -> Result<Self, FilterError> {
        let core = FilterCore::new(initial_state, initial_covariance, measurement_dim, control_dim)?;
        tracing::debug!(
            state_dim = core.state_dimension(),
            measurement_dim = core.measurement_dimension(),
            control_dim = core.control_dimension(),
            "discrete kalman filter created"
        );
        Ok(DiscreteKalmanFilter {
            core,
            covariance_update: CovarianceUpdate::default(),
            _domain: PhantomData,
        })
    }

    pub fn with_covariance_update(mut self, update: CovarianceUpdate) -> Self {
        self.covariance_update = update;
        self
    }

    pub fn covariance_update(&self) -> CovarianceUpdate {
        self.covariance_update
    }

    pub fn set_covariance_update(&mut self, update: CovarianceUpdate) {
        self.covariance_update = update;
    }
}

/// Innovation covariance, its inverse and the gain for the predicted covariance X.
fn innovation<N: RealField, D: Dim, ZD: Dim>(
    X: &MatrixN<N, D>,
    obs: &LinearObserveModel<N, D, ZD>,
    noise: &CorrelatedNoise<N, ZD>,
) -> Result<Innovation<N, D, ZD>, FilterError>
where
    DefaultAllocator: Allocator<N, D, D> + Allocator<N, ZD, ZD> + Allocator<N, ZD, D> + Allocator<N, D, ZD>,
{
    let XHt = multiply(X, &transpose(&obs.Hx))?;
    // S = Hx.X.Hx' + R
    let S = add(&multiply(&obs.Hx, &XHt)?, &noise.Q)?;
    // Inverse innovation covariance
    let SI = inverse(&S)?;
    // Kalman gain, X*Hx'*SI
    let W = multiply(&XHt, &SI)?;

    Ok(Innovation { S, SI, W })
}

impl<N: RealField, D: Dim, ZD: Dim, CD: Dim, S, Z> StateSpaceFilter<N, D, ZD, CD> for DiscreteKalmanFilter<N, D, ZD, CD, S, Z>
where
    S: StateVector<N, D>,
    Z: MeasurementVector<N, ZD>,
    DefaultAllocator: Allocator<N, D, D>
        + Allocator<N, D>
        + Allocator<N, ZD, ZD>
        + Allocator<N, ZD, D>
        + Allocator<N, D, ZD>
        + Allocator<N, D, CD>
        + Allocator<N, ZD>
        + Allocator<N, CD>,
{
    type State = S;
    type Measurement = Z;

    fn core(&self) -> &FilterCore<N, D, ZD, CD> {
        &self.core
    }

    fn core_mut(&mut self) -> &mut FilterCore<N, D, ZD, CD> {
        &mut self.core
    }

    fn predict_step(&mut self, u: Option<&VectorN<N, CD>>) -> Result<(), FilterError> {
        let core = &self.core;
        let pred = &core.predict;

        // x = Fx.x + Bu.u
        let mut x = multiply_vector(&pred.Fx, &core.state.x)?;
        if let Some(u) = u {
            x = add_vector(&x, &multiply_vector(&pred.Bu, u)?)?;
        }
        // X = Fx.X.Fx' + Q
        let X = add(&multiply(&multiply(&pred.Fx, &core.state.X)?, &transpose(&pred.Fx))?, &core.process_noise.Q)?;
        let innovation = innovation(&X, &core.observe, &core.measurement_noise)?;

        let core = &mut self.core;
        core.state.x = x;
        core.state.X = X;
        core.innovation = innovation;
        Ok(())
    }

    fn correct_step(&mut self, z: &VectorN<N, ZD>) -> Result<(), FilterError> {
        let core = &self.core;
        let W = &core.innovation.W;

        let s = core.calculate_delta(z)?;
        // State update
        let x = add_vector(&core.state.x, &multiply_vector(W, &s)?)?;
        // X = (I - W.Hx).X
        let IWH = subtract(&identity(core.state_dim()), &multiply(W, &core.observe.Hx)?)?;
        let X = match self.covariance_update {
            CovarianceUpdate::Standard => multiply(&IWH, &core.state.X)?,
            CovarianceUpdate::TransposedPrior => multiply(&IWH, &transpose(&core.state.X))?,
        };

        let core = &mut self.core;
        core.state.x = x;
        core.state.X = X;
        Ok(())
    }
}
