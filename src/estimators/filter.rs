#![allow(non_snake_case)]

//! Generic state space filter engine.
//!
//! [`FilterCore`] holds the numeric state, the linear system configuration and the innovation statistics.
//! [`StateSpaceFilter`] is the conversion boundary between the domain State / Measurement types and their
//! vectors. It defines the filter lifecycle but no numerical algorithm, implementations supply
//! `predict_step` and `correct_step`.

use na::storage::Storage;
use na::{allocator::Allocator, DefaultAllocator, Dim, MatrixMN, MatrixN, RealField, VectorN};
use nalgebra as na;

use crate::error::FilterError;
use crate::linalg::rcond::{check_non_negative, rcond_symmetric};
use crate::linalg::{multiply_vector, subtract_vector};
use crate::models::{Innovation, KalmanState, LinearObserveModel, LinearPredictModel, MeasurementVector, StateVector};
use crate::noise::CorrelatedNoise;

/// Numeric state and configuration shared by all state space filters.
///
/// The linear system (`predict`, `process_noise`, `observe`, `measurement_noise`) is caller configurable
/// and should be set before the first prediction. The innovation statistics are derived by the filter.
#[derive(Clone, Debug)]
pub struct FilterCore<N: RealField, D: Dim, ZD: Dim, CD: Dim>
where
    DefaultAllocator: Allocator<N, D, D>
        + Allocator<N, D>
        + Allocator<N, ZD, ZD>
        + Allocator<N, ZD, D>
        + Allocator<N, D, ZD>
        + Allocator<N, D, CD>,
{
    pub(crate) state: KalmanState<N, D>,
    pub(crate) innovation: Innovation<N, D, ZD>,
    /// Transition matrix Fx and control matrix Bu
    pub predict: LinearPredictModel<N, D, CD>,
    /// Process noise Q
    pub process_noise: CorrelatedNoise<N, D>,
    /// Measurement matrix Hx
    pub observe: LinearObserveModel<N, D, ZD>,
    /// Measurement noise R
    pub measurement_noise: CorrelatedNoise<N, ZD>,
    d: D,
    zd: ZD,
    cd: CD,
}

impl<N: RealField, D: Dim, ZD: Dim, CD: Dim> FilterCore<N, D, ZD, CD>
where
    DefaultAllocator: Allocator<N, D, D>
        + Allocator<N, D>
        + Allocator<N, ZD, ZD>
        + Allocator<N, ZD, D>
        + Allocator<N, D, ZD>
        + Allocator<N, D, CD>,
{
    /// The state dimension is that of the converted initial state.
    ///
    /// The linear system starts as an identity transition without control, zero process noise,
    /// observation of the leading state elements and identity measurement noise.
    pub fn new<S: StateVector<N, D>>(
        initial_state: &S,
        initial_covariance: MatrixN<N, D>,
        measurement_dim: ZD,
        control_dim: CD,
    ) -> Result<Self, FilterError> {
        let x = initial_state.to_vector();
        let d = x.data.shape().0;
        let n = x.nrows();
        if initial_covariance.shape() != (n, n) {
            return Err(FilterError::shape((n, n), initial_covariance.shape()));
        }
        check_non_negative(rcond_symmetric(&initial_covariance), "initial covariance")?;

        Ok(FilterCore {
            state: KalmanState {
                x,
                X: initial_covariance,
            },
            innovation: Innovation::new_zero(d, measurement_dim),
            predict: LinearPredictModel::new_identity(d, control_dim),
            process_noise: CorrelatedNoise {
                Q: MatrixN::zeros_generic(d, d),
            },
            observe: LinearObserveModel::new_identity(d, measurement_dim),
            measurement_noise: CorrelatedNoise {
                Q: MatrixN::identity_generic(measurement_dim, measurement_dim),
            },
            d,
            zd: measurement_dim,
            cd: control_dim,
        })
    }

    /// Innovation `z - Hx.x` of a measurement vector.
    pub fn calculate_delta(&self, z: &VectorN<N, ZD>) -> Result<VectorN<N, ZD>, FilterError>
    where
        DefaultAllocator: Allocator<N, ZD>,
    {
        if z.nrows() != self.zd.value() {
            return Err(FilterError::shape((self.zd.value(), 1), z.shape()));
        }
        let predicted = multiply_vector(&self.observe.Hx, &self.state.x)?;
        subtract_vector(z, &predicted)
    }

    pub fn kalman_state(&self) -> &KalmanState<N, D> {
        &self.state
    }

    pub fn state_vector(&self) -> &VectorN<N, D> {
        &self.state.x
    }

    pub fn estimate_covariance(&self) -> &MatrixN<N, D> {
        &self.state.X
    }

    pub fn kalman_gain(&self) -> &MatrixMN<N, D, ZD> {
        &self.innovation.W
    }

    pub fn residual_covariance(&self) -> &MatrixN<N, ZD> {
        &self.innovation.S
    }

    pub fn residual_covariance_inv(&self) -> &MatrixN<N, ZD> {
        &self.innovation.SI
    }

    pub fn state_dim(&self) -> D {
        self.d
    }

    pub fn measurement_dim(&self) -> ZD {
        self.zd
    }

    pub fn control_dim(&self) -> CD {
        self.cd
    }

    pub fn state_dimension(&self) -> usize {
        self.d.value()
    }

    pub fn measurement_dimension(&self) -> usize {
        self.zd.value()
    }

    pub fn control_dimension(&self) -> usize {
        self.cd.value()
    }
}

/// A state space filter over a domain State and Measurement type.
///
/// Call order is one `predict` before the first `correct`, then repeated `correct`, `predict` pairs.
/// The gain used by `correct` is that computed by the preceding `predict`.
pub trait StateSpaceFilter<N: RealField, D: Dim, ZD: Dim, CD: Dim>
where
    DefaultAllocator: Allocator<N, D, D>
        + Allocator<N, D>
        + Allocator<N, ZD, ZD>
        + Allocator<N, ZD, D>
        + Allocator<N, D, ZD>
        + Allocator<N, D, CD>
        + Allocator<N, ZD>
        + Allocator<N, CD>,
{
    type State: StateVector<N, D>;
    type Measurement: MeasurementVector<N, ZD>;

    fn core(&self) -> &FilterCore<N, D, ZD, CD>;

    fn core_mut(&mut self) -> &mut FilterCore<N, D, ZD, CD>;

    /// Numerical prediction, with an optional control vector of the control dimension.
    fn predict_step(&mut self, u: Option<&VectorN<N, CD>>) -> Result<(), FilterError>;

    /// Numerical correction with a measurement vector of the measurement dimension.
    fn correct_step(&mut self, z: &VectorN<N, ZD>) -> Result<(), FilterError>;

    fn predict(&mut self, u: Option<&VectorN<N, CD>>) -> Result<(), FilterError> {
        if let Some(u) = u {
            let cd = self.core().control_dimension();
            if u.nrows() != cd {
                return Err(FilterError::shape((cd, 1), u.shape()));
            }
        }
        self.predict_step(u)
    }

    fn correct(&mut self, measurement: &Self::Measurement) -> Result<(), FilterError> {
        let z = measurement.to_vector();
        let zd = self.core().measurement_dimension();
        if z.nrows() != zd {
            return Err(FilterError::shape((zd, 1), z.shape()));
        }
        self.correct_step(&z)
    }

    /// Innovation of a domain measurement against the current state.
    fn calculate_delta(&self, measurement: &Self::Measurement) -> Result<VectorN<N, ZD>, FilterError> {
        self.core().calculate_delta(&measurement.to_vector())
    }

    /// The filter's estimate as a domain State.
    fn state(&self) -> Self::State {
        <Self::State as StateVector<N, D>>::from_vector(self.core().state_vector())
    }
}
