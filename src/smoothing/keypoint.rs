#![allow(non_snake_case)]

//! Kalman filter of a single tracked 3D keypoint.
//!
//! Wires the [`DiscreteKalmanFilter`] to the [`ConstantVelocity3d`] model and gates its output with a
//! warm-up period. Each frame the host calls [`KalmanKeypointFilter::correct_and_predict`] with the raw
//! observed position and receives either that raw position (warm-up) or the predicted position.
//!
//! [`DiscreteKalmanFilter`]: ../../estimators/discrete/struct.DiscreteKalmanFilter.html
//! [`ConstantVelocity3d`]: ../../motion/struct.ConstantVelocity3d.html

use na::{Vector3, U0, U3, U6};
use nalgebra as na;

use crate::config::KalmanConfig;
use crate::error::FilterError;
use crate::estimators::discrete::DiscreteKalmanFilter;
use crate::estimators::filter::StateSpaceFilter;
use crate::linalg::diagonal;
use crate::motion::ConstantVelocity3d;
use crate::noise::{CorrelatedNoise, UncorrelatedNoise};
use crate::smoothing::warm_up::{WarmUp, WarmUpGate};

/// Calls passed through raw after construction or a parameter update.
pub const KALMAN_WARM_UP: u32 = 50;

/// Discrete Kalman filter of a constant velocity point observed by position, without control input.
pub type PointKalmanFilter = DiscreteKalmanFilter<f32, U6, U3, U0, ConstantVelocity3d<f32>, Vector3<f32>>;

#[derive(Clone, Debug)]
pub struct KalmanKeypointFilter {
    filter: PointKalmanFilter,
    config: KalmanConfig,
    gate: WarmUpGate,
}

impl KalmanKeypointFilter {
    pub fn new(time_interval: f32, noise: f32) -> Result<Self, FilterError> {
        Self::with_config(KalmanConfig::new(time_interval, noise))
    }

    /// Starts at rest at the origin and makes one prediction so the gain is valid for the first correction.
    pub fn with_config(config: KalmanConfig) -> Result<Self, FilterError> {
        let X = diagonal(U6, config.initial_uncertainty);
        let mut filter = PointKalmanFilter::new(&ConstantVelocity3d::zero(), X, U3, U0)?
            .with_covariance_update(config.covariance_update);

        let core = filter.core_mut();
        core.process_noise = ConstantVelocity3d::process_noise(config.noise, config.time_interval);
        core.observe.Hx = ConstantVelocity3d::position_measurement_matrix();
        core.predict.Fx = ConstantVelocity3d::transition_matrix(config.time_interval);
        core.measurement_noise = CorrelatedNoise::from_uncorrelated(&UncorrelatedNoise::isotropic(U3, config.measurement_noise));
        filter.predict(None)?;

        tracing::debug!(
            time_interval = config.time_interval,
            noise = config.noise,
            measurement_noise = config.measurement_noise,
            "keypoint kalman filter created"
        );
        Ok(KalmanKeypointFilter {
            filter,
            config,
            gate: WarmUpGate::new(KALMAN_WARM_UP),
        })
    }

    pub fn correct(&mut self, observed: &Vector3<f32>) -> Result<(), FilterError> {
        self.filter.correct(observed)
    }

    pub fn predict(&mut self) -> Result<(), FilterError> {
        self.filter.predict(None)
    }

    /// Correct with the observed position then predict.
    ///
    /// During warm-up the observed position is returned unmodified, afterwards the predicted position.
    /// On error the filter is left as it was before the call.
    pub fn correct_and_predict(&mut self, observed: &Vector3<f32>) -> Result<Vector3<f32>, FilterError> {
        let mut next = self.filter.clone();
        next.correct(observed)?;
        next.predict(None)?;
        self.filter = next;
        if self.gate.pass_through() {
            Ok(*observed)
        } else {
            Ok(self.position())
        }
    }

    /// Recompute the process noise and transition for a new sampling interval and noise level.
    ///
    /// The state is kept, the warm-up restarts from zero.
    pub fn update_filter_parameter(&mut self, time_interval: f32, noise: f32) {
        let core = self.filter.core_mut();
        core.process_noise = ConstantVelocity3d::process_noise(noise, time_interval);
        core.predict.Fx = ConstantVelocity3d::transition_matrix(time_interval);
        self.config.time_interval = time_interval;
        self.config.noise = noise;
        self.gate.reset();
        tracing::debug!(time_interval, noise, "keypoint kalman parameters updated");
    }

    /// Estimated position.
    pub fn position(&self) -> Vector3<f32> {
        self.filter.state().position
    }

    pub fn state(&self) -> ConstantVelocity3d<f32> {
        self.filter.state()
    }

    pub fn warm_up(&self) -> WarmUp {
        self.gate.phase()
    }

    pub fn config(&self) -> &KalmanConfig {
        &self.config
    }

    pub fn filter(&self) -> &PointKalmanFilter {
        &self.filter
    }
}
