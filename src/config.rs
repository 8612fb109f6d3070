//! Filter configuration.
//!
//! Defaults are those the pose tracking host runs with.

use crate::estimators::discrete::CovarianceUpdate;
use crate::pipeline::ImageRotation;

/// Maximum number of stages of the cascaded low pass filter.
pub const LOW_PASS_MAX_ORDER: usize = 10;

/// Per keypoint Kalman filter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KalmanConfig {
    /// Sampling interval in seconds
    pub time_interval: f32,

    /// Acceleration variance driving the process noise
    pub noise: f32,

    /// Measurement variance, R is this times identity
    pub measurement_noise: f32,

    /// Initial position and velocity variance
    pub initial_uncertainty: f32,

    /// Covariance correction form
    pub covariance_update: CovarianceUpdate,
}

impl Default for KalmanConfig {
    fn default() -> Self {
        Self {
            time_interval: 0.45,
            noise: 0.4,
            measurement_noise: 1.0,
            initial_uncertainty: 1000.0,
            covariance_update: CovarianceUpdate::Standard,
        }
    }
}

impl KalmanConfig {
    pub fn new(time_interval: f32, noise: f32) -> Self {
        Self {
            time_interval,
            noise,
            ..Self::default()
        }
    }
}

/// Adaptive one euro filter configuration, the same on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneEuroConfig {
    /// Minimum cutoff frequency (Hz), lower is smoother at rest
    pub min_cutoff: f32,

    /// Speed coefficient, higher is less lag during fast motion
    pub beta: f32,

    /// Derivative cutoff frequency (Hz)
    pub d_cutoff: f32,
}

impl Default for OneEuroConfig {
    fn default() -> Self {
        Self {
            min_cutoff: 3.5,
            beta: 0.005,
            d_cutoff: 1.2,
        }
    }
}

/// Cascaded low pass filter configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassConfig {
    /// Number of stages, clamped to 1..=10
    pub order: usize,

    /// Weight of a stage's previous value
    pub smooth: f32,
}

impl Default for LowPassConfig {
    fn default() -> Self {
        Self { order: 7, smooth: 0.9 }
    }
}

impl LowPassConfig {
    pub fn new(order: usize, smooth: f32) -> Self {
        Self {
            order: clamp_order(order),
            smooth,
        }
    }
}

pub(crate) fn clamp_order(order: usize) -> usize {
    order.max(1).min(LOW_PASS_MAX_ORDER)
}

/// Configuration of a whole skeleton smoothing pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingConfig {
    pub kalman: KalmanConfig,
    pub kalman_enabled: bool,

    pub low_pass: LowPassConfig,
    pub low_pass_enabled: bool,

    pub one_euro: OneEuroConfig,
    pub one_euro_enabled: bool,

    /// Rotation of the camera image the keypoints were estimated from
    pub rotation: ImageRotation,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            kalman: KalmanConfig::default(),
            kalman_enabled: true,
            low_pass: LowPassConfig::default(),
            low_pass_enabled: true,
            one_euro: OneEuroConfig::default(),
            one_euro_enabled: true,
            rotation: ImageRotation::None,
        }
    }
}
