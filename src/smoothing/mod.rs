//! Per keypoint smoothing filters.
//!
//! The Kalman keypoint filter and the cascaded low pass filter gate their output with a warm-up period,
//! the one euro filter is valid from its first sample.

pub mod keypoint;
pub mod low_pass;
pub mod one_euro;
pub mod warm_up;

pub use keypoint::{KalmanKeypointFilter, KALMAN_WARM_UP};
pub use low_pass::{LowPassFilter, LOW_PASS_WARM_UP};
pub use one_euro::OneEuroFilter;
pub use warm_up::{WarmUp, WarmUpGate};
