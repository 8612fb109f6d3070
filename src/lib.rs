//!
//! Keypoint+Estimate the keypoint smoothing library.
//! Copyright (c) 2020 Michael Stevens
//!
//! Pose estimation models report the 3D position of each skeleton joint frame by frame. The raw positions jitter
//! from frame to frame and drop out when a joint is occluded. This library smooths such keypoint streams.
//!
//! A generic linear state space engine with a discrete Kalman filter implementation sits at the bottom.
//! A constant velocity 3D motion model specialises it to a single tracked point, and a per keypoint facade adds a
//! warm-up period before the filtered output is trusted. Two lighter smoothing filters complement it: an adaptive
//! one euro filter and a cascaded low pass filter. The [`pipeline`] module runs a whole skeleton through them.
//!
//! Prediction and observation models are represented by structs of matrices, state representation by [`KalmanState`].
//! Estimators implement the [`StateSpaceFilter`] trait and provide the numerical implementation of the operations.
//!
//! # Licensing
//!
//! All source code files are copyright with the license conditions as given here. The copyright notice is that of the MIT license.
//!  This in no way restricts any commercial use you may wish to make using our source code.
//!  As long as you respect the copyright and license conditions, Michael Stevens is happy to for you to use it in any way you wish.
//!
//! Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction,
//! including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software,
//! and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
//!
//! The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
//!
//! THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
//! FITNESS FOR A PARTICULAR PURPOSE AND NON INFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY,
//! WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
//!
//! [`KalmanState`]: models/struct.KalmanState.html
//! [`StateSpaceFilter`]: estimators/filter/trait.StateSpaceFilter.html

pub mod config;
pub mod error;
pub mod estimators;
pub mod linalg;
pub mod models;
pub mod motion;
pub mod noise;
pub mod pipeline;
pub mod smoothing;

pub use config::{KalmanConfig, LowPassConfig, OneEuroConfig, SmoothingConfig};
pub use error::FilterError;
pub use estimators::discrete::{CovarianceUpdate, DiscreteKalmanFilter};
pub use estimators::filter::{FilterCore, StateSpaceFilter};
pub use motion::ConstantVelocity3d;
pub use pipeline::{ImageRotation, KeyPoint, KeypointSmoother, PoseSink};
pub use smoothing::{KalmanKeypointFilter, LowPassFilter, OneEuroFilter};
