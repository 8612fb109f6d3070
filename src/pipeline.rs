//! Skeleton smoothing pipeline.
//!
//! Holds one filter of each kind per joint and runs a frame of keypoints through the enabled stages in
//! the order Kalman, low pass, one euro. The filtered positions are written back into the keypoint records
//! for the downstream retargeting, which is not part of this crate.

use nalgebra::{Vector2, Vector3};

use crate::config::{clamp_order, KalmanConfig, SmoothingConfig};
use crate::error::FilterError;
use crate::smoothing::{KalmanKeypointFilter, LowPassFilter, OneEuroFilter};

/// Joints of the pose model skeleton.
pub const DEFAULT_JOINT_COUNT: usize = 24;

/// Rotation of the camera image relative to the skeleton's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRotation {
    None,
    CounterClockwise,
    Clockwise,
}

impl Default for ImageRotation {
    fn default() -> Self {
        ImageRotation::None
    }
}

impl ImageRotation {
    /// Maps a raw model position into the skeleton frame.
    pub fn apply(&self, p: &Vector3<f32>) -> Vector3<f32> {
        match self {
            ImageRotation::None => Vector3::new(-p.x, -p.y, p.z),
            ImageRotation::CounterClockwise => Vector3::new(-p.y, p.x, p.z),
            ImageRotation::Clockwise => Vector3::new(p.y, -p.x, p.z),
        }
    }
}

/// A keypoint of one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyPoint {
    /// Joint index in the skeleton
    pub index: usize,
    /// Raw 2D image position
    pub pos_2d: Vector2<f32>,
    /// Raw 3D position as estimated by the pose model
    pub now_3d: Vector3<f32>,
    /// Filtered 3D position
    pub pos_3d: Vector3<f32>,
    pub score_2d: f32,
    pub score_3d: f32,
}

impl KeyPoint {
    pub fn new(index: usize) -> Self {
        KeyPoint {
            index,
            pos_2d: Vector2::zeros(),
            now_3d: Vector3::zeros(),
            pos_3d: Vector3::zeros(),
            score_2d: 0.0,
            score_3d: 0.0,
        }
    }

    /// A keypoint with a raw 3D observation and its confidence.
    pub fn observed(index: usize, now_3d: Vector3<f32>, score_3d: f32) -> Self {
        KeyPoint {
            now_3d,
            score_3d,
            ..KeyPoint::new(index)
        }
    }
}

/// Downstream consumer of filtered keypoints, such as skeleton retargeting.
pub trait PoseSink {
    fn consume(&mut self, keypoints: &[KeyPoint]);
}

/// Per joint filter banks of a skeleton.
#[derive(Clone, Debug)]
pub struct KeypointSmoother {
    config: SmoothingConfig,
    kalman: Vec<KalmanKeypointFilter>,
    low_pass: Vec<LowPassFilter>,
    one_euro: Vec<OneEuroFilter>,
    // Frame in progress, committed once every joint has passed the Kalman stage
    staged_kalman: Vec<KalmanKeypointFilter>,
    staged: Vec<Vector3<f32>>,
}

impl KeypointSmoother {
    pub fn new(joint_count: usize, config: SmoothingConfig) -> Result<Self, FilterError> {
        let mut config = config;
        config.low_pass.order = clamp_order(config.low_pass.order);
        let kalman = kalman_bank(joint_count, config.kalman)?;
        let smoother = KeypointSmoother {
            staged_kalman: kalman.clone(),
            staged: vec![Vector3::zeros(); joint_count],
            kalman,
            low_pass: vec![LowPassFilter::with_config(config.low_pass); joint_count],
            one_euro: vec![OneEuroFilter::with_config(config.one_euro); joint_count],
            config,
        };
        tracing::debug!(joint_count, "keypoint smoother created");
        Ok(smoother)
    }

    pub fn joint_count(&self) -> usize {
        self.kalman.len()
    }

    pub fn config(&self) -> &SmoothingConfig {
        &self.config
    }

    /// Smooth one frame in place, `elapsed` is the time since the previous frame in seconds.
    ///
    /// The frame must hold one keypoint per joint. On error neither the keypoints nor any filter are modified.
    pub fn smooth_frame(&mut self, keypoints: &mut [KeyPoint], elapsed: f32) -> Result<(), FilterError> {
        let joints = self.joint_count();
        if keypoints.len() != joints {
            return Err(FilterError::shape((joints, 1), (keypoints.len(), 1)));
        }

        let config = &self.config;
        for (staged, kp) in self.staged.iter_mut().zip(keypoints.iter()) {
            *staged = config.rotation.apply(&kp.now_3d);
        }
        if config.kalman_enabled {
            self.staged_kalman.clone_from(&self.kalman);
            for (j, (f, p)) in self.staged_kalman.iter_mut().zip(self.staged.iter_mut()).enumerate() {
                let smoothed = f.correct_and_predict(p).map_err(|e| {
                    tracing::debug!(joint = j, error = %e, "kalman stage failed, frame dropped");
                    e
                })?;
                *p = smoothed;
            }
            std::mem::swap(&mut self.kalman, &mut self.staged_kalman);
        }

        for (j, kp) in keypoints.iter_mut().enumerate() {
            let mut p = self.staged[j];
            if config.low_pass_enabled {
                p = self.low_pass[j].correct_and_predict(&p);
            }
            if config.one_euro_enabled {
                p = self.one_euro[j].correct_with_interval(&p, elapsed);
            }
            kp.pos_3d = p;
        }
        Ok(())
    }

    /// Smooth one frame and hand it to `sink`.
    pub fn smooth_frame_into<S: PoseSink>(&mut self, keypoints: &mut [KeyPoint], elapsed: f32, sink: &mut S) -> Result<(), FilterError> {
        self.smooth_frame(keypoints, elapsed)?;
        sink.consume(keypoints);
        Ok(())
    }

    /// Enabling or disabling the stage restarts its filters.
    pub fn set_kalman_enabled(&mut self, enabled: bool) -> Result<(), FilterError> {
        if self.config.kalman_enabled != enabled {
            self.kalman = kalman_bank(self.joint_count(), self.config.kalman)?;
            tracing::trace!(enabled, "kalman stage toggled");
        }
        self.config.kalman_enabled = enabled;
        Ok(())
    }

    /// Enabling or disabling the stage restarts its filters.
    pub fn set_low_pass_enabled(&mut self, enabled: bool) {
        if self.config.low_pass_enabled != enabled {
            for f in self.low_pass.iter_mut() {
                f.reset();
            }
            tracing::trace!(enabled, "low pass stage toggled");
        }
        self.config.low_pass_enabled = enabled;
    }

    /// Enabling or disabling the stage restarts its filters.
    pub fn set_one_euro_enabled(&mut self, enabled: bool) {
        if self.config.one_euro_enabled != enabled {
            for f in self.one_euro.iter_mut() {
                f.reset();
            }
            tracing::trace!(enabled, "one euro stage toggled");
        }
        self.config.one_euro_enabled = enabled;
    }

    /// New sampling interval and noise, the Kalman stage restarts from rest with a fresh warm-up.
    ///
    /// On error the previous filters and configuration are kept.
    pub fn set_kalman_parameter(&mut self, time_interval: f32, noise: f32) -> Result<(), FilterError> {
        let config = KalmanConfig {
            time_interval,
            noise,
            ..self.config.kalman
        };
        self.kalman = kalman_bank(self.joint_count(), config)?;
        self.config.kalman = config;
        tracing::debug!(time_interval, noise, "kalman stage parameters updated");
        Ok(())
    }

    /// New order (clamped to 1..=10) and smoothing weight for every joint.
    pub fn set_low_pass_parameter(&mut self, order: usize, smooth: f32) {
        for f in self.low_pass.iter_mut() {
            f.update_filter_parameter(order, smooth);
        }
        self.config.low_pass.order = clamp_order(order);
        self.config.low_pass.smooth = smooth;
    }

    pub fn set_one_euro_parameter(&mut self, min_cutoff: f32, beta: f32, d_cutoff: f32) {
        for f in self.one_euro.iter_mut() {
            f.update_filter_parameter(min_cutoff, beta, d_cutoff);
        }
        self.config.one_euro.min_cutoff = min_cutoff;
        self.config.one_euro.beta = beta;
        self.config.one_euro.d_cutoff = d_cutoff;
    }

    pub fn set_rotation(&mut self, rotation: ImageRotation) {
        self.config.rotation = rotation;
    }

    pub fn kalman_filters(&self) -> &[KalmanKeypointFilter] {
        &self.kalman
    }

    pub fn low_pass_filters(&self) -> &[LowPassFilter] {
        &self.low_pass
    }

    pub fn one_euro_filters(&self) -> &[OneEuroFilter] {
        &self.one_euro
    }
}

fn kalman_bank(joint_count: usize, config: KalmanConfig) -> Result<Vec<KalmanKeypointFilter>, FilterError> {
    (0..joint_count).map(|_| KalmanKeypointFilter::with_config(config)).collect()
}
