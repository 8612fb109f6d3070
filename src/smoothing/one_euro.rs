//! One euro filter - adaptive one pole low pass filter.
//!
//! Smooth when slow, responsive when fast. The cutoff frequency of each axis grows with the smoothed
//! speed of that axis: `cutoff = min_cutoff + beta * |dx|`.

use std::f32::consts::PI;

use nalgebra::Vector3;

use crate::config::OneEuroConfig;

/// Smallest elapsed interval (seconds) used for a step.
///
/// A zero or negative interval would divide by zero in the derivative, it is clamped to this instead.
pub const MIN_INTERVAL: f32 = 1e-6;

/// Smoothing factor of a one pole low pass with `cutoff` (Hz) over `t_e` seconds.
pub fn smoothing_factor(t_e: f32, cutoff: f32) -> f32 {
    let r = 2.0 * PI * cutoff * t_e;
    r / (r + 1.0)
}

pub fn exponential_smoothing(a: f32, x: f32, x_prev: f32) -> f32 {
    a * x + (1.0 - a) * x_prev
}

/// Adaptive low pass filter of a 3D point.
///
/// There is no warm-up, it is cold started from a zero previous sample, derivative and timestamp.
#[derive(Clone, Debug, PartialEq)]
pub struct OneEuroFilter {
    config: OneEuroConfig,
    x_prev: Vector3<f32>,
    dx_prev: Vector3<f32>,
    t_prev: f32,
}

impl OneEuroFilter {
    pub fn new(min_cutoff: f32, beta: f32, d_cutoff: f32) -> Self {
        Self::with_config(OneEuroConfig { min_cutoff, beta, d_cutoff })
    }

    pub fn with_config(config: OneEuroConfig) -> Self {
        OneEuroFilter {
            config,
            x_prev: Vector3::zeros(),
            dx_prev: Vector3::zeros(),
            t_prev: 0.0,
        }
    }

    /// Filter a sample taken at `timestamp` seconds on a running clock.
    ///
    /// The step interval is `timestamp` less the previous call's timestamp, zero before the first call.
    pub fn correct_and_predict(&mut self, x: &Vector3<f32>, timestamp: f32) -> Vector3<f32> {
        let elapsed = timestamp - self.t_prev;
        let x_hat = self.step(x, elapsed);
        self.t_prev = timestamp;
        x_hat
    }

    /// Filter a sample taken `elapsed` seconds after the previous one.
    pub fn correct_with_interval(&mut self, x: &Vector3<f32>, elapsed: f32) -> Vector3<f32> {
        let x_hat = self.step(x, elapsed);
        self.t_prev += elapsed;
        x_hat
    }

    fn step(&mut self, x: &Vector3<f32>, elapsed: f32) -> Vector3<f32> {
        let t_e = elapsed.max(MIN_INTERVAL);
        let OneEuroConfig { min_cutoff, beta, d_cutoff } = self.config;

        // 1. Estimate derivative (velocity)
        let a_d = smoothing_factor(t_e, d_cutoff);
        let mut dx_hat = Vector3::<f32>::zeros();
        let mut x_hat = Vector3::<f32>::zeros();
        for i in 0..3 {
            let dx = (x[i] - self.x_prev[i]) / t_e;
            dx_hat[i] = exponential_smoothing(a_d, dx, self.dx_prev[i]);

            // 2. Adaptive cutoff
            let cutoff = min_cutoff + beta * dx_hat[i].abs();
            let a = smoothing_factor(t_e, cutoff);

            // 3. Apply filter
            x_hat[i] = exponential_smoothing(a, x[i], self.x_prev[i]);
        }

        self.x_prev = x_hat;
        self.dx_prev = dx_hat;
        x_hat
    }

    /// Reconfigure and restart from the zero state.
    pub fn update_filter_parameter(&mut self, min_cutoff: f32, beta: f32, d_cutoff: f32) {
        *self = Self::new(min_cutoff, beta, d_cutoff);
        tracing::debug!(min_cutoff, beta, d_cutoff, "one euro parameters updated");
    }

    pub fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }

    pub fn config(&self) -> &OneEuroConfig {
        &self.config
    }

    /// Last filtered sample.
    pub fn value(&self) -> &Vector3<f32> {
        &self.x_prev
    }

    /// Last smoothed derivative.
    pub fn derivative(&self) -> &Vector3<f32> {
        &self.dx_prev
    }
}

impl Default for OneEuroFilter {
    fn default() -> Self {
        Self::with_config(OneEuroConfig::default())
    }
}
