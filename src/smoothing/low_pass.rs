//! Cascaded low pass filter.
//!
//! A fixed coefficient exponential smoothing cascade of up to ten stages evaluated in one pass.
//! The raw sample enters stage 0, every later stage blends its previous value with the previous value of
//! the stage before it, and stage 0 is finally blended with the last stage. Stage 0 is the output.

use nalgebra::Vector3;

use crate::config::{LowPassConfig, LOW_PASS_MAX_ORDER};
use crate::smoothing::warm_up::{WarmUp, WarmUpGate};

/// Calls passed through raw after construction or a parameter update.
pub const LOW_PASS_WARM_UP: u32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct LowPassFilter {
    config: LowPassConfig,
    stages: [Vector3<f32>; LOW_PASS_MAX_ORDER],
    gate: WarmUpGate,
}

impl LowPassFilter {
    /// `order` is clamped to 1..=10, `smooth` is the weight kept from a stage's previous value.
    pub fn new(order: usize, smooth: f32) -> Self {
        Self::with_config(LowPassConfig::new(order, smooth))
    }

    pub fn with_config(config: LowPassConfig) -> Self {
        LowPassFilter {
            config: LowPassConfig::new(config.order, config.smooth),
            stages: [Vector3::zeros(); LOW_PASS_MAX_ORDER],
            gate: WarmUpGate::new(LOW_PASS_WARM_UP),
        }
    }

    /// Filter a sample, returning it unmodified during warm-up.
    pub fn correct_and_predict(&mut self, x: &Vector3<f32>) -> Vector3<f32> {
        let filtered = self.cascade(x);
        if self.gate.pass_through() {
            *x
        } else {
            filtered
        }
    }

    fn cascade(&mut self, x: &Vector3<f32>) -> Vector3<f32> {
        let n = self.config.order;
        let w = self.config.smooth;
        let old = self.stages;

        self.stages[0] = old[0] * w + x * (1.0 - w);
        for i in 1..n {
            self.stages[i] = old[i] * w + old[i - 1] * (1.0 - w);
        }
        self.stages[0] = self.stages[0] * w + self.stages[n - 1] * (1.0 - w);

        self.stages[0]
    }

    /// Reconfigure, clearing the stages and restarting the warm-up.
    pub fn update_filter_parameter(&mut self, order: usize, smooth: f32) {
        *self = Self::new(order, smooth);
        tracing::debug!(order = self.config.order, smooth, "low pass parameters updated");
    }

    pub fn reset(&mut self) {
        *self = Self::with_config(self.config);
    }

    pub fn warm_up(&self) -> WarmUp {
        self.gate.phase()
    }

    pub fn config(&self) -> &LowPassConfig {
        &self.config
    }

    pub fn order(&self) -> usize {
        self.config.order
    }

    /// Current filtered value, stage 0.
    pub fn value(&self) -> &Vector3<f32> {
        &self.stages[0]
    }
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::with_config(LowPassConfig::default())
    }
}
