//! Warm-up gating of filter output.
//!
//! A freshly started filter passes its raw input through for a fixed number of calls, hiding the start up
//! transient. Once saturated it stays active until explicitly reset.

/// Phase of a [`WarmUpGate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarmUp {
    /// `count` calls have passed through so far.
    WarmingUp { count: u32 },
    Active,
}

/// Two state warm-up machine: `WarmingUp{count}` -> `Active` on the threshold call, `reset` back to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarmUpGate {
    threshold: u32,
    phase: WarmUp,
}

impl WarmUpGate {
    pub fn new(threshold: u32) -> Self {
        let phase = if threshold == 0 {
            WarmUp::Active
        } else {
            WarmUp::WarmingUp { count: 0 }
        };
        WarmUpGate { threshold, phase }
    }

    /// Records a call, true if this call's raw input must be passed through.
    pub fn pass_through(&mut self) -> bool {
        match self.phase {
            WarmUp::Active => false,
            WarmUp::WarmingUp { count } => {
                let count = count + 1;
                if count >= self.threshold {
                    tracing::trace!(threshold = self.threshold, "warm-up complete");
                    self.phase = WarmUp::Active;
                } else {
                    self.phase = WarmUp::WarmingUp { count };
                }
                true
            }
        }
    }

    pub fn reset(&mut self) {
        *self = WarmUpGate::new(self.threshold);
    }

    pub fn phase(&self) -> WarmUp {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == WarmUp::Active
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Calls counted towards the threshold.
    pub fn count(&self) -> u32 {
        match self.phase {
            WarmUp::WarmingUp { count } => count,
            WarmUp::Active => self.threshold,
        }
    }
}
