#![forbid(unsafe_code)]

use crate::domain::{Byterate, RateTrace, Tick};

pub trait RatePredictionService: Send + Sync {
    /// Predicted byterate at `tick`, or `None` when nothing is known.
    fn predict(&self, tick: Tick) -> Option<Byterate>;
}

/// Prediction backed by a precomputed trace.
#[derive(Debug, Clone, Default)]
pub struct TracePrediction {
    trace: RateTrace,
}

impl TracePrediction {
    pub fn new(trace: RateTrace) -> Self {
        Self { trace }
    }
}

impl RatePredictionService for TracePrediction {
    fn predict(&self, tick: Tick) -> Option<Byterate> {
        self.trace.value_at(tick)
    }
}
