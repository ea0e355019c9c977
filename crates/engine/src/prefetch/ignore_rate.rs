#![forbid(unsafe_code)]

use crate::domain::{Request, RequestId, Tick};
use crate::error::Error;
use crate::prediction::RatePredictionService;
use crate::prefetch::algorithm::{by_descending_deadline, parse_alpha};
use crate::prefetch::{CONNECTION_OVERHEAD, PrefetchAlgorithm};
use crate::stores::Schedule;
use std::collections::BTreeMap;
use tracing::trace;

/// Packs fetches back to back, latest deadline first, assuming every
/// request transfers at `alpha` times its available byterate.
#[derive(Debug, Clone)]
pub struct IgnoreRatePrediction {
    alpha: f64,
}

impl Default for IgnoreRatePrediction {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

impl IgnoreRatePrediction {
    pub fn with_alpha(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Ticks needed to transfer `request`, connection setup included.
    fn required_ticks(&self, request: &Request) -> Tick {
        let transfer = f64::from(request.data) / (self.alpha * f64::from(request.available_byterate));
        transfer as Tick + 1 + CONNECTION_OVERHEAD
    }
}

impl PrefetchAlgorithm for IgnoreRatePrediction {
    fn schedule(
        &self,
        admitted: &[(RequestId, Request)],
        _oracle: &dyn RatePredictionService,
    ) -> Schedule {
        let mut schedule = Schedule::new();
        let mut previous_start = Tick::MAX;

        for (id, request) in by_descending_deadline(admitted) {
            let start = previous_start.min(request.deadline) - self.required_ticks(&request);
            schedule.insert(id, start);
            previous_start = start;
        }

        trace!(scheduled = schedule.len(), "ignore-rate-prediction schedule");
        schedule
    }

    fn configure(&mut self, parameters: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(alpha) = parse_alpha(parameters)? {
            self.alpha = alpha;
        }
        Ok(())
    }
}
