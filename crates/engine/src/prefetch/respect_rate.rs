#![forbid(unsafe_code)]

use crate::domain::{Request, RequestId, Tick};
use crate::error::Error;
use crate::prediction::RatePredictionService;
use crate::prefetch::algorithm::{by_descending_deadline, parse_alpha};
use crate::prefetch::{CONNECTION_OVERHEAD, PrefetchAlgorithm};
use crate::stores::Schedule;
use std::collections::BTreeMap;
use tracing::trace;

/// Packs fetches back to back, latest deadline first, walking backwards
/// from each deadline and subtracting the bytes the predicted byterate
/// would deliver per tick.
#[derive(Debug, Clone)]
pub struct RespectRatePrediction {
    alpha: f64,
}

impl Default for RespectRatePrediction {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}

impl RespectRatePrediction {
    pub fn with_alpha(alpha: f64) -> Self {
        Self { alpha }
    }

    fn start_tick(&self, request: &Request, latest_end: Tick, oracle: &dyn RatePredictionService) -> Tick {
        let available = i64::from(request.available_byterate);
        let mut remaining = i64::from(request.data);
        let mut tick = latest_end - CONNECTION_OVERHEAD - 1;

        while remaining > 0 && tick >= 0 {
            let per_tick = match oracle.predict(tick) {
                Some(rate) => ((f64::from(rate) * self.alpha) as i64).min(available),
                None => available,
            };
            remaining -= per_tick;
            tick -= 1;
        }
        tick
    }
}

impl PrefetchAlgorithm for RespectRatePrediction {
    fn schedule(
        &self,
        admitted: &[(RequestId, Request)],
        oracle: &dyn RatePredictionService,
    ) -> Schedule {
        let mut schedule = Schedule::new();
        let mut previous_start = Tick::MAX;

        for (id, request) in by_descending_deadline(admitted) {
            let start = self.start_tick(&request, previous_start.min(request.deadline), oracle);
            schedule.insert(id, start);
            previous_start = start;
        }

        trace!(scheduled = schedule.len(), "respect-rate-prediction schedule");
        schedule
    }

    fn configure(&mut self, parameters: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(alpha) = parse_alpha(parameters)? {
            self.alpha = alpha;
        }
        Ok(())
    }
}
