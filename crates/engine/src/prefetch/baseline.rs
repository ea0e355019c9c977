#![forbid(unsafe_code)]

use crate::domain::{Request, RequestId};
use crate::prediction::RatePredictionService;
use crate::prefetch::PrefetchAlgorithm;
use crate::stores::Schedule;

/// Schedules nothing; requests are only fetched when urged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAlgorithm;

impl PrefetchAlgorithm for NullAlgorithm {
    fn schedule(
        &self,
        _admitted: &[(RequestId, Request)],
        _oracle: &dyn RatePredictionService,
    ) -> Schedule {
        Schedule::new()
    }
}

/// Starts every fetch at its deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartAtDeadline;

impl PrefetchAlgorithm for StartAtDeadline {
    fn schedule(
        &self,
        admitted: &[(RequestId, Request)],
        _oracle: &dyn RatePredictionService,
    ) -> Schedule {
        admitted
            .iter()
            .map(|(id, request)| (*id, request.deadline))
            .collect()
    }
}
