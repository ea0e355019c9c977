#![forbid(unsafe_code)]

use crate::domain::{RateTrace, Tick};
use crate::link::ThrottledLink;

/// Replays the real byterate trace onto the link.
#[derive(Debug, Clone, Default)]
pub struct RateSetter {
    trace: RateTrace,
}

impl RateSetter {
    pub fn new(trace: RateTrace) -> Self {
        Self { trace }
    }

    /// Rate phase: apply the entry recorded at `tick`, if any.
    pub fn apply(&self, tick: Tick, link: &mut ThrottledLink) {
        if let Some(rate) = self.trace.at(tick) {
            link.set_base_rate(Some(rate));
        }
    }
}
