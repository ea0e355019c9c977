#![forbid(unsafe_code)]

use crate::domain::{RequestId, Tick};
use crate::profiling::{PrefetchProfilingService, Summary};
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use tracing::trace;

/// Records profiling events and answers questions about them afterwards.
#[derive(Debug, Default)]
pub struct PrefetchProfiler {
    scheduled: FxHashMap<RequestId, Tick>,
    fetch_start: FxHashMap<RequestId, Tick>,
    fetch_finish: FxHashMap<RequestId, Tick>,
    hits: BTreeSet<RequestId>,
    response_times: Vec<Tick>,
    data_ages: Vec<Tick>,
    data_volumes: Vec<u64>,
}

impl PrefetchProfiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest start tick the algorithm assigned.
    pub fn scheduled_tick(&self, id: RequestId) -> Option<Tick> {
        self.scheduled.get(&id).copied()
    }

    pub fn fetch_start(&self, id: RequestId) -> Option<Tick> {
        self.fetch_start.get(&id).copied()
    }

    pub fn fetch_finish(&self, id: RequestId) -> Option<Tick> {
        self.fetch_finish.get(&id).copied()
    }

    /// Requests that were in the cache at their deadline.
    pub fn cache_hits(&self) -> &BTreeSet<RequestId> {
        &self.hits
    }

    pub fn response_times(&self) -> &[Tick] {
        &self.response_times
    }

    pub fn data_ages(&self) -> &[Tick] {
        &self.data_ages
    }

    pub fn data_volumes(&self) -> &[u64] {
        &self.data_volumes
    }

    /// Aggregate over a run with `requests` requests in total.
    pub fn summary(&self, requests: usize) -> Summary {
        let arrivals = self.response_times.len();
        Summary {
            requests,
            hits: self.hits.len(),
            misses: self.response_times.iter().filter(|rt| **rt > 0).count(),
            unfinished: requests.saturating_sub(arrivals),
            mean_response_time: mean(&self.response_times),
            mean_data_age: mean(&self.data_ages),
            data_volume: self.data_volumes.iter().sum(),
        }
    }
}

fn mean(values: &[Tick]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64)
}

impl PrefetchProfilingService for PrefetchProfiler {
    fn cache_hit(&mut self, id: RequestId) {
        self.hits.insert(id);
    }

    fn arrival(&mut self, id: RequestId, response_time: Tick, data_age: Tick, data_volume: u32) {
        trace!(?id, response_time, data_age, data_volume, "arrival");
        self.response_times.push(response_time);
        self.data_ages.push(data_age);
        self.data_volumes.push(u64::from(data_volume));
    }

    fn scheduled(&mut self, id: RequestId, start: Tick) {
        self.scheduled.insert(id, start);
    }

    fn request(&mut self, id: RequestId, tick: Tick) {
        self.fetch_start.entry(id).or_insert(tick);
    }

    fn response(&mut self, id: RequestId, tick: Tick) {
        self.fetch_finish.insert(id, tick);
    }
}
