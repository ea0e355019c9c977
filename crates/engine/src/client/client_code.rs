#![forbid(unsafe_code)]

use crate::client::{CacheProcessor, FetchProcessor};
use crate::domain::{Request, RequestId, Tick};
use crate::profiling::PrefetchProfilingService;
use std::collections::BTreeMap;
use tracing::trace;

/// The consumer of the data. At each deadline it either finds the request
/// in the cache or urges the fetch and waits for it.
#[derive(Debug, Default)]
pub struct ClientCodeProcessor {
    due: BTreeMap<Tick, Vec<(RequestId, Request)>>,
    waiting: Vec<(RequestId, Request)>,
}

impl ClientCodeProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_request(&mut self, id: RequestId, request: Request) {
        self.due.entry(request.deadline).or_default().push((id, request));
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn tick(
        &mut self,
        tick: Tick,
        cache: &CacheProcessor,
        fetch: &mut FetchProcessor,
        profiler: &mut dyn PrefetchProfilingService,
    ) {
        self.waiting.retain(|(id, request)| {
            let Some(record) = cache.get(*id) else {
                return true;
            };
            profiler.arrival(
                *id,
                tick - request.deadline,
                tick - record.issue_tick,
                request.data,
            );
            false
        });

        let Some(due) = self.due.remove(&tick) else {
            return;
        };
        for (id, request) in due {
            match cache.get(id) {
                Some(record) => {
                    profiler.cache_hit(id);
                    profiler.arrival(id, 0, tick - record.issue_tick, request.data);
                }
                None => {
                    trace!(tick, ?id, "cache miss, urging fetch");
                    fetch.urge(tick, id);
                    self.waiting.push((id, request));
                }
            }
        }
    }
}
