#![forbid(unsafe_code)]

use crate::client::CacheProcessor;
use crate::domain::{Request, RequestId, Tick};
use crate::link::Link;
use crate::prediction::RatePredictionService;
use crate::prefetch::PrefetchAlgorithm;
use crate::profiling::PrefetchProfilingService;
use crate::stores::Schedule;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching { request: RequestId, issued_at: Tick },
}

/// Collaborators the fetch processor talks to during a tick.
pub struct FetchContext<'a> {
    pub link: &'a mut dyn Link,
    pub oracle: &'a dyn RatePredictionService,
    pub cache: &'a mut CacheProcessor,
    pub profiler: &'a mut dyn PrefetchProfilingService,
}

/// Decides which pending request to fetch next.
///
/// At most one fetch is in flight. Requests become visible to the algorithm
/// once their deadline is within `look_ahead` ticks; the algorithm runs
/// whenever a visible request has no schedule entry yet.
pub struct FetchProcessor {
    algorithm: Box<dyn PrefetchAlgorithm>,
    look_ahead: Tick,
    pending: BTreeMap<RequestId, Request>,
    schedule: Schedule,
    state: FetchState,
}

impl FetchProcessor {
    pub fn new(algorithm: Box<dyn PrefetchAlgorithm>, look_ahead: Tick) -> Self {
        Self {
            algorithm,
            look_ahead,
            pending: BTreeMap::new(),
            schedule: Schedule::new(),
            state: FetchState::Idle,
        }
    }

    pub fn add_request(&mut self, id: RequestId, request: Request) {
        self.pending.insert(id, request);
    }

    /// Run the algorithm once before the first tick, whatever is admitted.
    pub fn initialize(&mut self, ctx: &mut FetchContext<'_>) {
        self.reschedule(0, true, ctx);
    }

    pub fn tick(&mut self, tick: Tick, ctx: &mut FetchContext<'_>) {
        match self.state {
            FetchState::Fetching { request, issued_at } => {
                if let Some(payload) = ctx.link.read_if_possible() {
                    if payload.request != request {
                        warn!(expected = ?request, received = ?payload.request, "unexpected payload");
                    }
                    ctx.link.set_request_rate(None);
                    ctx.cache.save(request, tick, issued_at);
                    ctx.profiler.response(request, tick);
                    self.pending.remove(&request);
                    self.schedule.remove(request);
                    self.state = FetchState::Idle;
                    trace!(tick, ?request, "fetch complete");
                }
            }
            FetchState::Idle => {
                if let Some((id, start)) = self.schedule.earliest_due(tick) {
                    self.schedule.remove(id);
                    self.issue(tick, id, start, ctx);
                }
            }
        }

        self.reschedule(tick, false, ctx);
    }

    /// Fetch `id` as soon as possible, bypassing the algorithm.
    pub fn urge(&mut self, tick: Tick, id: RequestId) {
        if self.pending.contains_key(&id) {
            self.schedule.insert(id, tick);
        } else {
            warn!(tick, ?id, "urged request is not pending");
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn look_ahead(&self) -> Tick {
        self.look_ahead
    }

    pub fn is_pending(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn issue(&mut self, tick: Tick, id: RequestId, start: Tick, ctx: &mut FetchContext<'_>) {
        let Some(request) = self.pending.get(&id) else {
            warn!(tick, ?id, "scheduled request is not pending");
            return;
        };
        debug!(
            tick,
            ?id,
            start,
            deadline = request.deadline,
            data = request.data,
            "requesting"
        );
        ctx.link.request(tick, id, request);
        ctx.link.set_request_rate(Some(request.available_byterate));
        ctx.profiler.request(id, tick);
        self.state = FetchState::Fetching {
            request: id,
            issued_at: tick,
        };
    }

    fn reschedule(&mut self, tick: Tick, force: bool, ctx: &mut FetchContext<'_>) {
        let admitted: Vec<(RequestId, Request)> = self
            .pending
            .iter()
            .filter(|(_, request)| request.deadline - tick <= self.look_ahead)
            .map(|(id, request)| (*id, *request))
            .collect();

        let unscheduled = admitted.iter().any(|(id, _)| !self.schedule.contains(*id));
        if force || unscheduled {
            let update = self.algorithm.schedule(&admitted, ctx.oracle);
            for (id, start) in update.iter() {
                ctx.profiler.scheduled(id, start);
            }
            self.schedule.merge(&update);
            trace!(
                tick,
                admitted = admitted.len(),
                scheduled = update.len(),
                "rescheduled"
            );
        }

        let pending = &self.pending;
        self.schedule.retain(|id| pending.contains_key(&id));
    }
}
