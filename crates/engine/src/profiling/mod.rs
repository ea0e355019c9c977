#![forbid(unsafe_code)]

mod profiler;
mod summary;

pub use profiler::PrefetchProfiler;
pub use summary::Summary;

use crate::domain::{RequestId, Tick};

/// Sink for prefetch events, in the order they happen.
pub trait PrefetchProfilingService: Send {
    /// The client found the data in the cache at the deadline.
    fn cache_hit(&mut self, id: RequestId);

    /// The client received the data. `response_time` is the delay past the
    /// deadline, `data_age` the time since the fetch was issued.
    fn arrival(&mut self, id: RequestId, response_time: Tick, data_age: Tick, data_volume: u32);

    /// The algorithm (re)scheduled a fetch to start at `start`.
    fn scheduled(&mut self, id: RequestId, start: Tick);

    /// A fetch was issued.
    fn request(&mut self, id: RequestId, tick: Tick);

    /// A fetch completed.
    fn response(&mut self, id: RequestId, tick: Tick);
}
