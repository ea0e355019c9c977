#![forbid(unsafe_code)]

mod rate_trace;
mod request;

pub use rate_trace::RateTrace;
pub use request::{Request, RequestId};

/// Discrete unit of simulated time. Signed because schedules may start
/// before tick 0.
pub type Tick = i64;

/// Bytes per tick.
pub type Byterate = u32;
