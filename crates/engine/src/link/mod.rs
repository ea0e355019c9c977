#![forbid(unsafe_code)]

mod rate_setter;
mod throttled;

pub use rate_setter::RateSetter;
pub use throttled::{BASE_DELAY, ThrottledLink};

use crate::domain::{Byterate, Request, RequestId, Tick};

/// A completed transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    pub request: RequestId,
    pub data: u32,
}

pub trait Socket: Send {
    /// Start transferring `request` from the server.
    fn request(&mut self, tick: Tick, id: RequestId, request: &Request);

    /// Take the payload of a finished transfer, if there is one.
    fn read_if_possible(&mut self) -> Option<Payload>;
}

pub trait RateControl: Send {
    /// Cap the byterate of the current transfer; `None` lifts the cap.
    fn set_request_rate(&mut self, rate: Option<Byterate>);
}

/// Both sides of the connection the fetch processor drives.
pub trait Link: Socket + RateControl {}

impl<T: Socket + RateControl> Link for T {}
