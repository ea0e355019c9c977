#![forbid(unsafe_code)]

mod request_store;
mod schedule;

pub use request_store::RequestStore;
pub use schedule::Schedule;
