#![forbid(unsafe_code)]

mod cache;
mod client_code;
mod fetch;

pub use cache::{CacheProcessor, CacheRecord};
pub use client_code::ClientCodeProcessor;
pub use fetch::{FetchContext, FetchProcessor, FetchState};
