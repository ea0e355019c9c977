#![forbid(unsafe_code)]

mod sample;
mod stream;

pub use sample::Sample;
pub use stream::DeterministicStream;
