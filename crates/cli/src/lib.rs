#![forbid(unsafe_code)]

pub mod cli;
pub mod runner;
pub mod signals;
