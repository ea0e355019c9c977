#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod engine;
pub mod error;
pub mod link;
pub mod prediction;
pub mod prefetch;
pub mod profiling;
pub mod random;
pub mod scenario;
pub mod stores;

pub use client::{CacheProcessor, CacheRecord, ClientCodeProcessor, FetchContext, FetchProcessor, FetchState};
pub use domain::{Byterate, RateTrace, Request, RequestId, Tick};
pub use engine::{RunReport, Simulation, SimulationBuilder, TickReport};
pub use error::{Error, ScenarioError};
pub use link::{Link, Payload, RateControl, RateSetter, Socket, ThrottledLink};
pub use prediction::{RatePredictionService, TracePrediction};
pub use prefetch::{
    Algorithm, IgnoreRatePrediction, NullAlgorithm, PrefetchAlgorithm, RespectRatePrediction,
    StartAtDeadline,
};
pub use profiling::{PrefetchProfiler, PrefetchProfilingService, Summary};
pub use random::{DeterministicStream, Sample};
pub use scenario::{Scenario, ScenarioGenerator, read_scenario, write_scenario};
pub use stores::{RequestStore, Schedule};
