#![forbid(unsafe_code)]

use crate::client::{CacheProcessor, ClientCodeProcessor, FetchContext, FetchProcessor, FetchState};
use crate::domain::{RateTrace, Request, Tick};
use crate::error::Error;
use crate::link::{RateSetter, ThrottledLink};
use crate::prediction::TracePrediction;
use crate::prefetch::{Algorithm, NullAlgorithm, PrefetchAlgorithm};
use crate::profiling::{PrefetchProfiler, Summary};
use crate::scenario::Scenario;
use crate::stores::RequestStore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: Tick,
    pub state: FetchState,
    pub pending: usize,
    pub scheduled: usize,
    pub cached: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Ticks executed.
    pub ticks: Tick,
    pub cancelled: bool,
    pub summary: Summary,
}

pub struct SimulationBuilder {
    total_ticks: Tick,
    look_ahead: Option<Tick>,
    requests: Vec<Request>,
    rate_real: RateTrace,
    rate_predicted: RateTrace,
    algorithm: Box<dyn PrefetchAlgorithm>,
}

impl SimulationBuilder {
    /// An empty run of `total_ticks` ticks with the null algorithm and an
    /// unthrottled link.
    pub fn new(total_ticks: Tick) -> Self {
        Self {
            total_ticks,
            look_ahead: None,
            requests: Vec::new(),
            rate_real: RateTrace::default(),
            rate_predicted: RateTrace::default(),
            algorithm: Box::new(NullAlgorithm),
        }
    }

    /// Everything the scenario describes, with its algorithm configured.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, Error> {
        let algorithm = Algorithm::configured(scenario.algorithm, &scenario.algorithm_parameters)?;
        Ok(Self::new(scenario.total_ticks)
            .look_ahead(scenario.look_ahead)
            .requests(scenario.requests.iter().copied())
            .rate_real(scenario.rate_real.clone())
            .rate_predicted(scenario.rate_predicted.clone())
            .algorithm(algorithm))
    }

    pub fn request(mut self, request: Request) -> Self {
        self.requests.push(request);
        self
    }

    pub fn requests(mut self, requests: impl IntoIterator<Item = Request>) -> Self {
        self.requests.extend(requests);
        self
    }

    pub fn rate_real(mut self, trace: RateTrace) -> Self {
        self.rate_real = trace;
        self
    }

    pub fn rate_predicted(mut self, trace: RateTrace) -> Self {
        self.rate_predicted = trace;
        self
    }

    /// Defaults to `total_ticks`.
    pub fn look_ahead(mut self, look_ahead: Tick) -> Self {
        self.look_ahead = Some(look_ahead);
        self
    }

    pub fn algorithm(mut self, algorithm: impl PrefetchAlgorithm + 'static) -> Self {
        self.algorithm = Box::new(algorithm);
        self
    }

    pub fn build(self) -> Simulation {
        let look_ahead = self.look_ahead.unwrap_or(self.total_ticks);
        let requests: RequestStore = self.requests.into_iter().collect();

        let mut fetch = FetchProcessor::new(self.algorithm, look_ahead);
        let mut client = ClientCodeProcessor::new();
        for (id, request) in requests.iter() {
            fetch.add_request(id, *request);
            client.add_request(id, *request);
        }

        let mut simulation = Simulation {
            total_ticks: self.total_ticks,
            next_tick: 0,
            requests,
            fetch,
            client,
            cache: CacheProcessor::new(),
            link: ThrottledLink::new(),
            rate_setter: RateSetter::new(self.rate_real),
            oracle: TracePrediction::new(self.rate_predicted),
            profiler: PrefetchProfiler::new(),
        };

        let mut ctx = FetchContext {
            link: &mut simulation.link,
            oracle: &simulation.oracle,
            cache: &mut simulation.cache,
            profiler: &mut simulation.profiler,
        };
        simulation.fetch.initialize(&mut ctx);

        debug!(
            total_ticks = simulation.total_ticks,
            look_ahead,
            requests = simulation.requests.len(),
            "simulation created"
        );
        simulation
    }
}

/// One scenario being played out tick by tick.
///
/// Each tick runs three phases: the real byterate is applied to the link,
/// the fetch processor and the client code act, then the link moves data.
pub struct Simulation {
    total_ticks: Tick,
    next_tick: Tick,
    requests: RequestStore,
    fetch: FetchProcessor,
    client: ClientCodeProcessor,
    cache: CacheProcessor,
    link: ThrottledLink,
    rate_setter: RateSetter,
    oracle: TracePrediction,
    profiler: PrefetchProfiler,
}

impl Simulation {
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, Error> {
        Ok(SimulationBuilder::from_scenario(scenario)?.build())
    }

    /// Execute the next tick, or return `None` once all ticks have run.
    pub fn tick(&mut self) -> Option<TickReport> {
        if self.is_finished() {
            return None;
        }
        let tick = self.next_tick;

        self.rate_setter.apply(tick, &mut self.link);

        let mut ctx = FetchContext {
            link: &mut self.link,
            oracle: &self.oracle,
            cache: &mut self.cache,
            profiler: &mut self.profiler,
        };
        self.fetch.tick(tick, &mut ctx);
        self.client
            .tick(tick, &self.cache, &mut self.fetch, &mut self.profiler);

        self.link.communicate(tick);
        self.next_tick += 1;

        Some(TickReport {
            tick,
            state: self.fetch.state(),
            pending: self.fetch.pending_len(),
            scheduled: self.fetch.schedule().len(),
            cached: self.cache.len(),
        })
    }

    pub fn run_to_end(&mut self) -> RunReport {
        while self.tick().is_some() {}
        self.report(false)
    }

    /// Run until the last tick or until `cancel` fires, checked between
    /// ticks. A cancelled run reports what happened so far.
    pub fn run_until(&mut self, cancel: &CancellationToken) -> RunReport {
        while !self.is_finished() {
            if cancel.is_cancelled() {
                info!(tick = self.next_tick, "simulation cancelled");
                return self.report(true);
            }
            self.tick();
        }
        self.report(false)
    }

    pub fn summary(&self) -> Summary {
        self.profiler.summary(self.requests.len())
    }

    pub fn is_finished(&self) -> bool {
        self.next_tick >= self.total_ticks
    }

    /// The tick the next call to [`Simulation::tick`] executes.
    pub fn current_tick(&self) -> Tick {
        self.next_tick
    }

    pub fn total_ticks(&self) -> Tick {
        self.total_ticks
    }

    pub fn requests(&self) -> &RequestStore {
        &self.requests
    }

    pub fn profiler(&self) -> &PrefetchProfiler {
        &self.profiler
    }

    pub fn cache(&self) -> &CacheProcessor {
        &self.cache
    }

    pub fn fetch(&self) -> &FetchProcessor {
        &self.fetch
    }

    fn report(&self, cancelled: bool) -> RunReport {
        let summary = self.summary();
        debug!(
            ticks = self.next_tick,
            cancelled,
            hits = summary.hits,
            misses = summary.misses,
            unfinished = summary.unfinished,
            "simulation finished"
        );
        RunReport {
            ticks: self.next_tick,
            cancelled,
            summary,
        }
    }
}
