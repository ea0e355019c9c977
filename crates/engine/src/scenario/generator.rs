#![forbid(unsafe_code)]

use crate::domain::{Byterate, RateTrace, Request, Tick};
use crate::error::Error;
use crate::random::{DeterministicStream, Sample};
use crate::scenario::Scenario;
use config::{Config, RequestSeries};
use tracing::debug;

/// Builds a [`Scenario`] from a [`Config`] and a root seed.
///
/// The root stream is split into four children (network quality,
/// prediction, re-graining and request series) before anything is drawn, so
/// changing the parameters of one concern never shifts the values drawn for
/// another.
pub struct ScenarioGenerator<'a> {
    config: &'a Config,
    seed: i64,
    random: DeterministicStream,
}

impl<'a> ScenarioGenerator<'a> {
    pub fn new(config: &'a Config, seed: i64) -> Self {
        Self {
            config,
            seed,
            random: DeterministicStream::new(seed),
        }
    }

    /// Fails if the configuration does not pass [`Config::validate`].
    pub fn generate(mut self) -> Result<Scenario, Error> {
        self.config.validate()?;

        let mut quality_stream = self.random.fork();
        let mut prediction_stream = self.random.fork();
        let mut grain_stream = self.random.fork();
        let mut series_stream = self.random.fork();

        let quality = self.network_quality(&mut quality_stream);
        let rate_predicted = self.prediction(&mut prediction_stream, &quality);
        let rate_real = self.grain(&mut grain_stream, &quality);

        let mut requests: Vec<Request> = self
            .config
            .requests
            .iter()
            .map(|request| Request::new(request.deadline, request.data, request.byterate))
            .collect();
        for series in &self.config.request_series {
            self.series(&mut series_stream, series, &mut requests);
        }
        requests.sort_by_key(|request| request.deadline);

        debug!(
            seed = self.seed,
            total_ticks = self.config.total_ticks,
            real = rate_real.len(),
            predicted = rate_predicted.len(),
            requests = requests.len(),
            "scenario generated"
        );

        Ok(Scenario {
            total_ticks: self.config.total_ticks,
            look_ahead: self.config.look_ahead(),
            rate_real,
            rate_predicted,
            requests,
            algorithm: self.config.algorithm.name,
            algorithm_parameters: self.config.algorithm.parameters.clone(),
        })
    }

    fn last_tick(&self) -> Tick {
        self.config.total_ticks - 1
    }

    fn mean_slot_length(&self) -> i64 {
        self.config.network.slot_length.mean()
    }

    /// Slot-wise byterate with downtime and smoothing against the previous
    /// nonzero slot.
    fn network_quality(&self, random: &mut DeterministicStream) -> RateTrace {
        let network = &self.config.network;
        let mut byterate_stream = random.fork();
        let mut uptime_stream = random.fork();
        let mut length_stream = random.fork();

        let mut trace = RateTrace::new();
        let mut previous: Option<i64> = None;
        let mut tick = 0;

        while tick < self.config.total_ticks {
            let mut byterate = clamp_rate(network.byterate.sample(&mut byterate_stream)) as i64;
            if uptime_stream.next_uniform() > network.uptime {
                byterate = 0;
            }
            if let Some(previous) = previous
                && byterate != 0
            {
                byterate = (2 * byterate + previous) / 3;
            }

            trace.insert(tick, clamp_rate(byterate));
            tick = tick.saturating_add(network.slot_length.sample(&mut length_stream).max(1));

            if byterate != 0 {
                previous = Some(byterate);
            }
        }

        trace
    }

    fn prediction(&self, random: &mut DeterministicStream, quality: &RateTrace) -> RateTrace {
        let errors = &self.config.prediction;
        let mut time_stream = random.fork();
        let mut amplitude_stream = random.fork();
        let mean_slot = self.mean_slot_length() as f64;

        let mut trace = RateTrace::new();
        for (tick, rate) in quality.iter() {
            let predicted_tick = if tick == 0 {
                0
            } else {
                let relative = errors.relative_time_error.sample(&mut time_stream);
                let absolute = errors.absolute_time_error.sample(&mut time_stream);
                tick.saturating_add((relative * mean_slot) as i64)
                    .saturating_add(absolute)
            };
            let predicted_tick = predicted_tick.clamp(0, self.last_tick());

            let relative = errors.relative_amplitude_error.sample(&mut amplitude_stream);
            let absolute = errors.absolute_amplitude_error.sample(&mut amplitude_stream);
            let predicted = ((f64::from(rate) * (1.0 + relative)) as i64).saturating_add(absolute);

            trace.insert(predicted_tick, clamp_rate(predicted));
        }
        trace
    }

    /// Resample the slot-wise trace on a finer grid with jitter.
    fn grain(&self, random: &mut DeterministicStream, quality: &RateTrace) -> RateTrace {
        let network = &self.config.network;
        let mut relative_stream = random.fork();
        let mut absolute_stream = random.fork();
        let step = (self.mean_slot_length() / 10).max(1);

        let mut trace = RateTrace::new();
        let mut tick = 0;
        while tick < self.config.total_ticks {
            let relative = network.relative_jitter.sample(&mut relative_stream);
            let absolute = network.absolute_jitter.sample(&mut absolute_stream);

            let mut rate = i64::from(quality.value_at(tick).unwrap_or_default());
            if rate != 0 {
                rate = ((1.0 + relative) * rate as f64 + absolute as f64) as i64;
            }
            trace.insert(tick, clamp_rate(rate));
            tick = tick.saturating_add(step);
        }
        trace
    }

    fn series(
        &self,
        random: &mut DeterministicStream,
        series: &RequestSeries,
        requests: &mut Vec<Request>,
    ) {
        let mut size_stream = random.fork();
        let mut byterate_stream = random.fork();
        let mut interval_stream = random.fork();

        let last = self.last_tick();
        let start = series.start.sample(&mut random.fork()).clamp(0, last);
        let end = series.end.sample(&mut random.fork()).clamp(start, last);

        let mut current = start;
        while current <= end {
            let data = clamp_positive(series.size.sample(&mut size_stream));
            let byterate = clamp_positive(series.byterate.sample(&mut byterate_stream));
            requests.push(Request::new(current, data, byterate));

            current = current.saturating_add(series.interval.sample(&mut interval_stream).max(1));
        }
    }
}

fn clamp_rate(value: i64) -> Byterate {
    value.clamp(0, i64::from(Byterate::MAX)) as Byterate
}

fn clamp_positive(value: i64) -> u32 {
    value.clamp(1, i64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Distribution, FixedRequest};

    fn config() -> Config {
        let mut config = Config {
            total_ticks: 1_000,
            ..Config::default()
        };
        config.network.byterate = Distribution::uniform(50, 150).unwrap();
        config.network.slot_length = Distribution::uniform(50, 150).unwrap();
        config.network.uptime = 0.8;
        config
    }

    #[test]
    fn constant_network_without_errors() {
        let mut config = Config {
            total_ticks: 100,
            ..Config::default()
        };
        config.network.slot_length = Distribution::Exact(20);

        let scenario = ScenarioGenerator::new(&config, 1).generate().unwrap();

        // Slots start every 20 ticks; the grid step is 2.
        assert_eq!(scenario.rate_predicted.len(), 5);
        assert!(scenario.rate_predicted.iter().all(|(_, rate)| rate == 100));
        assert_eq!(scenario.rate_real.len(), 50);
        assert!(scenario.rate_real.iter().all(|(tick, rate)| tick % 2 == 0 && rate == 100));
        assert_eq!(scenario.look_ahead, 100);
    }

    #[test]
    fn downtime_yields_zero_rates() {
        let mut config = config();
        config.network.uptime = 0.0;

        let scenario = ScenarioGenerator::new(&config, 3).generate().unwrap();
        assert!(scenario.rate_real.iter().all(|(_, rate)| rate == 0));
        assert!(scenario.rate_predicted.iter().all(|(_, rate)| rate == 0));
    }

    #[test]
    fn predicted_ticks_stay_in_range() {
        let mut config = config();
        config.prediction.absolute_time_error = Distribution::uniform(-500, 500).unwrap();
        config.prediction.absolute_amplitude_error = Distribution::Exact(-1_000);

        let scenario = ScenarioGenerator::new(&config, 9).generate().unwrap();
        for (tick, rate) in scenario.rate_predicted.iter() {
            assert!((0..1_000).contains(&tick));
            assert_eq!(rate, 0);
        }
    }

    #[test]
    fn series_is_clamped_into_the_run() {
        let mut config = config();
        config.request_series.push(RequestSeries {
            interval: Distribution::Exact(0),
            size: Distribution::Exact(-5),
            byterate: Distribution::Exact(3),
            start: Distribution::Exact(990),
            end: Distribution::Exact(5_000),
        });
        config.requests.push(FixedRequest {
            deadline: 995,
            data: 42,
            byterate: 7,
        });

        let scenario = ScenarioGenerator::new(&config, 4).generate().unwrap();
        let deadlines: Vec<Tick> = scenario.requests.iter().map(|r| r.deadline).collect();
        let mut expected: Vec<Tick> = (990..1_000).collect();
        expected.insert(6, 995);
        assert_eq!(deadlines, expected);
        // The fixed request keeps its place ahead of the series entry at 995.
        assert_eq!(scenario.requests[5], Request::new(995, 42, 7));
        assert_eq!(scenario.requests[6], Request::new(995, 1, 3));
    }

    #[test]
    fn same_seed_same_scenario() {
        let config = config();
        let a = ScenarioGenerator::new(&config, 80).generate().unwrap();
        let b = ScenarioGenerator::new(&config, 80).generate().unwrap();
        let c = ScenarioGenerator::new(&config, 81).generate().unwrap();
        assert_eq!(a.to_text().unwrap(), b.to_text().unwrap());
        assert_ne!(a.rate_real, c.rate_real);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let mut config = Config {
            total_ticks: 0,
            ..Config::default()
        };
        config.request_series.push(RequestSeries::default());
        assert!(matches!(
            ScenarioGenerator::new(&config, 1).generate(),
            Err(Error::Config(config::Error::NonPositiveTicks(0)))
        ));

        let mut config = self::config();
        config
            .algorithm
            .parameters
            .insert("note".to_owned(), "fast link".to_owned());
        assert!(matches!(
            ScenarioGenerator::new(&config, 1).generate(),
            Err(Error::Config(config::Error::InvalidParameter { .. }))
        ));
    }
}
