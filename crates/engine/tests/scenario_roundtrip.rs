#![forbid(unsafe_code)]

use config::{AlgorithmKind, Config, Distribution, FixedRequest, RequestSeries};
use engine::{RateTrace, Request, Scenario, ScenarioGenerator, Simulation, read_scenario, write_scenario};
use proptest::prelude::*;
use std::fs::File;
use std::io::{BufReader, BufWriter};

fn config() -> Config {
    let mut config = Config {
        total_ticks: 5_000,
        look_ahead: Some(800),
        ..Config::default()
    };
    config.network.byterate = Distribution::normal(120, 40).unwrap();
    config.network.slot_length = Distribution::uniform(100, 400).unwrap();
    config.network.uptime = 0.9;
    config.network.relative_jitter = Distribution::uniform(-0.1, 0.1).unwrap();
    config.prediction.relative_time_error = Distribution::normal(0.0, 0.2).unwrap();
    config.prediction.absolute_amplitude_error = Distribution::uniform(-10, 10).unwrap();
    config.algorithm.name = AlgorithmKind::RespectRatePrediction;
    config
        .algorithm
        .parameters
        .insert("alpha".to_owned(), "0.75".to_owned());
    config.request_series.push(RequestSeries {
        interval: Distribution::uniform(50, 250).unwrap(),
        size: Distribution::normal(2_000, 500).unwrap(),
        byterate: Distribution::Exact(40),
        start: Distribution::Exact(200),
        ..RequestSeries::default()
    });
    config.requests.push(FixedRequest {
        deadline: 4_000,
        data: 10_000,
        byterate: 100,
    });
    config
}

#[test]
fn generation_is_reproducible() {
    let config = config();
    let first = ScenarioGenerator::new(&config, 1_234)
        .generate()
        .unwrap()
        .to_text()
        .unwrap();
    let second = ScenarioGenerator::new(&config, 1_234)
        .generate()
        .unwrap()
        .to_text()
        .unwrap();
    assert_eq!(first, second);
    assert!(first.starts_with("0 algorithm respect-rate-prediction\n"));
    assert!(first.ends_with("4999 end\n"));
}

#[test]
fn request_series_does_not_shift_network_draws() {
    let base = config();
    let mut changed = config();
    changed.request_series[0].interval = Distribution::Exact(17);
    changed.request_series[0].size = Distribution::uniform(1, 9).unwrap();

    let a = ScenarioGenerator::new(&base, 7).generate().unwrap();
    let b = ScenarioGenerator::new(&changed, 7).generate().unwrap();
    assert_eq!(a.rate_real, b.rate_real);
    assert_eq!(a.rate_predicted, b.rate_predicted);
    assert_ne!(a.requests, b.requests);
}

#[test]
fn network_does_not_shift_request_draws() {
    let base = config();
    let mut changed = config();
    changed.network.byterate = Distribution::Exact(5);
    changed.network.uptime = 0.5;

    let a = ScenarioGenerator::new(&base, 7).generate().unwrap();
    let b = ScenarioGenerator::new(&changed, 7).generate().unwrap();
    assert_eq!(a.requests, b.requests);
}

#[test]
fn generated_scenario_survives_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.txt");
    let scenario = ScenarioGenerator::new(&config(), 99).generate().unwrap();

    write_scenario(&scenario, BufWriter::new(File::create(&path).unwrap())).unwrap();
    let read = read_scenario(BufReader::new(File::open(&path).unwrap())).unwrap();

    assert_eq!(read, scenario);
    assert_eq!(read.look_ahead, 800);
    assert_eq!(read.algorithm_parameters["alpha"], "0.75");
}

#[test]
fn generated_scenario_runs() {
    let scenario = ScenarioGenerator::new(&config(), 5).generate().unwrap();
    let mut simulation = Simulation::from_scenario(&scenario).unwrap();
    let report = simulation.run_to_end();

    assert_eq!(report.ticks, 5_000);
    assert_eq!(report.summary.requests, scenario.requests.len());
}

#[test]
fn bad_algorithm_parameter_is_rejected() {
    let scenario: Scenario = "0 algorithm ignore-rate-prediction\n\
                              0 algorithm-parameter alpha -1\n\
                              9 end\n"
        .parse()
        .unwrap();
    assert!(Simulation::from_scenario(&scenario).is_err());
}

#[test]
fn parameters_survive_the_text_form_or_are_refused() {
    let mut config = config();
    config
        .algorithm
        .parameters
        .insert("alpha".to_owned(), "0.5#x".to_owned());
    assert!(ScenarioGenerator::new(&config, 3).generate().is_err());

    let mut scenario = ScenarioGenerator::new(&self::config(), 3).generate().unwrap();
    scenario
        .algorithm_parameters
        .insert("note".to_owned(), "fast link".to_owned());
    assert!(scenario.to_text().is_err());

    scenario.algorithm_parameters.remove("note");
    let read: Scenario = scenario.to_text().unwrap().parse().unwrap();
    assert_eq!(read.algorithm_parameters, scenario.algorithm_parameters);
}

fn scenario() -> impl Strategy<Value = Scenario> {
    (1i64..2_000).prop_flat_map(|total_ticks| {
        let tick = 0..total_ticks;
        (
            Just(total_ticks),
            0i64..5_000,
            prop::collection::vec((tick.clone(), 0u32..10_000), 0..30),
            prop::collection::vec((tick.clone(), 0u32..10_000), 0..30),
            prop::collection::vec((tick, 1u32..100_000, 1u32..1_000), 0..30),
            prop::sample::select(AlgorithmKind::ALL.to_vec()),
            prop::collection::btree_map("[a-z]{1,8}", "[0-9.]{1,6}", 0..3),
        )
            .prop_map(
                |(total_ticks, look_ahead, real, predicted, requests, algorithm, parameters)| {
                    let mut requests: Vec<Request> = requests
                        .into_iter()
                        .map(|(deadline, data, byterate)| Request::new(deadline, data, byterate))
                        .collect();
                    requests.sort_by_key(|request| request.deadline);
                    Scenario {
                        total_ticks,
                        look_ahead,
                        rate_real: real.into_iter().collect::<RateTrace>(),
                        rate_predicted: predicted.into_iter().collect(),
                        requests,
                        algorithm,
                        algorithm_parameters: parameters,
                    }
                },
            )
    })
}

proptest! {
    #[test]
    fn written_scenario_reads_back(scenario in scenario()) {
        let text = scenario.to_text().unwrap();
        let read: Scenario = text.parse().unwrap();
        prop_assert_eq!(read, scenario);
    }
}
