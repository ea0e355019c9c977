#![forbid(unsafe_code)]

use config::AlgorithmKind;
use engine::prefetch::{Algorithm, IgnoreRatePrediction, NullAlgorithm, StartAtDeadline};
use engine::{Request, Simulation, SimulationBuilder, Tick};
use proptest::prelude::*;
use tokio_util::sync::CancellationToken;

#[test]
fn prefetched_request_is_a_hit() {
    let mut simulation = SimulationBuilder::new(200)
        .request(Request::new(100, 50, 10))
        .algorithm(IgnoreRatePrediction::default())
        .build();
    let (id, _) = simulation.requests().iter().next().unwrap();

    let report = simulation.run_to_end();

    // Start 89, first byte at 91, five ticks of 10 bytes, read back at 96.
    assert_eq!(simulation.profiler().fetch_start(id), Some(89));
    assert_eq!(simulation.profiler().fetch_finish(id), Some(96));
    assert_eq!(report.ticks, 200);
    assert!(!report.cancelled);
    assert_eq!(report.summary.hits, 1);
    assert_eq!(report.summary.misses, 0);
    assert_eq!(report.summary.unfinished, 0);
    assert_eq!(report.summary.mean_response_time, Some(0.0));
    assert_eq!(report.summary.mean_data_age, Some(11.0));
    assert_eq!(report.summary.data_volume, 50);
}

#[test]
fn null_algorithm_fetches_on_demand() {
    let mut simulation = SimulationBuilder::new(100)
        .request(Request::new(50, 30, 10))
        .algorithm(NullAlgorithm)
        .build();

    let summary = simulation.run_to_end().summary;

    // Urged at 50, issued at 51, delivered at 55, seen by the client at 56.
    assert_eq!(summary.hits, 0);
    assert_eq!(summary.misses, 1);
    assert_eq!(simulation.profiler().response_times(), &[6]);
    assert_eq!(simulation.profiler().data_ages(), &[5]);
}

#[test]
fn real_byterate_throttles_the_transfer() {
    let mut simulation = SimulationBuilder::new(200)
        .request(Request::new(100, 20, 10))
        .rate_real([(0, 2)].into_iter().collect())
        .algorithm(StartAtDeadline)
        .build();

    simulation.run_to_end();

    assert_eq!(simulation.profiler().response_times(), &[12]);
    assert_eq!(simulation.profiler().data_ages(), &[12]);
}

#[test]
fn stalled_link_leaves_requests_unfinished() {
    let mut simulation = SimulationBuilder::new(50)
        .requests([Request::new(10, 5, 1), Request::new(20, 5, 1)])
        .rate_real([(0, 0)].into_iter().collect())
        .algorithm(StartAtDeadline)
        .build();

    let summary = simulation.run_to_end().summary;
    assert_eq!(summary.requests, 2);
    assert_eq!(summary.unfinished, 2);
    assert_eq!(summary.mean_response_time, None);
    assert!(simulation.cache().is_empty());
}

#[test]
fn tick_stops_after_the_last_tick() {
    let mut simulation = SimulationBuilder::new(3).build();
    let ticks: Vec<Tick> = std::iter::from_fn(|| simulation.tick())
        .map(|report| report.tick)
        .collect();
    assert_eq!(ticks, vec![0, 1, 2]);
    assert!(simulation.is_finished());
    assert!(simulation.tick().is_none());
}

#[test]
fn cancelled_run_reports_progress() {
    let mut simulation = SimulationBuilder::new(1_000)
        .request(Request::new(500, 10, 1))
        .build();
    for _ in 0..10 {
        simulation.tick();
    }

    let token = CancellationToken::new();
    token.cancel();
    let report = simulation.run_until(&token);

    assert!(report.cancelled);
    assert_eq!(report.ticks, 10);
    assert_eq!(simulation.current_tick(), 10);
    assert_eq!(report.summary.unfinished, 1);
}

fn request() -> impl Strategy<Value = Request> {
    (0i64..300, 1u32..200, 1u32..50)
        .prop_map(|(deadline, data, byterate)| Request::new(deadline, data, byterate))
}

fn algorithm() -> impl Strategy<Value = AlgorithmKind> {
    prop::sample::select(AlgorithmKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn runs_stay_consistent(
        requests in prop::collection::vec(request(), 0..20),
        real in prop::collection::vec((0i64..400, 0u32..60), 0..10),
        predicted in prop::collection::vec((0i64..400, 0u32..60), 0..10),
        look_ahead in 0i64..400,
        kind in algorithm(),
    ) {
        let mut simulation: Simulation = SimulationBuilder::new(400)
            .requests(requests.iter().copied())
            .rate_real(real.into_iter().collect())
            .rate_predicted(predicted.into_iter().collect())
            .look_ahead(look_ahead)
            .algorithm(Algorithm::new(kind))
            .build();

        while let Some(report) = simulation.tick() {
            for (id, _) in simulation.fetch().schedule().iter() {
                let request = simulation.requests().get(id).unwrap();
                prop_assert!(request.deadline - report.tick <= look_ahead);
                prop_assert!(simulation.fetch().is_pending(id));
            }
            prop_assert!(report.cached + report.pending == requests.len());
        }

        for (id, _) in simulation.requests().iter() {
            let profiler = simulation.profiler();
            match simulation.cache().get(id) {
                Some(record) => {
                    prop_assert_eq!(profiler.fetch_start(id), Some(record.issue_tick));
                    prop_assert_eq!(profiler.fetch_finish(id), Some(record.completion_tick));
                    prop_assert!(record.issue_tick < record.completion_tick);
                }
                None => prop_assert!(profiler.fetch_finish(id).is_none()),
            }
        }

        let summary = simulation.summary();
        let arrivals = simulation.profiler().response_times().len();
        prop_assert_eq!(summary.unfinished + arrivals, requests.len());
        prop_assert!(summary.hits + summary.misses <= arrivals);
        prop_assert!(simulation.profiler().response_times().iter().all(|rt| *rt >= 0));
    }
}
