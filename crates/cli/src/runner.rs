#![forbid(unsafe_code)]

use engine::{RunReport, Simulation, read_scenario};
use futures::stream::{self, StreamExt};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Engine(#[from] engine::Error),

    #[error("simulation task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result of simulating one scenario file.
#[derive(Debug)]
pub struct Outcome {
    pub path: PathBuf,
    pub result: Result<RunReport, RunError>,
}

/// Simulate every scenario with at most `jobs` running at once.
///
/// Simulations are CPU bound and run on the blocking pool. Outcomes are
/// returned in the order of `paths`.
pub async fn run_scenarios(
    paths: Vec<PathBuf>,
    jobs: usize,
    cancel: CancellationToken,
) -> Vec<Outcome> {
    let jobs = jobs.max(1);
    let tasks = paths.into_iter().enumerate().map(|(index, path)| {
        let cancel = cancel.clone();
        async move {
            let task_path = path.clone();
            let join = tokio::task::spawn_blocking(move || simulate(&task_path, &cancel)).await;
            let result = match join {
                Ok(result) => result.map_err(RunError::from),
                Err(err) => Err(RunError::from(err)),
            };
            (index, Outcome { path, result })
        }
    });

    let mut outcomes: Vec<(usize, Outcome)> = stream::iter(tasks)
        .buffer_unordered(jobs)
        .inspect(|(_, outcome)| {
            if let Err(err) = &outcome.result {
                warn!(path = ?outcome.path, %err, "simulation failed");
            }
        })
        .collect()
        .await;

    outcomes.sort_by_key(|(index, _)| *index);
    outcomes.into_iter().map(|(_, outcome)| outcome).collect()
}

/// Read and play out a single scenario file.
pub fn simulate(path: &Path, cancel: &CancellationToken) -> Result<RunReport, engine::Error> {
    let scenario = read_scenario(BufReader::new(File::open(path)?))?;
    debug!(
        ?path,
        total_ticks = scenario.total_ticks,
        requests = scenario.requests.len(),
        algorithm = %scenario.algorithm,
        "scenario loaded"
    );
    let mut simulation = Simulation::from_scenario(&scenario)?;
    Ok(simulation.run_until(cancel))
}
