#![forbid(unsafe_code)]

use clap::Parser;
use config::Config;
use engine::{Scenario, ScenarioGenerator, write_scenario};
use prefetch_sim::{
    cli::{Cli, Command},
    runner::run_scenarios,
    signals::cancel_on_interrupt,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "jemalloc")]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // NOTE: The verbosity flag takes precedence over the environment variable.
    // `PREFETCH_SIM_LOG` can only refine the level per crate, e.g.
    // `PREFETCH_SIM_LOG=engine=trace prefetch-sim -v run ...`.
    let env_filter = EnvFilter::builder()
        .with_env_var("PREFETCH_SIM_LOG")
        .from_env()?
        .add_directive(cli.verbosity.log_level_filter().as_str().parse()?);

    // stdout carries scenarios and summaries
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(layer)
        .with(env_filter)
        .init();

    debug!(?cli);

    match cli.command {
        Command::Generate {
            config,
            seed,
            output,
        } => generate(&config, seed, output.as_deref()),
        Command::Run { scenarios, jobs } => run(scenarios, jobs).await,
    }
}

fn generate(config: &[PathBuf], seed: Option<i64>, output: Option<&Path>) -> anyhow::Result<()> {
    let config = Config::load_multiple(config)?;
    let seed = seed.or(config.seed).unwrap_or_else(clock_seed);
    info!(seed, total_ticks = config.total_ticks, "generating scenario");

    let scenario = ScenarioGenerator::new(&config, seed).generate()?;
    match output {
        Some(path) => emit(BufWriter::new(File::create(path)?), seed, &scenario)?,
        None => emit(io::stdout().lock(), seed, &scenario)?,
    }
    Ok(())
}

fn emit(mut out: impl Write, seed: i64, scenario: &Scenario) -> io::Result<()> {
    writeln!(out, "# generated with seed {seed}")?;
    write_scenario(scenario, out)
}

fn clock_seed() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as i64)
        .unwrap_or_default()
}

async fn run(scenarios: Vec<PathBuf>, jobs: usize) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let signal_handle = tokio::spawn(cancel_on_interrupt(cancel.clone()));

    let outcomes = run_scenarios(scenarios, jobs, cancel.clone()).await;

    // release the signal handler
    cancel.cancel();
    signal_handle.await??;

    let mut stdout = io::stdout().lock();
    let mut failed = 0;
    for outcome in &outcomes {
        writeln!(stdout, "== {}", outcome.path.display())?;
        match &outcome.result {
            Ok(report) => {
                if report.cancelled {
                    writeln!(stdout, "cancelled after {} ticks", report.ticks)?;
                }
                writeln!(stdout, "{}", report.summary)?;
            }
            Err(err) => {
                failed += 1;
                writeln!(stdout, "error: {err}")?;
            }
        }
    }
    stdout.flush()?;

    if failed > 0 {
        anyhow::bail!("{failed} of {} scenarios failed", outcomes.len());
    }
    Ok(())
}
