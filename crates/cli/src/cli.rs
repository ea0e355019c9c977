#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::{Path, PathBuf};

/// prefetch-sim: deterministic prefetch scheduling simulator
///
/// Generates network and workload scenarios from a seed and replays them
/// against a prefetch scheduling algorithm, reporting cache hits, response
/// times and data age.
#[derive(Debug, Parser, Clone)]
#[command(about, long_about, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a scenario from configuration files.
    Generate {
        /// Configuration file. May be repeated; later files override earlier
        /// ones. Without any, the built-in defaults are used.
        #[arg(short, long, value_parser = validate_file)]
        config: Vec<PathBuf>,

        /// Root seed. Overrides the seed in the configuration.
        #[arg(short, long, allow_negative_numbers = true)]
        seed: Option<i64>,

        /// Write the scenario here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Simulate one or more scenario files and print their summaries.
    Run {
        #[arg(required = true, value_parser = validate_file)]
        scenarios: Vec<PathBuf>,

        /// Number of scenarios simulated concurrently.
        #[arg(short, long, default_value_t = 1, value_parser = validate_jobs)]
        jobs: usize,
    },
}

/// Check if the file exists.
#[inline(always)]
fn validate_file(file: &str) -> Result<PathBuf, String> {
    let path = Path::new(file);
    if path.exists() {
        Ok(path.to_owned())
    } else {
        Err(format!("File not found: {:?}", path))
    }
}

#[inline(always)]
fn validate_jobs(jobs: &str) -> Result<usize, String> {
    let jobs: usize = jobs
        .parse()
        .map_err(|_| format!("`{jobs}` is not a valid number of jobs"))?;
    if (1..=1024).contains(&jobs) {
        Ok(jobs)
    } else {
        Err("Number of jobs must be between 1 and 1024".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jobs_candidates() -> impl Strategy<Value = String> {
        prop_oneof![
            2 => (0..2000).prop_map(|i| format!("{}", i)),
            1 => (-100..0).prop_map(|i| format!("{}", i)),
            1 => ".*",
        ]
    }

    proptest! {
        #[test]
        fn test_validate_jobs(jobs in jobs_candidates()) {
            match validate_jobs(&jobs) {
                Ok(n) => prop_assert!((1..=1024).contains(&n)),
                Err(err) => {
                    let error_msg = format!("`{}` is not a valid number of jobs", jobs);
                    prop_assert!(
                        err == error_msg || err == "Number of jobs must be between 1 and 1024"
                    );
                },
            }
        }
    }

    #[test]
    fn parses_generate() {
        let cli = Cli::try_parse_from(["prefetch-sim", "generate", "--seed", "-3"]).unwrap();
        match cli.command {
            Command::Generate {
                config,
                seed,
                output,
            } => {
                assert!(config.is_empty());
                assert_eq!(seed, Some(-3));
                assert_eq!(output, None);
            }
            Command::Run { .. } => panic!("expected generate"),
        }
    }

    #[test]
    fn run_needs_existing_scenarios() {
        assert!(Cli::try_parse_from(["prefetch-sim", "run"]).is_err());
        assert!(Cli::try_parse_from(["prefetch-sim", "run", "/nonexistent/scenario"]).is_err());
    }
}
