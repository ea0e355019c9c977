#![forbid(unsafe_code)]

use crate::domain::Tick;
use crate::scenario::Scenario;
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Write `scenario` in the line-oriented text format, grouped by tick.
///
/// Tick 0 starts with the algorithm, its parameters and the look-ahead time.
/// Within a tick, real rates come before predicted rates, which come before
/// requests. `end` is always the last line.
///
/// Fails with [`io::ErrorKind::InvalidInput`] before writing anything if the
/// text could not be read back as the same scenario.
pub fn write_scenario<W: Write>(scenario: &Scenario, mut out: W) -> io::Result<()> {
    check(scenario)?;

    let mut lines: BTreeMap<Tick, Vec<String>> = BTreeMap::new();
    let mut add = |tick: Tick, line: String| lines.entry(tick).or_default().push(line);

    add(0, format!("algorithm {}", scenario.algorithm));
    for (key, value) in &scenario.algorithm_parameters {
        add(0, format!("algorithm-parameter {key} {value}"));
    }
    add(0, format!("look-ahead {}", scenario.look_ahead));

    for (tick, rate) in scenario.rate_real.iter() {
        add(tick, format!("rate-real {rate}"));
    }
    for (tick, rate) in scenario.rate_predicted.iter() {
        add(tick, format!("rate-prediction {rate}"));
    }
    for request in &scenario.requests {
        add(
            request.deadline,
            format!("request {} {}", request.data, request.available_byterate),
        );
    }

    for (tick, lines) in &lines {
        for line in lines {
            writeln!(out, "{tick} {line}")?;
        }
    }
    writeln!(out, "{} end", scenario.total_ticks - 1)?;
    out.flush()
}

fn check(scenario: &Scenario) -> io::Result<()> {
    let invalid = |message: String| io::Error::new(io::ErrorKind::InvalidInput, message);

    if scenario.total_ticks < 1 {
        return Err(invalid(format!(
            "total ticks must be positive, got {}",
            scenario.total_ticks
        )));
    }
    if scenario.look_ahead < 0 {
        return Err(invalid(format!(
            "look-ahead time must not be negative, got {}",
            scenario.look_ahead
        )));
    }
    for (key, value) in &scenario.algorithm_parameters {
        config::check_parameter(key, value).map_err(|err| invalid(err.to_string()))?;
    }

    let in_range = |tick: Tick| (0..scenario.total_ticks).contains(&tick);
    let ticks = scenario
        .rate_real
        .iter()
        .chain(scenario.rate_predicted.iter())
        .map(|(tick, _)| tick)
        .chain(scenario.requests.iter().map(|request| request.deadline));
    for tick in ticks {
        if !in_range(tick) {
            return Err(invalid(format!(
                "tick {tick} outside of 0..{}",
                scenario.total_ticks
            )));
        }
    }
    if scenario
        .requests
        .iter()
        .any(|request| request.data == 0 || request.available_byterate == 0)
    {
        return Err(invalid(
            "requests need a positive data size and byterate".to_owned(),
        ));
    }
    Ok(())
}
