#![forbid(unsafe_code)]

use crate::domain::{Byterate, RateTrace, Request, Tick};
use crate::error::{Error, ScenarioError};
use crate::scenario::Scenario;
use config::AlgorithmKind;
use std::collections::BTreeMap;
use std::io::BufRead;
use std::str::FromStr;
use tracing::trace;

/// Read a scenario from its text form.
///
/// Every line is `<tick> <command> <args...>`; `#` starts a comment. Ticks
/// must not decrease and nothing may follow `end`. Without `end` the
/// scenario lasts until the last tick mentioned.
pub fn read_scenario<R: BufRead>(input: R) -> Result<Scenario, Error> {
    let mut parser = Parser::default();
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        parser.line(&line).map_err(|source| Error::Scenario {
            line: index + 1,
            source,
        })?;
    }
    Ok(parser.finish())
}

#[derive(Default)]
struct Parser {
    last_tick: Option<Tick>,
    end: Option<Tick>,
    look_ahead: Option<Tick>,
    algorithm: AlgorithmKind,
    algorithm_parameters: BTreeMap<String, String>,
    rate_real: RateTrace,
    rate_predicted: RateTrace,
    requests: Vec<Request>,
}

impl Parser {
    fn line(&mut self, line: &str) -> Result<(), ScenarioError> {
        let content = line.split('#').next().unwrap_or_default();
        let mut tokens = content.split_whitespace();
        let Some(first) = tokens.next() else {
            return Ok(());
        };

        let tick: Tick = first
            .parse()
            .map_err(|_| ScenarioError::InvalidTick(first.to_owned()))?;
        if tick < 0 {
            return Err(ScenarioError::NegativeTick(tick));
        }
        if let Some(previous) = self.last_tick
            && tick < previous
        {
            return Err(ScenarioError::OutOfOrder {
                previous,
                found: tick,
            });
        }
        if self.end.is_some() {
            return Err(ScenarioError::AfterEnd);
        }

        let command = tokens.next().ok_or(ScenarioError::MissingCommand)?;
        let args: Vec<&str> = tokens.collect();

        match command {
            "end" => {
                let [] = usage(&args, "<tick> end")?;
                self.end = Some(tick);
            }
            "request" => {
                let [data, byterate] = usage(&args, "<tick> request <data> <byterate>")?;
                let data: u32 = number(data)?;
                let byterate: Byterate = number(byterate)?;
                if data == 0 || byterate == 0 {
                    return Err(ScenarioError::InvalidRequest);
                }
                self.requests.push(Request::new(tick, data, byterate));
            }
            "rate-real" => {
                let [rate] = usage(&args, "<tick> rate-real <rate>")?;
                self.rate_real.insert(tick, number(rate)?);
            }
            "rate-prediction" => {
                let [rate] = usage(&args, "<tick> rate-prediction <rate>")?;
                self.rate_predicted.insert(tick, number(rate)?);
            }
            "algorithm" => {
                at_start(tick, "algorithm")?;
                let [name] = usage(&args, "0 algorithm <name>")?;
                self.algorithm = name
                    .parse()
                    .map_err(|_| ScenarioError::UnknownAlgorithm(name.to_owned()))?;
            }
            "algorithm-parameter" => {
                at_start(tick, "algorithm-parameter")?;
                let [key, value] = usage(&args, "0 algorithm-parameter <key> <value>")?;
                self.algorithm_parameters
                    .insert(key.to_owned(), value.to_owned());
            }
            "look-ahead" => {
                at_start(tick, "look-ahead")?;
                let [text] = usage(&args, "0 look-ahead <ticks>")?;
                let look_ahead: Tick = number(text)?;
                if look_ahead < 0 {
                    return Err(ScenarioError::InvalidNumber(text.to_owned()));
                }
                self.look_ahead = Some(look_ahead);
            }
            other => return Err(ScenarioError::UnknownCommand(other.to_owned())),
        }

        self.last_tick = Some(tick);
        Ok(())
    }

    fn finish(self) -> Scenario {
        let end = self.end.or(self.last_tick).unwrap_or(0);
        let total_ticks = end + 1;
        trace!(
            total_ticks,
            requests = self.requests.len(),
            "scenario read"
        );
        Scenario {
            total_ticks,
            look_ahead: self.look_ahead.unwrap_or(total_ticks),
            rate_real: self.rate_real,
            rate_predicted: self.rate_predicted,
            requests: self.requests,
            algorithm: self.algorithm,
            algorithm_parameters: self.algorithm_parameters,
        }
    }
}

fn usage<'a, const N: usize>(
    args: &[&'a str],
    usage: &'static str,
) -> Result<[&'a str; N], ScenarioError> {
    <[&str; N]>::try_from(args).map_err(|_| ScenarioError::Usage(usage))
}

fn at_start(tick: Tick, command: &'static str) -> Result<(), ScenarioError> {
    if tick == 0 {
        Ok(())
    } else {
        Err(ScenarioError::NotAtStart(command))
    }
}

fn number<T: FromStr>(text: &str) -> Result<T, ScenarioError> {
    text.parse()
        .map_err(|_| ScenarioError::InvalidNumber(text.to_owned()))
}
