#![forbid(unsafe_code)]

use crate::random::DeterministicStream;
use config::Distribution;

/// Draw values from a parameterized distribution.
pub trait Sample {
    type Output;

    fn sample(&self, stream: &mut DeterministicStream) -> Self::Output;
}

impl Sample for Distribution<i64> {
    type Output = i64;

    fn sample(&self, stream: &mut DeterministicStream) -> i64 {
        match *self {
            Distribution::Exact(value) => value,
            Distribution::Uniform { min, max } => {
                let span = max.wrapping_sub(min);
                if span <= 0 {
                    return min;
                }
                min.wrapping_add(stream.next_i64().rem_euclid(span))
            }
            Distribution::Normal { mean, sd } => {
                if sd == 0 {
                    return mean;
                }
                (stream.next_gaussian() * sd as f64 + mean as f64) as i64
            }
        }
    }
}

impl Sample for Distribution<f64> {
    type Output = f64;

    fn sample(&self, stream: &mut DeterministicStream) -> f64 {
        match *self {
            Distribution::Exact(value) => value,
            Distribution::Uniform { min, max } => {
                if min == max {
                    return min;
                }
                min + stream.next_uniform() * (max - min)
            }
            Distribution::Normal { mean, sd } => {
                if sd == 0.0 {
                    return mean;
                }
                stream.next_gaussian() * sd + mean
            }
        }
    }
}
