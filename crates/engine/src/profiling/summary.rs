#![forbid(unsafe_code)]

use std::fmt;

/// End-of-run figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub requests: usize,
    pub hits: usize,
    /// Requests that arrived after their deadline.
    pub misses: usize,
    /// Requests that never arrived.
    pub unfinished: usize,
    pub mean_response_time: Option<f64>,
    pub mean_data_age: Option<f64>,
    pub data_volume: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "requests       {}", self.requests)?;
        writeln!(f, "cache hits     {}", self.hits)?;
        writeln!(f, "misses         {}", self.misses)?;
        writeln!(f, "unfinished     {}", self.unfinished)?;
        writeln!(f, "response time  {}", Ticks(self.mean_response_time))?;
        writeln!(f, "data age       {}", Ticks(self.mean_data_age))?;
        write!(f, "data volume    {} bytes", self.data_volume)
    }
}

struct Ticks(Option<f64>);

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.2} ticks"),
            None => f.write_str("-"),
        }
    }
}
