#![forbid(unsafe_code)]

use crate::domain::{Request, RequestId, Tick};
use crate::error::Error;
use crate::prediction::RatePredictionService;
use crate::prefetch::{IgnoreRatePrediction, NullAlgorithm, RespectRatePrediction, StartAtDeadline};
use crate::stores::Schedule;
use config::AlgorithmKind;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Ticks reserved for connection setup before a fetch can move data.
pub const CONNECTION_OVERHEAD: Tick = 5;

pub trait PrefetchAlgorithm: Send + Sync {
    /// Compute fetch start ticks for the admitted requests. Must not depend
    /// on anything but its arguments and configuration.
    fn schedule(
        &self,
        admitted: &[(RequestId, Request)],
        oracle: &dyn RatePredictionService,
    ) -> Schedule;

    /// Apply string-keyed parameters. Called before the first `schedule`.
    fn configure(&mut self, parameters: &BTreeMap<String, String>) -> Result<(), Error> {
        let _ = parameters;
        Ok(())
    }
}

/// The built-in algorithms, selectable by [`AlgorithmKind`].
#[derive(Debug, Clone)]
pub enum Algorithm {
    Null(NullAlgorithm),
    StartAtDeadline(StartAtDeadline),
    IgnoreRatePrediction(IgnoreRatePrediction),
    RespectRatePrediction(RespectRatePrediction),
}

impl Algorithm {
    pub fn new(kind: AlgorithmKind) -> Self {
        match kind {
            AlgorithmKind::Null => Self::Null(NullAlgorithm),
            AlgorithmKind::StartAtDeadline => Self::StartAtDeadline(StartAtDeadline),
            AlgorithmKind::IgnoreRatePrediction => {
                Self::IgnoreRatePrediction(IgnoreRatePrediction::default())
            }
            AlgorithmKind::RespectRatePrediction => {
                Self::RespectRatePrediction(RespectRatePrediction::default())
            }
        }
    }

    /// Build and configure in one step.
    pub fn configured(
        kind: AlgorithmKind,
        parameters: &BTreeMap<String, String>,
    ) -> Result<Self, Error> {
        let mut algorithm = Self::new(kind);
        algorithm.configure(parameters)?;
        Ok(algorithm)
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Self::Null(_) => AlgorithmKind::Null,
            Self::StartAtDeadline(_) => AlgorithmKind::StartAtDeadline,
            Self::IgnoreRatePrediction(_) => AlgorithmKind::IgnoreRatePrediction,
            Self::RespectRatePrediction(_) => AlgorithmKind::RespectRatePrediction,
        }
    }

    fn as_dyn(&self) -> &dyn PrefetchAlgorithm {
        match self {
            Self::Null(inner) => inner,
            Self::StartAtDeadline(inner) => inner,
            Self::IgnoreRatePrediction(inner) => inner,
            Self::RespectRatePrediction(inner) => inner,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn PrefetchAlgorithm {
        match self {
            Self::Null(inner) => inner,
            Self::StartAtDeadline(inner) => inner,
            Self::IgnoreRatePrediction(inner) => inner,
            Self::RespectRatePrediction(inner) => inner,
        }
    }
}

impl PrefetchAlgorithm for Algorithm {
    fn schedule(
        &self,
        admitted: &[(RequestId, Request)],
        oracle: &dyn RatePredictionService,
    ) -> Schedule {
        self.as_dyn().schedule(admitted, oracle)
    }

    fn configure(&mut self, parameters: &BTreeMap<String, String>) -> Result<(), Error> {
        self.as_dyn_mut().configure(parameters)
    }
}

/// Latest deadline first; equal deadlines keep id order.
pub(crate) fn by_descending_deadline(
    admitted: &[(RequestId, Request)],
) -> Vec<(RequestId, Request)> {
    let mut sorted = admitted.to_vec();
    sorted.sort_by_key(|(id, request)| (Reverse(request.deadline), *id));
    sorted
}

/// Read the `alpha` safety multiplier, if present.
pub(crate) fn parse_alpha(parameters: &BTreeMap<String, String>) -> Result<Option<f64>, Error> {
    let Some(value) = parameters.get("alpha") else {
        return Ok(None);
    };
    match value.parse::<f64>() {
        Ok(alpha) if alpha.is_finite() && alpha > 0.0 => Ok(Some(alpha)),
        _ => Err(Error::InvalidParameter {
            key: "alpha".to_owned(),
            value: value.clone(),
        }),
    }
}
