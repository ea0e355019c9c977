use crate::Error;
use std::fmt;
use std::str::FromStr;

const EXACT: &[&str] = &["exact", "exactly", "ex", "="];
const UNIFORM: &[&str] = &["uniform", "unif", "u"];
const NORMAL: &[&str] = &["normal", "norm", "n", "gaussian", "gauss", "g", "~"];

/// Numeric kinds a [`Distribution`] can be parameterized with.
pub trait Quantity: Copy + PartialOrd + fmt::Display + FromStr + sealed::Sealed {
    const ZERO: Self;

    /// `min + (max - min) / 2`, truncated for integers.
    fn midpoint(min: Self, max: Self) -> Self;

    fn is_valid(self) -> bool {
        true
    }
}

impl Quantity for i64 {
    const ZERO: Self = 0;

    fn midpoint(min: Self, max: Self) -> Self {
        let (min, max) = (i128::from(min), i128::from(max));
        (min + (max - min) / 2) as i64
    }
}

impl Quantity for f64 {
    const ZERO: Self = 0.0;

    fn midpoint(min: Self, max: Self) -> Self {
        min + (max - min) / 2.0
    }

    fn is_valid(self) -> bool {
        self.is_finite()
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}

/// A parameterized source of numbers.
///
/// The textual form is `<kind>/<args...>`, e.g. `uniform/10/20` or
/// `normal/100/15`. A bare number is an exact value. Sampling lives with the
/// random streams in the engine; this type only carries the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution<T> {
    /// Always yields the value.
    Exact(T),
    /// Uniform over `[min, max)`; yields `min` when the range is empty.
    Uniform { min: T, max: T },
    /// Gaussian with the given mean and standard deviation.
    Normal { mean: T, sd: T },
}

impl<T: Quantity> Distribution<T> {
    pub fn exact(value: T) -> Self {
        Self::Exact(value)
    }

    pub fn uniform(min: T, max: T) -> Result<Self, Error> {
        if min > max {
            return Err(Error::InvalidUniformRange {
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self::Uniform { min, max })
    }

    pub fn normal(mean: T, sd: T) -> Result<Self, Error> {
        if sd < T::ZERO {
            return Err(Error::NegativeDeviation(sd.to_string()));
        }
        Ok(Self::Normal { mean, sd })
    }

    /// Expected value of the distribution.
    pub fn mean(&self) -> T {
        match *self {
            Self::Exact(value) => value,
            Self::Uniform { min, max } => T::midpoint(min, max),
            Self::Normal { mean, .. } => mean,
        }
    }
}

impl<T: Quantity> Default for Distribution<T> {
    fn default() -> Self {
        Self::Exact(T::ZERO)
    }
}

impl<T: Quantity> FromStr for Distribution<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(Error::EmptyDistribution);
        }

        let mut parts = text.split('/');
        let kind = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        if EXACT.contains(&kind) {
            let [value] = expect_args("exact", &args)?;
            Ok(Self::Exact(parse_quantity(value)?))
        } else if UNIFORM.contains(&kind) {
            let [min, max] = expect_args("uniform", &args)?;
            Self::uniform(parse_quantity(min)?, parse_quantity(max)?)
        } else if NORMAL.contains(&kind) {
            let [mean, sd] = expect_args("normal", &args)?;
            Self::normal(parse_quantity(mean)?, parse_quantity(sd)?)
        } else if args.is_empty() {
            Ok(Self::Exact(parse_quantity(kind)?))
        } else {
            Err(Error::UnknownDistribution(kind.to_owned()))
        }
    }
}

impl<T: Quantity> fmt::Display for Distribution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(value) => write!(f, "exact/{value}"),
            Self::Uniform { min, max } => write!(f, "uniform/{min}/{max}"),
            Self::Normal { mean, sd } => write!(f, "normal/{mean}/{sd}"),
        }
    }
}

fn expect_args<'a, const N: usize>(
    kind: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], Error> {
    <[&str; N]>::try_from(args).map_err(|_| Error::DistributionArity {
        kind,
        expected: N,
        found: args.len(),
    })
}

fn parse_quantity<T: Quantity>(text: &str) -> Result<T, Error> {
    text.parse::<T>()
        .ok()
        .filter(|value| value.is_valid())
        .ok_or_else(|| Error::InvalidNumber(text.to_owned()))
}
