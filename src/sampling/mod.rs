//! Stream sampling algorithms
//!
//! Three ways to draw a subset of rows from a line stream whose first line
//! is a header:
//!
//! - [`BernoulliFilter`]: keep each row independently with a fixed probability
//! - [`HashFilter`]: keep a row iff the hash of one of its fields falls below
//!   the rate, so equal keys always share a decision
//! - [`ReservoirSample`]: keep a uniform sample of exactly `k` rows (Algorithm R)
//!
//! All of them yield the header first, preserve input order, and never
//! duplicate a row.
//!
//! # Example
//!
//! ```
//! use csvsample::sampling::{BernoulliFilter, FilterSample};
//!
//! let lines = ["id", "1", "2", "3", "4"];
//! let sample = FilterSample::new(lines, |_header: &str| BernoulliFilter::new(1.0, Some(7))).unwrap();
//!
//! let out: Vec<String> = sample.map(|line| line.unwrap()).collect();
//! assert_eq!(out, ["id", "1", "2", "3", "4"]);
//! ```

mod bernoulli;
mod filter;
mod hash;
mod reservoir;

pub use bernoulli::BernoulliFilter;
pub use filter::FilterSample;
pub use hash::HashFilter;
pub use reservoir::{Reservoir, ReservoirSample};

use crate::source::{IntoLine, Line};
use crate::traits::{Result, SampleError};

/// Check that `rate` is a probability
pub fn validate_rate(rate: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(SampleError::invalid(
            "sample_rate",
            format!("{} is not within [0, 1]", rate),
        ))
    }
}

/// Convert a signed sample size, rejecting negative values
pub fn validate_size(size: i64) -> Result<usize> {
    usize::try_from(size).map_err(|_| {
        SampleError::invalid("sample_size", format!("{} is negative", size))
    })
}

/// Pull the header off a line source
pub(crate) fn read_header<I>(lines: &mut I) -> Result<Line>
where
    I: Iterator,
    I::Item: IntoLine,
{
    lines.next().ok_or(SampleError::EmptySource)?.into_line()
}
