//! Sampling configuration
//!
//! [`SampleConfig`] selects an algorithm by name and carries the options
//! shared by all of them. It is what the command line builds and what
//! [`sample`](crate::sample()) dispatches on.

use encoding_rs::{Encoding, UTF_8};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::fields::DEFAULT_DELIMITER;
use crate::sampling::validate_rate;
use crate::source::encoding_for;
use crate::traits::{Result, SampleError};

/// Sampling algorithm and its parameters
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "method", rename_all = "lowercase"))]
pub enum Method {
    /// Keep each row independently with probability `rate`
    Random { rate: f64 },
    /// Keep rows whose `column` value hashes below `rate`
    Hash { rate: f64, column: String },
    /// Keep a uniform sample of exactly `size` rows
    Reservoir { size: usize },
}

impl Method {
    /// Name used on the command line and in logs
    pub fn name(&self) -> &'static str {
        match self {
            Method::Random { .. } => "random",
            Method::Hash { .. } => "hash",
            Method::Reservoir { .. } => "reservoir",
        }
    }
}

/// What to do with a row too short to contain the keyed column
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MalformedRowPolicy {
    /// Stop and report the row
    #[default]
    Fail,
    /// Exclude the row, log it, and continue
    Skip,
}

/// Full description of one sampling run
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SampleConfig {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub method: Method,
    /// Fixed seed, or `None` to draw one from the OS
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed: Option<u64>,
    /// Field delimiter (hash sampling only)
    #[cfg_attr(feature = "serde", serde(default = "default_delimiter"))]
    pub delimiter: u8,
    #[cfg_attr(feature = "serde", serde(default))]
    pub malformed_rows: MalformedRowPolicy,
    /// Encoding label of byte inputs opened by name; UTF-8 when `None`
    #[cfg_attr(feature = "serde", serde(default))]
    pub encoding: Option<String>,
}

#[cfg(feature = "serde")]
fn default_delimiter() -> u8 {
    DEFAULT_DELIMITER
}

impl SampleConfig {
    /// Configuration for a given method with default options
    pub fn new(method: Method) -> Self {
        Self {
            method,
            seed: None,
            delimiter: DEFAULT_DELIMITER,
            malformed_rows: MalformedRowPolicy::Fail,
            encoding: None,
        }
    }

    /// Bernoulli sampling at `rate`
    pub fn random(rate: f64) -> Self {
        Self::new(Method::Random { rate })
    }

    /// Hash-keyed sampling of `column` at `rate`
    pub fn hash(rate: f64, column: impl Into<String>) -> Self {
        Self::new(Method::Hash {
            rate,
            column: column.into(),
        })
    }

    /// Reservoir sampling of `size` rows
    pub fn reservoir(size: usize) -> Self {
        Self::new(Method::Reservoir { size })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.malformed_rows = policy;
        self
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Resolved input encoding
    pub fn input_encoding(&self) -> Result<&'static Encoding> {
        match &self.encoding {
            Some(label) => encoding_for(label),
            None => Ok(UTF_8),
        }
    }

    /// Check parameters without touching any input
    pub fn validate(&self) -> Result<()> {
        match &self.method {
            Method::Random { rate } | Method::Hash { rate, .. } => {
                validate_rate(*rate)?;
            }
            Method::Reservoir { .. } => {}
        }
        validate_delimiter(self.delimiter)?;
        self.input_encoding().map(|_| ())
    }
}

fn validate_delimiter(delimiter: u8) -> Result<()> {
    if !delimiter.is_ascii() || matches!(delimiter, b'"' | b'\n' | b'\r') {
        return Err(SampleError::invalid(
            "delimiter",
            format!("{:?} cannot separate fields", delimiter as char),
        ));
    }
    Ok(())
}
