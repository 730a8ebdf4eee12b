//! Core traits and error types for row sampling
//!
//! The per-row algorithms (Bernoulli and hash-keyed) implement [`RowFilter`]
//! and share one lazy driver, [`FilterSample`](crate::sampling::FilterSample).
//! Reservoir sampling needs the whole stream before it can emit anything, so
//! it has its own driver.

use std::io;

use thiserror::Error;

/// Error raised while configuring or running a sampler
#[derive(Debug, Error)]
pub enum SampleError {
    /// A numeric parameter is outside its domain
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The keyed column does not appear in the header
    #[error("column '{column}' not found in header")]
    ColumnNotFound { column: String },

    /// A row has too few fields to reach the keyed column
    ///
    /// `line` is the 1-based physical line in the input (the header is line 1).
    #[error("line {line}: expected a field at index {column_index}, row has {fields} field(s)")]
    RowParse {
        line: u64,
        column_index: usize,
        fields: usize,
    },

    /// The line source did not yield a header
    #[error("input is empty: no header line")]
    EmptySource,

    /// The line source could not be opened or fetched
    #[error("input '{location}' is unavailable: {reason}")]
    SourceUnavailable { location: String, reason: String },

    /// A line could not be split into fields
    #[error("failed to split line {line} into fields: {reason}")]
    Csv { line: u64, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl SampleError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        SampleError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// True for errors that only concern a single row
    ///
    /// These are the ones [`MalformedRowPolicy::Skip`](crate::config::MalformedRowPolicy)
    /// may step over.
    pub fn is_row_error(&self) -> bool {
        matches!(self, SampleError::RowParse { .. } | SampleError::Csv { .. })
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = SampleError> = std::result::Result<T, E>;

/// Independent keep/drop decision for each row
///
/// Implementors see every row exactly once and in input order. Any random
/// state must advance once per call, whatever the outcome, so that the same
/// seed replays the same decisions.
pub trait RowFilter {
    /// Decide whether to keep `row`
    ///
    /// `line` is the row's 1-based physical line number, for error reporting.
    fn keep(&mut self, line: u64, row: &str) -> Result<bool>;

    /// Short name used in log output
    fn name(&self) -> &'static str;

    /// Effective seed the filter draws or hashes with
    fn seed(&self) -> u64;
}

impl<F: RowFilter + ?Sized> RowFilter for Box<F> {
    fn keep(&mut self, line: u64, row: &str) -> Result<bool> {
        (**self).keep(line, row)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn seed(&self) -> u64 {
        (**self).seed()
    }
}
