//! Hash-keyed sampling
//!
//! The decision for a row depends only on the seed and the value of one
//! column, so every row sharing that value is kept or dropped together.

use tracing::debug;

use super::validate_rate;
use crate::fields::FieldSplitter;
use crate::random::{resolve_seed, KeyHasher};
use crate::traits::{Result, RowFilter};

/// Keeps rows whose key column hashes below the rate
///
/// # Example
///
/// ```
/// use csvsample::sampling::HashFilter;
/// use csvsample::traits::RowFilter;
///
/// let mut filter = HashFilter::new("user,event", "user", 0.5, Some(1), b',').unwrap();
/// let first = filter.keep(2, "alice,login").unwrap();
/// assert_eq!(filter.keep(3, "alice,logout").unwrap(), first);
/// ```
#[derive(Debug)]
pub struct HashFilter {
    rate: f64,
    column_index: usize,
    hasher: KeyHasher,
    splitter: FieldSplitter,
}

impl HashFilter {
    /// Create a filter keyed on `column` of `header`
    ///
    /// Fails with `InvalidParameter` for a rate outside [0, 1] and with
    /// `ColumnNotFound` if `column` is not a header field.
    pub fn new(
        header: &str,
        column: &str,
        rate: f64,
        seed: Option<u64>,
        delimiter: u8,
    ) -> Result<Self> {
        let rate = validate_rate(rate)?;
        let mut splitter = FieldSplitter::new(delimiter);
        let column_index = splitter.column_index(header, column)?;
        let seed = resolve_seed(seed);
        debug!(rate, column, column_index, "hash sampler");

        Ok(Self {
            rate,
            column_index,
            hasher: KeyHasher::new(seed),
            splitter,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Zero-based position of the key column
    pub fn column_index(&self) -> usize {
        self.column_index
    }

    /// Decision for a key value on its own
    pub fn keep_key(&self, key: &str) -> bool {
        keeps(self.rate, &self.hasher, key)
    }
}

/// Keep rule shared by whole rows and bare keys
#[inline]
fn keeps(rate: f64, hasher: &KeyHasher, key: &str) -> bool {
    // digest / u64::MAX rounds to 1.0 near the top of the range
    rate >= 1.0 || hasher.unit(key) < rate
}

impl RowFilter for HashFilter {
    fn keep(&mut self, line: u64, row: &str) -> Result<bool> {
        let key = self.splitter.field(line, row, self.column_index)?;
        Ok(keeps(self.rate, &self.hasher, key))
    }

    fn name(&self) -> &'static str {
        "hash"
    }

    fn seed(&self) -> u64 {
        self.hasher.seed()
    }
}
