//! Lazy driver for per-row filters

use tracing::{debug, warn};

use super::read_header;
use crate::config::MalformedRowPolicy;
use crate::source::{IntoLine, Line};
use crate::traits::{Result, RowFilter};

/// Lazy sample produced by a [`RowFilter`]
///
/// Yields the header, then every row the filter keeps, pulling exactly one
/// input line per decision. After an error item the iterator is exhausted.
#[derive(Debug)]
pub struct FilterSample<I, F> {
    lines: I,
    filter: F,
    header: Option<Line>,
    policy: MalformedRowPolicy,
    /// Physical line number of the last line pulled (header = 1)
    line: u64,
    kept: u64,
    skipped: u64,
    done: bool,
}

impl<I, F> FilterSample<I, F>
where
    I: Iterator,
    I::Item: IntoLine,
    F: RowFilter,
{
    /// Read the header from `lines` and build the filter from it
    ///
    /// Fails with `EmptySource` if there is no header, or with whatever error
    /// `build` returns.
    pub fn new<L, B>(lines: L, build: B) -> Result<Self>
    where
        L: IntoIterator<IntoIter = I>,
        B: FnOnce(&str) -> Result<F>,
    {
        let mut lines = lines.into_iter();
        let header = read_header(&mut lines)?;
        let filter = build(&header)?;
        debug!(sampler = filter.name(), seed = filter.seed(), "row filter ready");
        Ok(Self {
            lines,
            filter,
            header: Some(header),
            policy: MalformedRowPolicy::default(),
            line: 1,
            kept: 0,
            skipped: 0,
            done: false,
        })
    }

    /// Set how rows that cannot be parsed are handled
    pub fn with_malformed_rows(mut self, policy: MalformedRowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Number of rows (not counting the header) pulled so far
    pub fn rows_seen(&self) -> u64 {
        self.line.saturating_sub(1)
    }

    /// Number of rows emitted so far
    pub fn rows_kept(&self) -> u64 {
        self.kept
    }

    /// Number of malformed rows stepped over
    pub fn rows_skipped(&self) -> u64 {
        self.skipped
    }

    pub fn row_filter(&self) -> &F {
        &self.filter
    }

    fn finish(&mut self) {
        self.done = true;
        debug!(
            sampler = self.filter.name(),
            rows_seen = self.rows_seen(),
            rows_kept = self.kept,
            rows_skipped = self.skipped,
            "sample complete"
        );
    }
}

impl<I, F> Iterator for FilterSample<I, F>
where
    I: Iterator,
    I::Item: IntoLine,
    F: RowFilter,
{
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(header) = self.header.take() {
            return Some(Ok(header));
        }
        if self.done {
            return None;
        }

        loop {
            let Some(item) = self.lines.next() else {
                self.finish();
                return None;
            };
            self.line += 1;

            let row = match item.into_line() {
                Ok(row) => row,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            };

            match self.filter.keep(self.line, &row) {
                Ok(true) => {
                    self.kept += 1;
                    return Some(Ok(row));
                }
                Ok(false) => {}
                Err(err) if err.is_row_error() && self.policy == MalformedRowPolicy::Skip => {
                    warn!(line = self.line, "skipping malformed row: {}", err);
                    self.skipped += 1;
                }
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
