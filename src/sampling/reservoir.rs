//! Reservoir sampling for uniform random sampling from streams
//!
//! Reservoir sampling maintains a fixed-size uniform random sample from
//! a stream of unknown length. Each item in the stream has equal probability
//! of being in the final sample.

use tracing::debug;

use super::read_header;
use crate::random::{resolve_seed, SampleRng};
use crate::source::{IntoLine, Line};
use crate::traits::Result;

/// Reservoir using Algorithm R
///
/// Maintains a uniform random sample of fixed size from a stream of arbitrary length.
/// Each item in the stream has probability k/n of being in the final sample,
/// where k is the reservoir size and n is the total number of items seen.
/// Items are tagged with their arrival index so the sample can be returned
/// in stream order.
///
/// # Algorithm
///
/// Algorithm R (Vitter, 1985):
/// 1. Fill reservoir with the first k items (arrival indices 0..k)
/// 2. For each subsequent item at arrival index i:
///    - Generate random j in [0, i]
///    - If j < k, replace reservoir[j] with item i
///
/// No random draw happens while the reservoir is filling.
///
/// # Example
///
/// ```
/// use csvsample::sampling::Reservoir;
///
/// let mut reservoir = Reservoir::<i32>::with_seed(5, 42);
///
/// // Stream 100 items
/// for i in 0..100 {
///     reservoir.add(i);
/// }
///
/// // Uniform random sample of 5 items, in arrival order
/// let sample = reservoir.into_ordered();
/// assert_eq!(sample.len(), 5);
/// assert!(sample.windows(2).all(|w| w[0] < w[1]));
/// ```
#[derive(Clone, Debug)]
pub struct Reservoir<T> {
    /// Maximum sample size
    capacity: usize,
    /// Current sample as (arrival index, item)
    slots: Vec<(u64, T)>,
    /// Number of items seen
    count: u64,
    /// Random number generator
    rng: SampleRng,
}

impl<T> Reservoir<T> {
    /// Create a new reservoir with given capacity and seed
    ///
    /// A capacity of zero is allowed and keeps nothing.
    pub fn with_seed(capacity: usize, seed: u64) -> Self {
        Self {
            capacity,
            // Large sizes are usually an upper bound, not an expectation
            slots: Vec::with_capacity(capacity.min(1 << 16)),
            count: 0,
            rng: SampleRng::new(seed),
        }
    }

    /// Add an item to the reservoir
    pub fn add(&mut self, item: T) {
        let index = self.count;
        self.count += 1;

        if self.slots.len() < self.capacity {
            // Reservoir not full - just add
            self.slots.push((index, item));
        } else if self.capacity > 0 {
            // Reservoir full - maybe replace
            let j = self.rng.below_inclusive(index);
            if j < self.capacity as u64 {
                self.slots[j as usize] = (index, item);
            }
        }
    }

    /// Current sample with arrival indices, in slot order
    pub fn slots(&self) -> &[(u64, T)] {
        &self.slots
    }

    /// Consume the reservoir and return the sample in arrival order
    pub fn into_ordered(mut self) -> Vec<T> {
        self.slots.sort_unstable_by_key(|&(index, _)| index);
        self.slots.into_iter().map(|(_, item)| item).collect()
    }

    /// Get the reservoir capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the current sample size
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if reservoir is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Get the number of items seen
    pub fn items_seen(&self) -> u64 {
        self.count
    }

    /// Effective seed of the generator
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

#[derive(Debug)]
enum Phase {
    /// Pulling the whole stream into the reservoir
    Filling(Reservoir<Line>),
    /// Emitting the ordered sample
    Draining(std::vec::IntoIter<Line>),
    Done,
}

/// Lazy reservoir sample over a line stream
///
/// Yields the header immediately. The first row request then consumes the
/// entire input, since the final selection is unknown until the stream ends,
/// and the sample is emitted in original order.
///
/// # Example
///
/// ```
/// use csvsample::sampling::ReservoirSample;
///
/// let lines = ["n", "1", "2", "3"];
/// let out: Vec<String> = ReservoirSample::new(lines, 10, Some(1))
///     .unwrap()
///     .map(|line| line.unwrap())
///     .collect();
/// assert_eq!(out, ["n", "1", "2", "3"]);
/// ```
#[derive(Debug)]
pub struct ReservoirSample<I> {
    lines: I,
    header: Option<Line>,
    phase: Phase,
}

impl<I> ReservoirSample<I>
where
    I: Iterator,
    I::Item: IntoLine,
{
    /// Read the header and prepare a reservoir of `size` rows
    pub fn new<L>(lines: L, size: usize, seed: Option<u64>) -> Result<Self>
    where
        L: IntoIterator<IntoIter = I>,
    {
        let mut lines = lines.into_iter();
        let header = read_header(&mut lines)?;
        let reservoir = Reservoir::with_seed(size, resolve_seed(seed));
        debug!(
            size = reservoir.capacity(),
            seed = reservoir.seed(),
            "reservoir sampler"
        );

        Ok(Self {
            lines,
            header: Some(header),
            phase: Phase::Filling(reservoir),
        })
    }

    fn fill(&mut self, mut reservoir: Reservoir<Line>) -> Result<Vec<Line>> {
        for item in self.lines.by_ref() {
            reservoir.add(item.into_line()?);
        }
        debug!(
            sampler = "reservoir",
            rows_seen = reservoir.items_seen(),
            rows_kept = reservoir.len(),
            "sample complete"
        );
        Ok(reservoir.into_ordered())
    }
}

impl<I> Iterator for ReservoirSample<I>
where
    I: Iterator,
    I::Item: IntoLine,
{
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(header) = self.header.take() {
            return Some(Ok(header));
        }

        loop {
            match std::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Filling(reservoir) => match self.fill(reservoir) {
                    Ok(rows) => self.phase = Phase::Draining(rows.into_iter()),
                    Err(err) => return Some(Err(err)),
                },
                Phase::Draining(mut rows) => {
                    let row = rows.next()?;
                    self.phase = Phase::Draining(rows);
                    return Some(Ok(row));
                }
                Phase::Done => return None,
            }
        }
    }
}
