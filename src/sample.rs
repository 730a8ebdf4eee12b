//! Entry points and the lazy result wrapper
//!
//! Each entry point validates its parameters and reads the header eagerly,
//! then returns a [`Sample`] that yields output lines on demand.

use std::io::{self, Cursor, Write};

use tracing::debug;

use crate::config::{MalformedRowPolicy, Method, SampleConfig};
use crate::fields::DEFAULT_DELIMITER;
use crate::sampling::{
    validate_rate, BernoulliFilter, FilterSample, HashFilter, ReservoirSample,
};
use crate::source::{IntoLine, Line};
use crate::traits::Result;

/// Lazy sample of Bernoulli sampling
pub type RandomSample<I> = FilterSample<I, BernoulliFilter>;

/// Lazy sample of hash-keyed sampling
pub type HashSample<I> = FilterSample<I, HashFilter>;

/// Type-erased sample, as returned by [`sample()`]
pub type BoxedSample<'a> = Box<dyn Iterator<Item = Result<Line>> + 'a>;

/// Output of a sampling call
///
/// A one-shot iterator over output lines, header first. It can be consumed
/// line by line, streamed into a writer, or materialized into a buffer.
#[derive(Debug)]
pub struct Sample<I> {
    inner: I,
}

impl<I> Sample<I>
where
    I: Iterator<Item = Result<Line>>,
{
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Write every line followed by `\n`, returning the number of lines
    ///
    /// Stops at the first sampling or write error.
    pub fn write_to<W: Write>(self, out: &mut W) -> Result<u64> {
        let mut written = 0;
        for line in self.inner {
            let line = line?;
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
            written += 1;
        }
        Ok(written)
    }

    /// Materialize into an in-memory buffer positioned at its start
    pub fn to_buf(self) -> Result<Cursor<Vec<u8>>> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        Ok(Cursor::new(buf))
    }

    /// Collect all lines, failing on the first error
    pub fn lines(self) -> Result<Vec<Line>> {
        self.inner.collect()
    }
}

impl<'a, I> Sample<I>
where
    I: Iterator<Item = Result<Line>> + 'a,
{
    /// Erase the concrete iterator type
    pub fn boxed(self) -> Sample<BoxedSample<'a>> {
        Sample::new(Box::new(self.inner))
    }
}

impl<I> Iterator for Sample<I>
where
    I: Iterator<Item = Result<Line>>,
{
    type Item = Result<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Bernoulli sampling: keep each row with probability `rate`
///
/// # Example
///
/// ```
/// use csvsample::random_sample;
///
/// let rows = ["id", "1", "2", "3"];
/// let out = random_sample(rows, 0.0, Some(1)).unwrap().lines().unwrap();
/// assert_eq!(out, ["id"]);
/// ```
pub fn random_sample<L>(
    lines: L,
    rate: f64,
    seed: Option<u64>,
) -> Result<Sample<RandomSample<L::IntoIter>>>
where
    L: IntoIterator,
    L::Item: IntoLine,
{
    let filter = BernoulliFilter::new(rate, seed)?;
    let sample = FilterSample::new(lines, move |_| Ok(filter))?;
    Ok(Sample::new(sample))
}

/// Hash-keyed sampling: keep rows whose `column` value hashes below `rate`
///
/// Rows too short to contain the column fail the sample with `RowParse`.
///
/// # Example
///
/// ```
/// use csvsample::hash_sample;
///
/// let rows = ["user,n", "a,1", "b,2", "a,3"];
/// let out = hash_sample(rows, 1.0, "user", Some(3)).unwrap().lines().unwrap();
/// assert_eq!(out.len(), 4);
/// ```
pub fn hash_sample<L>(
    lines: L,
    rate: f64,
    column: &str,
    seed: Option<u64>,
) -> Result<Sample<HashSample<L::IntoIter>>>
where
    L: IntoIterator,
    L::Item: IntoLine,
{
    hash_sample_with(
        lines,
        rate,
        column,
        seed,
        DEFAULT_DELIMITER,
        MalformedRowPolicy::Fail,
    )
}

fn hash_sample_with<L>(
    lines: L,
    rate: f64,
    column: &str,
    seed: Option<u64>,
    delimiter: u8,
    policy: MalformedRowPolicy,
) -> Result<Sample<HashSample<L::IntoIter>>>
where
    L: IntoIterator,
    L::Item: IntoLine,
{
    validate_rate(rate)?;
    let sample = FilterSample::new(lines, |header| {
        HashFilter::new(header, column, rate, seed, delimiter)
    })?
    .with_malformed_rows(policy);
    Ok(Sample::new(sample))
}

/// Reservoir sampling: keep exactly `min(size, rows)` rows, uniformly
///
/// # Example
///
/// ```
/// use csvsample::reservoir_sample;
///
/// let rows = ["id", "1", "2", "3", "4", "5"];
/// let out = reservoir_sample(rows, 2, Some(9)).unwrap().lines().unwrap();
/// assert_eq!(out.len(), 3);
/// assert_eq!(out[0], "id");
/// ```
pub fn reservoir_sample<L>(
    lines: L,
    size: usize,
    seed: Option<u64>,
) -> Result<Sample<ReservoirSample<L::IntoIter>>>
where
    L: IntoIterator,
    L::Item: IntoLine,
{
    Ok(Sample::new(ReservoirSample::new(lines, size, seed)?))
}

/// Run the algorithm named by `config`
///
/// # Example
///
/// ```
/// use csvsample::{sample, SampleConfig};
///
/// let config = SampleConfig::reservoir(1).with_seed(5);
/// let out = sample(["h", "x", "y"], &config).unwrap().lines().unwrap();
/// assert_eq!(out.len(), 2);
/// ```
pub fn sample<'a, L>(lines: L, config: &SampleConfig) -> Result<Sample<BoxedSample<'a>>>
where
    L: IntoIterator,
    L::IntoIter: 'a,
    L::Item: IntoLine,
{
    config.validate()?;
    debug!(method = config.method.name(), seed = ?config.seed, "sampling");

    let sample = match &config.method {
        Method::Random { rate } => random_sample(lines, *rate, config.seed)?.boxed(),
        Method::Hash { rate, column } => hash_sample_with(
            lines,
            *rate,
            column,
            config.seed,
            config.delimiter,
            config.malformed_rows,
        )?
        .boxed(),
        Method::Reservoir { size } => reservoir_sample(lines, *size, config.seed)?.boxed(),
    };
    Ok(sample)
}

/// Fetch `url` and run the algorithm named by `config` over its lines
///
/// The body is decoded with `config.encoding`. The configuration is checked
/// before any request is made.
#[cfg(feature = "remote")]
pub fn sample_url(url: &str, config: &SampleConfig) -> Result<Sample<BoxedSample<'static>>> {
    config.validate()?;
    let lines = crate::source::url_lines(url, config.input_encoding()?)?;
    sample(lines, config)
}

/// Stream `sample` into `out`, treating a closed pipe as a normal stop
pub fn write_sample<I, W>(sample: Sample<I>, out: &mut W) -> Result<u64>
where
    I: Iterator<Item = Result<Line>>,
    W: Write,
{
    let mut written = 0;
    for line in sample {
        let line = line?;
        let result = out
            .write_all(line.as_bytes())
            .and_then(|_| out.write_all(b"\n"));
        match result {
            Ok(()) => written += 1,
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                debug!(written, "output closed early");
                return Ok(written);
            }
            Err(err) => return Err(err.into()),
        }
    }
    match out.flush() {
        Err(err) if err.kind() != io::ErrorKind::BrokenPipe => Err(err.into()),
        _ => Ok(written),
    }
}
