//! # csvsample
//!
//! Streaming row sampling for CSV and other line-oriented tabular data.
//!
//! csvsample draws statistically controlled subsets of rows from a stream
//! whose first line is a header, without loading the input into memory.
//!
//! ## Algorithms
//!
//! - **Random**: keep each row independently with probability `p` (Bernoulli)
//! - **Hash**: keep a row iff a seeded hash of one column falls below `p`, so
//!   rows sharing a key are always kept or dropped together
//! - **Reservoir**: keep a uniform sample of exactly `k` rows (Algorithm R),
//!   memory proportional to `k`
//!
//! Every algorithm yields the header first, keeps rows in their original
//! order, and re-emits each selected line unchanged.
//!
//! ## Quick Start
//!
//! ```rust
//! use csvsample::prelude::*;
//!
//! let rows = ["user,event", "alice,login", "bob,login", "alice,logout"];
//!
//! // Same seed, same sample
//! let a = hash_sample(rows, 0.5, "user", Some(42)).unwrap().lines().unwrap();
//! let b = hash_sample(rows, 0.5, "user", Some(42)).unwrap().lines().unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a[0], "user,event");
//! ```
//!
//! ## Reproducibility
//!
//! With an explicit seed, output is byte-identical across runs. Without one,
//! a seed is drawn from the OS once per call, so repeated unseeded runs
//! differ.
//!
//! ## Feature Flags
//!
//! - `cli` (default): the `csvsample` command-line tool
//! - `remote` (default): read input from HTTP(S) URLs
//! - `serde`: serialize [`SampleConfig`]

#![cfg_attr(docsrs, feature(doc_cfg))]

// Core traits always available
pub mod traits;

pub mod config;
pub mod fields;
pub mod random;
pub mod sample;
pub mod sampling;
pub mod source;

pub mod prelude {
    pub use crate::traits::*;

    pub use crate::config::{MalformedRowPolicy, Method, SampleConfig};
    pub use crate::sample::{hash_sample, random_sample, reservoir_sample, sample, Sample};
    pub use crate::sampling::{BernoulliFilter, HashFilter, Reservoir};
}

pub use config::{MalformedRowPolicy, Method, SampleConfig};
pub use sample::{hash_sample, random_sample, reservoir_sample, sample, write_sample, Sample};
pub use traits::{Result, SampleError};

#[cfg(feature = "remote")]
#[cfg_attr(docsrs, doc(cfg(feature = "remote")))]
pub use sample::sample_url;
