//! Seedable randomness for the sampling algorithms
//!
//! Every sampler resolves one effective seed when it is constructed and
//! threads it through a deterministic generator for the rest of the call.
//! Omitting the seed draws it once from the operating system, so unseeded
//! runs differ from each other but a single run never consults global
//! random state again.
//!
//! # Example
//!
//! ```
//! use csvsample::random::{KeyHasher, SampleRng};
//!
//! let mut a = SampleRng::new(7);
//! let mut b = SampleRng::new(7);
//! assert_eq!(a.uniform(), b.uniform());
//!
//! let hasher = KeyHasher::new(7);
//! assert_eq!(hasher.digest("alice"), KeyHasher::new(7).digest("alice"));
//! ```

mod hash;
mod rng;

pub use hash::KeyHasher;
pub use rng::SampleRng;

use rand::Rng;

/// Resolve the effective seed for one sampling call
///
/// Returns `seed` unchanged when given, otherwise a fresh value from the
/// thread-local OS-seeded generator.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) => seed,
        None => rand::thread_rng().gen(),
    }
}
