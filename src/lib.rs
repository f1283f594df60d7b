//! # hashflood
//!
//! Generation of large sets of distinct strings that all hash to the same value under weak,
//! well-known string hash functions (Java, PHP 5, ASP.NET, V8).
//!
//! - [`hashing`]: exact reproductions of the target hash functions and their inverses.
//! - [`collision`]: the generators, equivalent substrings and meet-in-the-middle.
//! - [`prebuilt`]: embedded and on-disk lists of keys computed ahead of time.
//! - [`progress`]: optional progress reporting.

pub mod collision;
pub mod error;
pub mod hashing;
pub mod prebuilt;
pub mod progress;

pub use collision::{Algorithm, CollisionGenerator, Platform};
pub use error::{Error, Result};
pub use hashing::{HashFunction, HashValue};
pub use progress::{LogProgressMonitor, NoProgressMonitor, ProgressMonitor};
