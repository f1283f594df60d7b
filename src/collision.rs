//! # Collision Generators
//!
//! A [`CollisionGenerator`] produces a requested number of distinct keys that all share one
//! hash value under a target platform's string hash. Two families of algorithms are
//! available, selected once at construction through [`Algorithm`]:
//!
//! - [`Algorithm::EquivalentSubstrings`] for additive polynomial hashes (Java, PHP 5): keys are
//!   concatenations of interchangeable seed fragments, see [`equivalent_substrings`].
//! - [`Algorithm::MeetInTheMiddle`] for invertible mixing hashes (ASP.NET, V8): keys are found
//!   by a parallel prefix search against a table of suffixes, see [`meet_in_the_middle`].
//!
//! Unless fresh keys are forced, a generator first tries a pre-built key list named after its
//! hash function (see [`prebuilt`](crate::prebuilt)) and only computes keys when none is
//! available.
//!
//! ```rust
//! use hashflood::collision::{CollisionGenerator, Platform};
//!
//! let generator = CollisionGenerator::for_platform(Platform::Java, "").unwrap();
//! let keys = generator.generate(1_000, true, None).unwrap();
//! let hash = generator.hash_function().hash(&keys[0]);
//! assert!(keys.iter().all(|k| generator.hash_function().hash(k) == hash));
//! ```

pub mod equivalent_substrings;
pub mod meet_in_the_middle;
pub mod search;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::hashing::{HashFunction, DJBX31A, DJBX33A, DJBX33X, V8};
use crate::prebuilt;
use crate::progress::{self, ProgressMonitor};
use equivalent_substrings::{generate_equivalent, Seed};
use meet_in_the_middle::{generate_mitm, SearchParams};

/// Collision algorithm bound to a hash function.
#[derive(Debug, Clone)]
pub enum Algorithm {
    /// Combinatorial concatenation of equal-contribution fragments.
    EquivalentSubstrings {
        /// Target hash.
        hash: HashFunction,
        /// Interchangeable fragments.
        seed: Seed,
    },
    /// Prefix enumeration against a table of backward-hashed suffixes.
    MeetInTheMiddle {
        /// Target hash, which must be invertible.
        hash: HashFunction,
        /// Key whose hash every generated key reproduces.
        seed: String,
        /// Search configuration.
        params: SearchParams,
    },
}

impl Algorithm {
    /// Equivalent-substrings algorithm over the given fragments.
    pub fn equivalent_substrings<I, S>(hash: HashFunction, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let seed = Seed::new(entries, &hash)?;
        Ok(Self::EquivalentSubstrings { hash, seed })
    }

    /// Meet-in-the-middle algorithm colliding with `seed`.
    pub fn meet_in_the_middle(
        hash: HashFunction,
        seed: impl Into<String>,
        params: SearchParams,
    ) -> Result<Self> {
        if !hash.is_invertible() {
            return Err(Error::invalid_argument(format!(
                "{} has no backward relation",
                hash.name()
            )));
        }
        Ok(Self::MeetInTheMiddle {
            hash,
            seed: seed.into(),
            params,
        })
    }

    /// The hash function keys collide under.
    pub fn hash_function(&self) -> &HashFunction {
        match self {
            Self::EquivalentSubstrings { hash, .. } | Self::MeetInTheMiddle { hash, .. } => hash,
        }
    }
}

/// Platforms with a built-in generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Java, `String.hashCode` (DJBX31A).
    Java,
    /// PHP 5 (DJBX33A).
    Php,
    /// ASP.NET (DJBX33X).
    Asp,
    /// V8 JavaScript engine.
    V8,
}

impl Platform {
    /// All supported platforms.
    pub const ALL: [Platform; 4] = [Platform::Java, Platform::Php, Platform::Asp, Platform::V8];

    /// Hash function used by the platform.
    pub fn hash_function(&self) -> HashFunction {
        match self {
            Self::Java => DJBX31A,
            Self::Php => DJBX33A,
            Self::Asp => DJBX33X,
            Self::V8 => V8,
        }
    }

    /// Default algorithm for the platform. `seed` is only used by meet-in-the-middle targets.
    pub fn algorithm(&self, seed: &str) -> Result<Algorithm> {
        match self {
            Self::Java => Algorithm::equivalent_substrings(DJBX31A, ["xw", "yX", "z9"]),
            Self::Php => Algorithm::equivalent_substrings(DJBX33A, ["Ez", "FY", "G8"]),
            Self::Asp | Self::V8 => {
                Algorithm::meet_in_the_middle(self.hash_function(), seed, SearchParams::default())
            }
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Java => "java",
            Self::Php => "php",
            Self::Asp => "asp",
            Self::V8 => "v8",
        };
        f.write_str(name)
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "java" | "djbx31a" => Ok(Self::Java),
            "php" | "djbx33a" => Ok(Self::Php),
            "asp" | "asp.net" | "djbx33x" => Ok(Self::Asp),
            "v8" | "node" | "javascript" => Ok(Self::V8),
            other => Err(Error::invalid_argument(format!("unknown platform: {other}"))),
        }
    }
}

/// Produces sets of distinct keys sharing a single hash value.
#[derive(Debug, Clone)]
pub struct CollisionGenerator {
    algorithm: Algorithm,
    resource_dir: Option<PathBuf>,
}

impl CollisionGenerator {
    /// Creates a generator for the given algorithm.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            resource_dir: None,
        }
    }

    /// Creates the default generator of a platform.
    pub fn for_platform(platform: Platform, seed: &str) -> Result<Self> {
        Ok(Self::new(platform.algorithm(seed)?))
    }

    /// Directory searched for pre-built key lists missing from the embedded set.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    /// The configured algorithm.
    pub fn algorithm(&self) -> &Algorithm {
        &self.algorithm
    }

    /// The hash function keys collide under.
    pub fn hash_function(&self) -> &HashFunction {
        self.algorithm.hash_function()
    }

    /// Returns `count` colliding keys.
    ///
    /// Unless `force_fresh` is set, a pre-built list is tried first; it may hold fewer than
    /// `count` keys, in which case all of them are returned. When no list can be loaded the
    /// keys are computed.
    ///
    /// # Errors
    /// - [`Error::InvalidArgument`] if `count` is zero or the seed cannot produce `count` keys.
    /// - [`Error::Computation`] if a parallel search fails.
    pub fn generate(
        &self,
        count: usize,
        force_fresh: bool,
        monitor: Option<&dyn ProgressMonitor>,
    ) -> Result<Vec<String>> {
        if count == 0 {
            return Err(Error::invalid_argument("number of keys must be positive"));
        }

        if !force_fresh {
            info!("Loading {} {} keys", count, self.hash_function().name());
            match self.load_prebuilt(count) {
                Ok(keys) => {
                    progress::or_noop(monitor).done();
                    return Ok(keys);
                }
                Err(e @ Error::ResourceUnavailable { .. }) => {
                    warn!("Could not load pre-built keys, generating new keys: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        self.generate_fresh(count, monitor)
    }

    /// Computes `count` colliding keys, ignoring any pre-built list.
    ///
    /// # Errors
    /// Same as [`generate`](Self::generate).
    pub fn generate_fresh(
        &self,
        count: usize,
        monitor: Option<&dyn ProgressMonitor>,
    ) -> Result<Vec<String>> {
        if count == 0 {
            return Err(Error::invalid_argument("number of keys must be positive"));
        }

        info!("Generating {} {} keys", count, self.hash_function().name());
        let monitor = progress::or_noop(monitor);
        let keys = match &self.algorithm {
            Algorithm::EquivalentSubstrings { seed, .. } => generate_equivalent(seed, count),
            Algorithm::MeetInTheMiddle { hash, seed, params } => {
                generate_mitm(hash, seed, params, count, Some(monitor))
            }
        };
        monitor.done();
        keys
    }

    /// Reads up to `count` pre-built keys for this generator's hash function.
    ///
    /// # Errors
    /// [`Error::ResourceUnavailable`] if no list can be read.
    pub fn load_prebuilt(&self, count: usize) -> Result<Vec<String>> {
        prebuilt::read_lines(
            &self.hash_function().resource_name(),
            count,
            self.resource_dir.as_deref(),
        )
    }

    /// Directory searched for pre-built key lists, if any.
    pub fn resource_dir(&self) -> Option<&Path> {
        self.resource_dir.as_deref()
    }
}
