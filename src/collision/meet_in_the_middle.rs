//! # Meet-in-the-Middle
//!
//! Collision generation for hashes whose update step mixes bits non-additively but can be
//! inverted one character at a time (DJBX33X, V8). A key is split into a fixed-length
//! **prefix** and a short **suffix**:
//!
//! ```text
//!   key    = prefix (prefix_len) + suffix (suffix_len)
//!   target = hash(seed)
//!   hash(prefix + suffix) == target  <=>  hash(prefix) == hash_back(suffix, target)
//! ```
//!
//! 1. Build a [`LookupTable`] mapping `hash_back(suffix, target)` to `suffix` for many random
//!    suffixes.
//! 2. Enumerate prefixes in parallel (see [`search`](super::search)); every prefix whose hash is
//!    a table key completes a colliding key.
//!
//! With a table of `2^18` entries a random prefix hits with probability close to `2^-14`, so
//! each key costs roughly sixteen thousand prefix hashes instead of four billion.
//!
//! Two suffixes that share a backward hash occupy a single table slot; the last one inserted
//! wins. Both would complete the same prefixes, so only search yield is affected.
//!
//! ```rust
//! use hashflood::collision::meet_in_the_middle::{generate_mitm, SearchParams};
//! use hashflood::hashing::DJBX33X;
//!
//! let params = SearchParams::builder().rng_seed(7).build().unwrap();
//! let keys = generate_mitm(&DJBX33X, "hashes", &params, 10, None).unwrap();
//! assert_eq!(keys.len(), 10);
//! assert!(keys.iter().all(|k| DJBX33X.hash(k) == DJBX33X.hash("hashes")));
//! ```

use std::collections::HashMap;
use std::ops::RangeInclusive;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::search::search;
use crate::error::{Error, Result};
use crate::hashing::{HashFunction, HashValue};
use crate::progress::{self, ProgressMonitor};

/// Default number of random suffixes in the lookup table.
pub const DEFAULT_TABLE_SIZE: usize = 1 << 18;
/// Default prefix length.
pub const DEFAULT_PREFIX_LEN: usize = 7;
/// Default suffix length.
pub const DEFAULT_SUFFIX_LEN: usize = 3;
/// First printable character (inclusive).
pub const DEFAULT_FIRST_CHAR: u8 = b' ';
/// Last printable character (inclusive).
pub const DEFAULT_LAST_CHAR: u8 = b'~';

/// Parameters of a meet-in-the-middle search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    table_size: usize,
    prefix_len: usize,
    suffix_len: usize,
    first_char: u8,
    last_char: u8,
    workers: usize,
    rng_seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        let alphabet_len = (DEFAULT_LAST_CHAR - DEFAULT_FIRST_CHAR) as usize + 1;
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            prefix_len: DEFAULT_PREFIX_LEN,
            suffix_len: DEFAULT_SUFFIX_LEN,
            first_char: DEFAULT_FIRST_CHAR,
            last_char: DEFAULT_LAST_CHAR,
            workers: default_workers(alphabet_len),
            rng_seed: None,
        }
    }
}

impl SearchParams {
    /// Starts a builder from the defaults.
    pub fn builder() -> SearchParamsBuilder {
        SearchParamsBuilder::default()
    }

    /// Number of random suffixes drawn for the lookup table.
    pub fn table_size(&self) -> usize {
        self.table_size
    }

    /// Length of every enumerated prefix.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Length of every random suffix.
    pub fn suffix_len(&self) -> usize {
        self.suffix_len
    }

    /// Characters used in both prefixes and suffixes.
    pub fn alphabet(&self) -> RangeInclusive<u8> {
        self.first_char..=self.last_char
    }

    /// Number of characters in the alphabet.
    pub fn alphabet_len(&self) -> usize {
        (self.last_char - self.first_char) as usize + 1
    }

    /// Number of search workers, never more than the alphabet size.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Seed for the suffix generator, if the table must be reproducible.
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

/// Builder for [`SearchParams`].
#[derive(Debug, Clone)]
pub struct SearchParamsBuilder {
    table_size: usize,
    prefix_len: usize,
    suffix_len: usize,
    alphabet: RangeInclusive<u8>,
    workers: Option<usize>,
    rng_seed: Option<u64>,
}

impl Default for SearchParamsBuilder {
    fn default() -> Self {
        Self {
            table_size: DEFAULT_TABLE_SIZE,
            prefix_len: DEFAULT_PREFIX_LEN,
            suffix_len: DEFAULT_SUFFIX_LEN,
            alphabet: DEFAULT_FIRST_CHAR..=DEFAULT_LAST_CHAR,
            workers: None,
            rng_seed: None,
        }
    }
}

impl SearchParamsBuilder {
    /// Sets the number of random suffixes in the lookup table.
    pub fn table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    /// Sets the prefix length.
    pub fn prefix_len(mut self, prefix_len: usize) -> Self {
        self.prefix_len = prefix_len;
        self
    }

    /// Sets the suffix length.
    pub fn suffix_len(mut self, suffix_len: usize) -> Self {
        self.suffix_len = suffix_len;
        self
    }

    /// Restricts keys to a range of printable ASCII characters.
    pub fn alphabet(mut self, alphabet: RangeInclusive<u8>) -> Self {
        self.alphabet = alphabet;
        self
    }

    /// Caps the number of workers. Defaults to the number of CPUs.
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Makes lookup table construction reproducible.
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Validates and builds the parameters.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] for a zero size or length, zero workers, or an alphabet that
    /// is empty or leaves printable ASCII.
    pub fn build(self) -> Result<SearchParams> {
        if self.table_size == 0 {
            return Err(Error::invalid_argument("table size must be positive"));
        }
        if self.prefix_len == 0 || self.suffix_len == 0 {
            return Err(Error::invalid_argument(
                "prefix and suffix lengths must be positive",
            ));
        }
        let (first_char, last_char) = self.alphabet.into_inner();
        if first_char > last_char {
            return Err(Error::invalid_argument("alphabet must not be empty"));
        }
        if first_char < DEFAULT_FIRST_CHAR || last_char > DEFAULT_LAST_CHAR {
            return Err(Error::invalid_argument(
                "alphabet must be printable ASCII",
            ));
        }

        let alphabet_len = (last_char - first_char) as usize + 1;
        let workers = match self.workers {
            Some(0) => return Err(Error::invalid_argument("workers must be positive")),
            Some(workers) => workers.min(alphabet_len),
            None => default_workers(alphabet_len),
        };

        Ok(SearchParams {
            table_size: self.table_size,
            prefix_len: self.prefix_len,
            suffix_len: self.suffix_len,
            first_char,
            last_char,
            workers,
            rng_seed: self.rng_seed,
        })
    }
}

fn default_workers(alphabet_len: usize) -> usize {
    num_cpus::get().clamp(1, alphabet_len)
}

/// Backward hash of a suffix mapped to that suffix. Read-only once built.
#[derive(Debug, Clone)]
pub struct LookupTable {
    entries: HashMap<HashValue, String>,
}

impl LookupTable {
    /// Draws `params.table_size()` random suffixes and indexes them by the prefix hash that
    /// completes them to `target`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `hash` has no backward relation.
    pub fn build(hash: &HashFunction, target: HashValue, params: &SearchParams) -> Result<Self> {
        if !hash.is_invertible() {
            return Err(Error::invalid_argument(format!(
                "{} has no backward relation",
                hash.name()
            )));
        }

        let mut rng = match params.rng_seed() {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::thread_rng().gen()),
        };

        let alphabet = params.alphabet();
        let mut entries = HashMap::with_capacity(params.table_size());
        for _ in 0..params.table_size() {
            let suffix: String = (0..params.suffix_len())
                .map(|_| rng.gen_range(alphabet.clone()) as char)
                .collect();
            let key = hash.hash_back(&suffix, target).ok_or_else(|| {
                Error::invalid_argument(format!("{} has no backward relation", hash.name()))
            })?;
            entries.insert(key, suffix);
        }

        debug!(
            "Lookup table for {} holds {} of {} suffixes",
            hash.name(),
            entries.len(),
            params.table_size()
        );
        Ok(Self { entries })
    }

    /// Suffix completing a prefix with the given hash, if any.
    #[inline]
    pub fn get(&self, prefix_hash: HashValue) -> Option<&str> {
        self.entries.get(&prefix_hash).map(String::as_str)
    }

    /// Number of distinct backward hashes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generates `count` distinct keys that hash like `seed`.
///
/// Element order varies between runs; only size, distinctness and the common hash are
/// guaranteed.
///
/// # Errors
/// - [`Error::InvalidArgument`] if `count` is zero or `hash` is not invertible.
/// - [`Error::Computation`] if a worker fails or the prefix space runs out first.
pub fn generate_mitm(
    hash: &HashFunction,
    seed: &str,
    params: &SearchParams,
    count: usize,
    monitor: Option<&dyn ProgressMonitor>,
) -> Result<Vec<String>> {
    if count == 0 {
        return Err(Error::invalid_argument("number of keys must be positive"));
    }

    let target = hash.hash(seed);
    let table = LookupTable::build(hash, target, params)?;
    search(hash, &table, params, count, progress::or_noop(monitor))
}
