//! # Equivalent Substrings
//!
//! Collision generation for additive polynomial hashes (`h = h * K + c`). For such a hash, the
//! contribution of a fragment at a fixed position only depends on its weighted character sum,
//! so equal-length fragments with equal sums can be exchanged freely:
//!
//! ```text
//!   hash("xw") == hash("yX") == hash("z9")          (Java, K = 31)
//!   => hash("xwz9yX") == hash("z9z9xw") == ...      every concatenation of d fragments
//! ```
//!
//! A [`Seed`] of `S` such fragments yields `S^d` distinct keys of `d` fragments each, all with
//! the same hash. No search is involved; keys come out of a lazy Cartesian power in
//! lexicographic seed order, so the output is fully deterministic.
//!
//! ```rust
//! use hashflood::collision::equivalent_substrings::{generate_equivalent, Seed};
//! use hashflood::hashing::DJBX31A;
//!
//! let seed = Seed::new(["xw", "yX", "z9"], &DJBX31A).unwrap();
//! let keys = generate_equivalent(&seed, 5).unwrap();
//! assert_eq!(keys, vec!["xwxw", "xwyX", "xwz9", "yXxw", "yXyX"]);
//! ```

use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;

use crate::error::{Error, Result};
use crate::hashing::HashFunction;

/// Equal-length fragments sharing one hash contribution. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    entries: Vec<String>,
    entry_len: usize,
}

impl Seed {
    /// Builds a seed and checks it against `hash`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the seed is empty, contains an empty or duplicate entry,
    /// mixes entry lengths, or its entries do not all hash alike.
    pub fn new<I, S>(entries: I, hash: &HashFunction) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        let first = entries
            .first()
            .ok_or_else(|| Error::invalid_argument("seed must not be empty"))?;

        let entry_len = first.encode_utf16().count();
        if entry_len == 0 {
            return Err(Error::invalid_argument("seed entries must not be empty"));
        }

        let expected = hash.hash(first);
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.encode_utf16().count() != entry_len {
                return Err(Error::invalid_argument(format!(
                    "seed entry {entry:?} is not {entry_len} units long"
                )));
            }
            if !seen.insert(entry.as_str()) {
                return Err(Error::invalid_argument(format!(
                    "seed entry {entry:?} is repeated"
                )));
            }
            if hash.hash(entry) != expected {
                return Err(Error::invalid_argument(format!(
                    "seed entry {entry:?} does not collide under {}",
                    hash.name()
                )));
            }
        }

        Ok(Self { entries, entry_len })
    }

    /// Finds the largest set of two-character fragments over `alphabet` with equal
    /// `a * multiplier + b`, and checks it against `hash`.
    ///
    /// Ties go to the smallest weighted sum; entries are in ascending order.
    pub fn derive_pairs(
        multiplier: u32,
        alphabet: RangeInclusive<u8>,
        hash: &HashFunction,
    ) -> Result<Self> {
        let mut classes: BTreeMap<u32, Vec<String>> = BTreeMap::new();
        for a in alphabet.clone() {
            for b in alphabet.clone() {
                let weight = (a as u32).wrapping_mul(multiplier).wrapping_add(b as u32);
                classes
                    .entry(weight)
                    .or_default()
                    .push([a as char, b as char].iter().collect());
            }
        }

        let mut best: Option<Vec<String>> = None;
        for (_, class) in classes {
            if best.as_ref().map_or(true, |b| class.len() > b.len()) {
                best = Some(class);
            }
        }
        let best = best.ok_or_else(|| Error::invalid_argument("alphabet must not be empty"))?;
        Self::new(best, hash)
    }

    /// Seed fragments in generation order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed seed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of every fragment in UTF-16 code units.
    pub fn entry_len(&self) -> usize {
        self.entry_len
    }
}

/// Lazy Cartesian power of a seed: every concatenation of `depth` entries, in lexicographic
/// seed order.
///
/// The iterator is finite and `Clone`, so a sequence can be restarted from any point.
#[derive(Debug, Clone)]
pub struct Combinations<'a> {
    seed: &'a Seed,
    indices: Vec<usize>,
    finished: bool,
}

/// Returns all concatenations of `depth` seed entries.
pub fn combinations(seed: &Seed, depth: usize) -> Combinations<'_> {
    Combinations {
        seed,
        indices: vec![0; depth],
        finished: seed.is_empty() && depth > 0,
    }
}

impl Iterator for Combinations<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        let entries = self.seed.entries();
        let key: String = self.indices.iter().map(|&i| entries[i].as_str()).collect();

        // Advance the odometer, rightmost position fastest.
        self.finished = true;
        for index in self.indices.iter_mut().rev() {
            *index += 1;
            if *index < entries.len() {
                self.finished = false;
                break;
            }
            *index = 0;
        }

        Some(key)
    }
}

/// Smallest `d` with `size^d >= count`.
fn depth_for(count: usize, size: usize) -> Result<usize> {
    if size < 2 {
        return Err(Error::invalid_argument(format!(
            "a seed of {size} entries cannot produce {count} distinct keys"
        )));
    }
    let mut depth = 1;
    let mut capacity = size;
    while capacity < count {
        capacity = capacity.saturating_mul(size);
        depth += 1;
    }
    Ok(depth)
}

/// Generates exactly `count` distinct keys with the seed's common hash.
///
/// Up to `seed.len()` keys are the seed entries themselves; beyond that every key has the same
/// number of fragments.
///
/// # Errors
/// [`Error::InvalidArgument`] if `count` is zero, or the seed has a single entry and more than
/// one key is requested.
pub fn generate_equivalent(seed: &Seed, count: usize) -> Result<Vec<String>> {
    if count == 0 {
        return Err(Error::invalid_argument("number of keys must be positive"));
    }
    if count <= seed.len() {
        return Ok(seed.entries()[..count].to_vec());
    }

    let depth = depth_for(count, seed.len())?;
    Ok(combinations(seed, depth).take(count).collect())
}
