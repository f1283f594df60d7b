//! # Target String Hash Functions
//!
//! This module reproduces, bit for bit, the string hash functions of the platforms whose hash
//! tables we want to flood. Every function here is an *iterated* hash: an initial 32-bit state
//! is folded over the UTF-16 code units of the key with a per-character update step.
//!
//! ```text
//!   h_0 = initial
//!   h_i = step(h_{i-1}, c_i)
//!   hash(key) = h_n reinterpreted as i32
//! ```
//!
//! All arithmetic is modulo 2^32 (`wrapping_*` on `u32`), which matches the overflow behaviour
//! of the 32-bit signed integers used by the targets. The reversal algebra used by the
//! meet-in-the-middle generator depends on this exactly.
//!
//! Some targets also expose a **backward step**, the inverse of `step` for a fixed character:
//!
//! ```text
//!   back(step(h, c), c) == h
//! ```
//!
//! Folding `back` over a suffix in reverse order yields the state a prefix must reach for
//! `prefix + suffix` to land on a chosen final hash.
//!
//! ## Provided targets
//! - [`DJBX31A`]: Java `String.hashCode`, `h * 31 + c` from 0.
//! - [`DJBX33A`]: PHP 5 `zend_inline_hash_func`, `h * 33 + c` from 5381.
//! - [`DJBX33X`]: ASP.NET string hash, `h * 33 ^ c` from 5381, invertible.
//! - [`V8`]: Jenkins one-at-a-time without finalisation as used by V8, invertible.
//!
//! # Usage
//!
//! ```rust
//! use hashflood::hashing::{DJBX31A, V8};
//!
//! assert_eq!(DJBX31A.hash("Aa"), DJBX31A.hash("BB"));
//!
//! let target = V8.hash("hashes");
//! let prefix_state = V8.hash_back("hes", target).unwrap();
//! assert_eq!(prefix_state, V8.hash("has"));
//! ```

pub mod djbx31a;
pub mod djbx33a;
pub mod djbx33x;
pub mod v8;

pub use djbx31a::DJBX31A;
pub use djbx33a::DJBX33A;
pub use djbx33x::DJBX33X;
pub use v8::V8;

/// Hash value produced by every target function.
pub type HashValue = i32;

/// Per-character update step over the raw 32-bit state.
pub type StepFn = fn(u32, u16) -> u32;

/// A string hash function described by its initial state and update step.
///
/// Values are small and `Copy`; they carry plain function pointers and no mutable state, so a
/// single instance may be shared freely between worker threads.
#[derive(Debug, Clone, Copy)]
pub struct HashFunction {
    name: &'static str,
    initial: u32,
    forward: StepFn,
    backward: Option<StepFn>,
}

impl HashFunction {
    /// Creates a hash function without a backward relation.
    pub const fn new(name: &'static str, initial: u32, forward: StepFn) -> Self {
        Self {
            name,
            initial,
            forward,
            backward: None,
        }
    }

    /// Attaches the inverse of the update step.
    ///
    /// `backward(forward(h, c), c)` must equal `h` for every state and character.
    pub const fn with_backward(mut self, backward: StepFn) -> Self {
        self.backward = Some(backward);
        self
    }

    /// Display name, e.g. `"DJBX31A"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// File name of the pre-built key list for this function.
    pub fn resource_name(&self) -> String {
        format!("{}.txt", self.name.to_ascii_lowercase())
    }

    /// Raw state before any character has been consumed.
    pub fn initial_state(&self) -> u32 {
        self.initial
    }

    /// Applies a single update step to a raw state.
    #[inline]
    pub fn step(&self, state: u32, unit: u16) -> u32 {
        (self.forward)(state, unit)
    }

    /// Hashes a key the way the target platform does.
    pub fn hash(&self, key: &str) -> HashValue {
        self.hash_units(key.encode_utf16())
    }

    /// Hashes an already decoded sequence of UTF-16 code units.
    pub fn hash_units<I>(&self, units: I) -> HashValue
    where
        I: IntoIterator<Item = u16>,
    {
        units.into_iter().fold(self.initial, self.forward) as HashValue
    }

    /// Whether [`hash_back`](Self::hash_back) is available.
    pub fn is_invertible(&self) -> bool {
        self.backward.is_some()
    }

    /// Computes the hash a prefix must have so that `prefix + suffix` hashes to `target`.
    ///
    /// Returns `None` for functions without a backward relation.
    pub fn hash_back(&self, suffix: &str, target: HashValue) -> Option<HashValue> {
        let backward = self.backward?;
        let units: Vec<u16> = suffix.encode_utf16().collect();
        let state = units
            .iter()
            .rev()
            .fold(target as u32, |state, &unit| backward(state, unit));
        Some(state as HashValue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_name_is_lowercased() {
        assert_eq!(DJBX31A.resource_name(), "djbx31a.txt");
        assert_eq!(V8.resource_name(), "v8.txt");
    }

    #[test]
    fn test_hash_units_matches_hash() {
        let key = "hash flooding";
        let units: Vec<u16> = key.encode_utf16().collect();
        for function in [DJBX31A, DJBX33A, DJBX33X, V8] {
            assert_eq!(function.hash(key), function.hash_units(units.iter().copied()));
        }
    }

    #[test]
    fn test_empty_key_is_initial_state() {
        assert_eq!(DJBX31A.hash(""), 0);
        assert_eq!(DJBX33A.hash(""), 5381);
        assert_eq!(V8.hash(""), 0);
    }

    #[test]
    fn test_hash_back_requires_inverse() {
        assert!(DJBX31A.hash_back("abc", 7).is_none());
        assert!(!DJBX33A.is_invertible());
        assert!(DJBX33X.is_invertible());
        assert!(V8.is_invertible());
    }

    #[test]
    fn test_backward_relation_holds_for_every_split() {
        let key = "meet in the middle";
        for function in [DJBX33X, V8] {
            let target = function.hash(key);
            for split in 0..=key.len() {
                let (prefix, suffix) = key.split_at(split);
                assert_eq!(
                    function.hash_back(suffix, target),
                    Some(function.hash(prefix)),
                    "{} failed at split {}",
                    function.name(),
                    split
                );
            }
        }
    }

    #[test]
    fn test_non_ascii_uses_utf16_units() {
        // U+1F600 is a surrogate pair on the target platforms.
        let units: Vec<u16> = "\u{1F600}".encode_utf16().collect();
        assert_eq!(units.len(), 2);
        let expected = (units[0] as i32).wrapping_mul(31).wrapping_add(units[1] as i32);
        assert_eq!(DJBX31A.hash("\u{1F600}"), expected);
    }
}
