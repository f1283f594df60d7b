//! DJBX31A, the Java `String.hashCode` function.
//!
//! ```text
//!   h = 0
//!   for c in key: h = h * 31 + c
//! ```
//!
//! The step is additive in the character, so two equal-length fragments whose weighted sums
//! agree (`"Aa"` and `"BB"`, or `"xw"`, `"yX"` and `"z9"`) can be swapped anywhere in a key
//! without changing its hash.

use super::HashFunction;

/// Per-character multiplier.
pub const MULTIPLIER: u32 = 31;

/// Java `String.hashCode`.
pub const DJBX31A: HashFunction = HashFunction::new("DJBX31A", 0, step);

#[inline]
fn step(state: u32, unit: u16) -> u32 {
    state.wrapping_mul(MULTIPLIER).wrapping_add(unit as u32)
}
