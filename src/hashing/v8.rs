//! V8 string hash: Jenkins one-at-a-time without the finalisation rounds.
//!
//! ```text
//!   h = 0
//!   for c in key:
//!       h += c
//!       h += h << 10
//!       h ^= h >>> 6
//! ```
//!
//! Every operation in the step is invertible on a 32-bit state:
//! - `h ^= h >>> 6` is undone six bits at a time from the top, each recovered group feeding the
//!   xor of the next one;
//! - `h += h << 10` is multiplication by 1025, undone by multiplying with its inverse;
//! - `h += c` is undone by subtraction.

use super::HashFunction;

/// Inverse of 1025 modulo 2^32.
pub const INVERSE_1025: u32 = 3_222_273_025;

/// V8 string hash.
pub const V8: HashFunction = HashFunction::new("V8", 0, step).with_backward(back);

#[inline]
fn step(state: u32, unit: u16) -> u32 {
    let mut h = state.wrapping_add(unit as u32);
    h = h.wrapping_add(h << 10);
    h ^ (h >> 6)
}

#[inline]
fn back(state: u32, unit: u16) -> u32 {
    unshift_xor_6(state)
        .wrapping_mul(INVERSE_1025)
        .wrapping_sub(unit as u32)
}

/// Inverts `h ^ (h >> 6)`.
#[inline]
fn unshift_xor_6(h: u32) -> u32 {
    let part1 = h >> 26 << 26;
    let part2 = (h ^ (part1 >> 6)) >> 20 << 26 >> 6;
    let part3 = (h ^ (part2 >> 6)) >> 14 << 26 >> 12;
    let part4 = (h ^ (part3 >> 6)) >> 8 << 26 >> 18;
    let part5 = (h ^ (part4 >> 6)) >> 2 << 26 >> 24;
    let part6 = (h ^ (part5 >> 6)) << 30 >> 30;
    part1 | part2 | part3 | part4 | part5 | part6
}
