//! DJBX33X ("times 33, xor"), the ASP.NET string hash.
//!
//! ```text
//!   h = 5381
//!   for c in key: h = (h * 33) ^ c
//! ```
//!
//! The xor breaks the additive structure exploited for DJBX33A, but each step is a bijection on
//! the 32-bit state: xor is its own inverse and 33 is odd, so it has a multiplicative inverse
//! modulo 2^32.

use super::HashFunction;

/// Starting state.
pub const INITIAL: u32 = 5381;

/// Inverse of 33 modulo 2^32.
pub const INVERSE_33: u32 = 1_041_204_193;

/// ASP.NET string hash.
pub const DJBX33X: HashFunction = HashFunction::new("DJBX33X", INITIAL, step).with_backward(back);

#[inline]
fn step(state: u32, unit: u16) -> u32 {
    (state << 5).wrapping_add(state) ^ unit as u32
}

#[inline]
fn back(state: u32, unit: u16) -> u32 {
    (state ^ unit as u32).wrapping_mul(INVERSE_33)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_constant() {
        assert_eq!(33u32.wrapping_mul(INVERSE_33), 1);
    }

    #[test]
    fn test_back_undoes_step() {
        for &state in &[0u32, 1, 5381, 0xdead_beef, u32::MAX] {
            for unit in [0u16, b' ' as u16, b'~' as u16, 0x00e9, 0xffff] {
                assert_eq!(back(step(state, unit), unit), state);
            }
        }
    }

    #[test]
    fn test_single_character() {
        assert_eq!(DJBX33X.hash("a"), (5381 * 33) ^ 97);
    }
}
