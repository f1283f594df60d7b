//! DJBX33A ("Daniel J. Bernstein, times 33, add"), the PHP 5 string hash.
//!
//! ```text
//!   h = 5381
//!   for c in key: h = h * 33 + c
//! ```

use super::HashFunction;

/// Per-character multiplier.
pub const MULTIPLIER: u32 = 33;

/// Starting state.
pub const INITIAL: u32 = 5381;

/// PHP 5 `zend_inline_hash_func`.
pub const DJBX33A: HashFunction = HashFunction::new("DJBX33A", INITIAL, step);

#[inline]
fn step(state: u32, unit: u16) -> u32 {
    (state << 5).wrapping_add(state).wrapping_add(unit as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_character() {
        assert_eq!(DJBX33A.hash("a"), 5381 * 33 + 97);
    }

    #[test]
    fn test_shift_add_equals_multiply() {
        let mut expected: i32 = 5381;
        for c in "a fairly long key that overflows".chars() {
            expected = expected.wrapping_mul(33).wrapping_add(c as i32);
        }
        assert_eq!(DJBX33A.hash("a fairly long key that overflows"), expected);
    }

    #[test]
    fn test_equivalent_fragments_collide() {
        let base = DJBX33A.hash("Ez");
        assert_eq!(DJBX33A.hash("FY"), base);
        assert_eq!(DJBX33A.hash("G8"), base);
        assert_eq!(DJBX33A.hash("EzG8FY"), DJBX33A.hash("FYEzG8"));
    }
}
