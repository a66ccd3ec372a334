//! Two's-complement arithmetic, built from the gate set.
//!
//! The adder is a textbook ripple carry: a half adder per pair of lines,
//! chained through a full adder. The carry out of the sign line is
//! discarded, so 16-bit addition wraps modulo 2^16 and negation is
//! complement-and-increment.

use crate::bits::Word;
use crate::gates::{self, not16};

/// Add two lines, producing `(sum, carry)`.
#[must_use]
pub fn half_adder(x: bool, y: bool) -> (bool, bool) {
    (gates::xor(x, y), gates::and(x, y))
}

/// Add three lines, producing `(sum, carry)`.
#[must_use]
pub fn full_adder(x: bool, y: bool, carry: bool) -> (bool, bool) {
    let (partial, first_carry) = half_adder(x, y);
    let (sum, second_carry) = half_adder(partial, carry);

    (sum, gates::or(first_carry, second_carry))
}

/// Add two words. The carry out of the sign line is discarded, so the
/// result wraps modulo 2^16.
#[must_use]
pub fn add16(xs: Word, ys: Word) -> Word {
    let mut out = 0_u16;
    let mut carry = false;

    for nth in 0..16 {
        let (sum, next_carry) = full_adder(xs.bit(nth), ys.bit(nth), carry);
        out |= u16::from(sum) << nth;
        carry = next_carry;
    }

    Word::new(out)
}

/// Add one to a word, wrapping.
#[must_use]
pub fn inc16(xs: Word) -> Word {
    add16(xs, Word::ONE)
}

/// Negate a word under two's complement: complement every line, then add
/// one.
#[must_use]
pub fn neg16(xs: Word) -> Word {
    inc16(not16(xs))
}
