//! The arithmetic logic unit.
//!
//! The ALU computes one of eighteen functions of its two operands, steered
//! by six control lines. The lines act as a pipeline: optionally zero
//! and/or complement each operand, add or And the conditioned operands,
//! optionally complement the result. Alongside the result it reports two
//! status lines, `zr` (every output line low) and `ng` (sign line high),
//! which the jump logic reads.

use arbitrary_int::u6;

use crate::arithmetic::add16;
use crate::bits::Word;
use crate::gates::{self, and16, mux16, not16, or16way};

/// The six ALU control lines.
///
/// In instruction words these travel as the c-field, most significant line
/// first: `zx nx zy ny f no`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    /// Zero the x operand.
    pub zx: bool,
    /// Complement the (possibly zeroed) x operand.
    pub nx: bool,
    /// Zero the y operand.
    pub zy: bool,
    /// Complement the (possibly zeroed) y operand.
    pub ny: bool,
    /// Add the conditioned operands; when low, And them instead.
    pub f: bool,
    /// Complement the result.
    pub no: bool,
}

impl Control {
    /// Unpack the control lines from a dense 6-bit field, `zx` in the most
    /// significant position.
    #[must_use]
    pub fn from_bits(bits: u6) -> Self {
        let bits = bits.value();

        Self {
            zx: bits >> 5 & 1 != 0,
            nx: bits >> 4 & 1 != 0,
            zy: bits >> 3 & 1 != 0,
            ny: bits >> 2 & 1 != 0,
            f: bits >> 1 & 1 != 0,
            no: bits & 1 != 0,
        }
    }

    /// Pull the control lines out of an instruction word.
    ///
    /// The lines are wired straight off the word, so they carry a value for
    /// every instruction, address loads included. The ALU always runs; what
    /// an instruction does not route anywhere is simply not stored.
    #[must_use]
    pub fn from_word(word: Word) -> Self {
        Self {
            zx: word.bit(11),
            nx: word.bit(10),
            zy: word.bit(9),
            ny: word.bit(8),
            f: word.bit(7),
            no: word.bit(6),
        }
    }
}

/// The ALU result and its status lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    /// The computed word.
    pub out: Word,
    /// High when every line of `out` is low.
    pub zr: bool,
    /// High when the sign line of `out` is high.
    pub ng: bool,
}

/// Run the ALU over two operands.
#[must_use]
pub fn eval(x: Word, y: Word, control: Control) -> Output {
    let x = mux16(x, Word::ZERO, control.zx);
    let x = mux16(x, not16(x), control.nx);
    let y = mux16(y, Word::ZERO, control.zy);
    let y = mux16(y, not16(y), control.ny);

    let out = mux16(and16(x, y), add16(x, y), control.f);
    let out = mux16(out, not16(out), control.no);

    Output {
        out,
        zr: gates::not(or16way(out)),
        ng: out.bit(15),
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    /// Define a test function checking one canonical control setting
    /// against the function it is documented to compute, for x = 5 and
    /// y = 3.
    macro_rules! function {
        ($name:ident, $bits:literal, $expected:literal) => {
            #[test]
            fn $name() {
                let control = Control::from_bits(u6::new($bits));
                let result = eval(Word::new(5), Word::new(3), control);

                assert_eq!(result.out, Word::new($expected));
                assert_eq!(result.zr, $expected == 0);
                assert_eq!(result.ng, $expected >= 0x8000_u16);
            }
        };
    }

    function!(constant_zero, 0b10_1010, 0);
    function!(constant_one, 0b11_1111, 1);
    function!(constant_minus_one, 0b11_1010, 0xffff);
    function!(pass_x, 0b00_1100, 5);
    function!(pass_y, 0b11_0000, 3);
    function!(complement_x, 0b00_1101, 0xfffa);
    function!(complement_y, 0b11_0001, 0xfffc);
    function!(negate_x, 0b00_1111, 0xfffb);
    function!(negate_y, 0b11_0011, 0xfffd);
    function!(x_plus_one, 0b01_1111, 6);
    function!(y_plus_one, 0b11_0111, 4);
    function!(x_minus_one, 0b00_1110, 4);
    function!(y_minus_one, 0b11_0010, 2);
    function!(x_plus_y, 0b00_0010, 8);
    function!(x_minus_y, 0b01_0011, 2);
    function!(y_minus_x, 0b00_0111, 0xfffe);
    function!(x_and_y, 0b00_0000, 1);
    function!(x_or_y, 0b01_0101, 7);

    #[test]
    fn five_minus_three_leaves_both_status_lines_low() {
        let control = Control {
            zx: false,
            nx: true,
            zy: false,
            ny: false,
            f: true,
            no: true,
        };
        let result = eval(Word::new(5), Word::new(3), control);

        assert_eq!(result.out, Word::new(2));
        assert!(!result.zr);
        assert!(!result.ng);
    }

    #[test]
    fn control_lines_unpack_most_significant_first() {
        let control = Control::from_bits(u6::new(0b01_0011));

        assert_eq!(
            control,
            Control {
                zx: false,
                nx: true,
                zy: false,
                ny: false,
                f: true,
                no: true,
            }
        );
    }

    proptest! {
        #[test]
        fn status_lines_describe_the_output(
            x in any::<u16>(),
            y in any::<u16>(),
            bits in 0_u8..64,
        ) {
            let result = eval(Word::new(x), Word::new(y), Control::from_bits(u6::new(bits)));

            prop_assert_eq!(result.zr, result.out.is_zero());
            prop_assert_eq!(result.ng, result.out.is_negative());
        }

        #[test]
        fn subtraction_matches_wrapping_arithmetic(x in any::<u16>(), y in any::<u16>()) {
            // zx nx zy ny f no = 010011 computes x - y.
            let result = eval(Word::new(x), Word::new(y), Control::from_bits(u6::new(0b01_0011)));

            prop_assert_eq!(result.out.value(), x.wrapping_sub(y));
        }

        #[test]
        fn addition_matches_wrapping_arithmetic(x in any::<u16>(), y in any::<u16>()) {
            // zx nx zy ny f no = 000010 computes x + y.
            let result = eval(Word::new(x), Word::new(y), Control::from_bits(u6::new(0b00_0010)));

            prop_assert_eq!(result.out.value(), x.wrapping_add(y));
        }
    }
}
