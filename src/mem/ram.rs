//! The RAM hierarchy.
//!
//! Every level is built from eight (or two, or four) copies of the level
//! below: the high address lines pick the bank, the low lines travel
//! inward. The load line is routed through a demultiplexer so that exactly
//! one register in the whole tree sees it high, and the output is the
//! multiplexed word at the addressed slot.
//!
//! A tick both stores and reads: when `load` is high the output of the
//! successor is the word just written, otherwise it is the word already
//! sitting at the address.

use arbitrary_int::{u12, u13, u14, u2, u3, u6, u9};

use crate::bits::Word;
use crate::gates::{self, dmux4way, dmux8way, mux16, mux4way16, mux8way16};
use crate::mem::cell::Register16;

/// An eight-word RAM, one [`Register16`] per slot.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Ram8 {
    registers: [Register16; 8],
    out: Word,
}

impl Ram8 {
    /// Create a zeroed eight-word RAM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an eight-word RAM holding power-on garbage.
    #[must_use]
    pub fn new_random() -> Self {
        Self {
            registers: std::array::from_fn(|_| Register16::new_random()),
            out: Word::ZERO,
        }
    }

    /// Return the word read on the last tick.
    #[must_use]
    pub const fn out(&self) -> Word {
        self.out
    }

    /// Return the word at the given slot without clocking.
    #[must_use]
    pub fn peek(&self, addr: u3) -> Word {
        self.registers[usize::from(addr.value())].out()
    }

    /// Clock this RAM, optionally storing `input` at `addr`.
    #[must_use]
    pub fn tick(self, input: Word, load: bool, addr: u3) -> Self {
        let enables = dmux8way(load, addr);

        let [r0, r1, r2, r3, r4, r5, r6, r7] = self.registers;
        let registers = [
            r0.tick(input, enables[0]),
            r1.tick(input, enables[1]),
            r2.tick(input, enables[2]),
            r3.tick(input, enables[3]),
            r4.tick(input, enables[4]),
            r5.tick(input, enables[5]),
            r6.tick(input, enables[6]),
            r7.tick(input, enables[7]),
        ];

        let out = mux8way16(
            [
                registers[0].out(),
                registers[1].out(),
                registers[2].out(),
                registers[3].out(),
                registers[4].out(),
                registers[5].out(),
                registers[6].out(),
                registers[7].out(),
            ],
            addr,
        );

        Self { registers, out }
    }
}

/// A 64-word RAM: eight [`Ram8`] banks.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Ram64 {
    banks: [Ram8; 8],
    out: Word,
}

impl Ram64 {
    /// Create a zeroed 64-word RAM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a 64-word RAM holding power-on garbage.
    #[must_use]
    pub fn new_random() -> Self {
        Self {
            banks: std::array::from_fn(|_| Ram8::new_random()),
            out: Word::ZERO,
        }
    }

    /// Return the word read on the last tick.
    #[must_use]
    pub const fn out(&self) -> Word {
        self.out
    }

    /// Return the word at the given slot without clocking.
    #[must_use]
    pub fn peek(&self, addr: u6) -> Word {
        let (high, low) = split(addr.value());

        self.banks[usize::from(high.value())].peek(low)
    }

    /// Clock this RAM, optionally storing `input` at `addr`.
    #[must_use]
    pub fn tick(self, input: Word, load: bool, addr: u6) -> Self {
        let (high, low) = split(addr.value());
        let enables = dmux8way(load, high);

        let [b0, b1, b2, b3, b4, b5, b6, b7] = self.banks;
        let banks = [
            b0.tick(input, enables[0], low),
            b1.tick(input, enables[1], low),
            b2.tick(input, enables[2], low),
            b3.tick(input, enables[3], low),
            b4.tick(input, enables[4], low),
            b5.tick(input, enables[5], low),
            b6.tick(input, enables[6], low),
            b7.tick(input, enables[7], low),
        ];

        let out = mux8way16(std::array::from_fn(|i| banks[i].out()), high);

        Self { banks, out }
    }
}

/// A 512-word RAM: eight [`Ram64`] banks.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Ram512 {
    banks: [Ram64; 8],
    out: Word,
}

impl Ram512 {
    /// Create a zeroed 512-word RAM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a 512-word RAM holding power-on garbage.
    #[must_use]
    pub fn new_random() -> Self {
        Self {
            banks: std::array::from_fn(|_| Ram64::new_random()),
            out: Word::ZERO,
        }
    }

    /// Return the word read on the last tick.
    #[must_use]
    pub const fn out(&self) -> Word {
        self.out
    }

    /// Return the word at the given slot without clocking.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn peek(&self, addr: u9) -> Word {
        let high = u3::new((addr.value() >> 6) as u8);
        let low = u6::new((addr.value() & 0x3f) as u8);

        self.banks[usize::from(high.value())].peek(low)
    }

    /// Clock this RAM, optionally storing `input` at `addr`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tick(self, input: Word, load: bool, addr: u9) -> Self {
        let high = u3::new((addr.value() >> 6) as u8);
        let low = u6::new((addr.value() & 0x3f) as u8);
        let enables = dmux8way(load, high);

        let [b0, b1, b2, b3, b4, b5, b6, b7] = self.banks;
        let banks = [
            b0.tick(input, enables[0], low),
            b1.tick(input, enables[1], low),
            b2.tick(input, enables[2], low),
            b3.tick(input, enables[3], low),
            b4.tick(input, enables[4], low),
            b5.tick(input, enables[5], low),
            b6.tick(input, enables[6], low),
            b7.tick(input, enables[7], low),
        ];

        let out = mux8way16(std::array::from_fn(|i| banks[i].out()), high);

        Self { banks, out }
    }
}

/// A 4,096-word RAM: eight [`Ram512`] banks.
///
/// From this level up the banks are kept on the heap; a fully unrolled
/// 4K-word register tree is too large to keep moving across stack frames.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Ram4k {
    banks: Box<[Ram512; 8]>,
    out: Word,
}

impl Ram4k {
    /// Create a zeroed 4,096-word RAM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a 4,096-word RAM holding power-on garbage.
    #[must_use]
    pub fn new_random() -> Self {
        Self {
            banks: Box::new(std::array::from_fn(|_| Ram512::new_random())),
            out: Word::ZERO,
        }
    }

    /// Return the word read on the last tick.
    #[must_use]
    pub const fn out(&self) -> Word {
        self.out
    }

    /// Return the word at the given slot without clocking.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn peek(&self, addr: u12) -> Word {
        let high = u3::new((addr.value() >> 9) as u8);
        let low = u9::new(addr.value() & 0x1ff);

        self.banks[usize::from(high.value())].peek(low)
    }

    /// Clock this RAM, optionally storing `input` at `addr`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tick(mut self, input: Word, load: bool, addr: u12) -> Self {
        let high = u3::new((addr.value() >> 9) as u8);
        let low = u9::new(addr.value() & 0x1ff);
        let enables = dmux8way(load, high);

        // The banks stay in place behind the box; each is swapped out,
        // ticked and swapped back in.
        for (bank, enable) in self.banks.iter_mut().zip(enables) {
            *bank = std::mem::take(bank).tick(input, enable, low);
        }

        self.out = mux8way16(std::array::from_fn(|i| self.banks[i].out()), high);
        self
    }
}

/// An 8,192-word RAM: two [`Ram4k`] banks on a single select line.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Ram8k {
    banks: [Ram4k; 2],
    out: Word,
}

impl Ram8k {
    /// Create a zeroed 8,192-word RAM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an 8,192-word RAM holding power-on garbage.
    #[must_use]
    pub fn new_random() -> Self {
        Self {
            banks: std::array::from_fn(|_| Ram4k::new_random()),
            out: Word::ZERO,
        }
    }

    /// Return the word read on the last tick.
    #[must_use]
    pub const fn out(&self) -> Word {
        self.out
    }

    /// Return the word at the given slot without clocking.
    #[must_use]
    pub fn peek(&self, addr: u13) -> Word {
        let high = addr.value() >> 12 & 1 != 0;
        let low = u12::new(addr.value() & 0xfff);

        self.banks[usize::from(high)].peek(low)
    }

    /// Clock this RAM, optionally storing `input` at `addr`.
    #[must_use]
    pub fn tick(self, input: Word, load: bool, addr: u13) -> Self {
        let high = addr.value() >> 12 & 1 != 0;
        let low = u12::new(addr.value() & 0xfff);
        let (front, back) = gates::dmux(load, high);

        let [b0, b1] = self.banks;
        let banks = [b0.tick(input, front, low), b1.tick(input, back, low)];

        let out = mux16(banks[0].out(), banks[1].out(), high);

        Self { banks, out }
    }
}

/// A 16,384-word RAM: four [`Ram4k`] banks on two select lines.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Ram16k {
    banks: [Ram4k; 4],
    out: Word,
}

impl Ram16k {
    /// Create a zeroed 16,384-word RAM.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a 16,384-word RAM holding power-on garbage.
    #[must_use]
    pub fn new_random() -> Self {
        Self {
            banks: std::array::from_fn(|_| Ram4k::new_random()),
            out: Word::ZERO,
        }
    }

    /// Return the word read on the last tick.
    #[must_use]
    pub const fn out(&self) -> Word {
        self.out
    }

    /// Return the word at the given slot without clocking.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn peek(&self, addr: u14) -> Word {
        let high = u2::new((addr.value() >> 12) as u8);
        let low = u12::new(addr.value() & 0xfff);

        self.banks[usize::from(high.value())].peek(low)
    }

    /// Clock this RAM, optionally storing `input` at `addr`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn tick(self, input: Word, load: bool, addr: u14) -> Self {
        let high = u2::new((addr.value() >> 12) as u8);
        let low = u12::new(addr.value() & 0xfff);
        let enables = dmux4way(load, high);

        let [b0, b1, b2, b3] = self.banks;
        let banks = [
            b0.tick(input, enables[0], low),
            b1.tick(input, enables[1], low),
            b2.tick(input, enables[2], low),
            b3.tick(input, enables[3], low),
        ];

        let out = mux4way16(std::array::from_fn(|i| banks[i].out()), high);

        Self { banks, out }
    }
}

/// Split a 6-bit address into its bank and slot parts.
fn split(addr: u8) -> (u3, u3) {
    (u3::new(addr >> 3 & 0b111), u3::new(addr & 0b111))
}
