//! Instruction decoding.
//!
//! A word whose sign line is low is an address load: the low fifteen lines
//! travel straight into the A register. Otherwise the word is a compute
//! instruction and splits into three fields: a comp field naming one of
//! the functions the ALU can produce, a dest field naming the registers
//! the result lands in, and a jump field naming the condition under which
//! the counter is loaded from A. The comp table is closed; a compute
//! instruction whose comp field misses it is rejected before any state
//! advances.

use arbitrary_int::{u15, u3, u6, u7};

use crate::alu::Control;
use crate::bits::Word;
use crate::fault::Fault;

bitfield::bitfield! {
    /// The raw bit-level view of an instruction word.
    ///
    /// Field positions follow the wire layout: the sign line distinguishes
    /// the two instruction forms, lines 14 and 13 are unused by the
    /// decoder (set high by convention in compute instructions), and the
    /// comp, dest and jump fields follow downwards.
    #[derive(Clone, Copy)]
    pub struct RawInstruction(u16);
    impl Debug;
    /// The instruction form: low for an address load, high for a compute
    /// instruction.
    pub op, _: 15;
    /// The operand select: high routes the memory word into the ALU in
    /// place of A.
    pub a, _: 12;
    /// The 7-bit comp field, operand select included.
    pub u8, comp, _: 12, 6;
    /// The 3-bit dest field: one line each for A, D and the memory.
    pub u8, dest, _: 5, 3;
    /// The 3-bit jump field.
    pub u8, jump, _: 2, 0;
    /// The 15-bit payload of an address load.
    pub u16, immediate, _: 14, 0;
}

/// The functions the comp field can name.
///
/// One variant per row of the comp table, covering both operand columns:
/// the `A` forms read the A register, the `M` forms the addressed memory
/// word. `D` always reads the D register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::doc_markdown)]
pub enum Comp {
    /// The constant 0.
    Zero,
    /// The constant 1.
    One,
    /// The constant -1.
    MinusOne,
    /// D.
    D,
    /// A.
    A,
    /// Line-wise complement of D.
    NotD,
    /// Line-wise complement of A.
    NotA,
    /// -D.
    NegD,
    /// -A.
    NegA,
    /// D + 1.
    DPlusOne,
    /// A + 1.
    APlusOne,
    /// D - 1.
    DMinusOne,
    /// A - 1.
    AMinusOne,
    /// D + A.
    DPlusA,
    /// D - A.
    DMinusA,
    /// A - D.
    AMinusD,
    /// Line-wise And of D and A.
    DAndA,
    /// Line-wise Or of D and A.
    DOrA,
    /// M.
    M,
    /// Line-wise complement of M.
    NotM,
    /// -M.
    NegM,
    /// M + 1.
    MPlusOne,
    /// M - 1.
    MMinusOne,
    /// D + M.
    DPlusM,
    /// D - M.
    DMinusM,
    /// M - D.
    MMinusD,
    /// Line-wise And of D and M.
    DAndM,
    /// Line-wise Or of D and M.
    DOrM,
}

impl Comp {
    /// Decode the comp field.
    ///
    /// The table is closed: a field outside it decodes to [`None`]. Note
    /// that the operand select participates, so e.g. the `M` column only
    /// carries the rows it actually has.
    #[must_use]
    pub fn decode(field: u7) -> Option<Self> {
        let comp = match field.value() {
            0b010_1010 => Self::Zero,
            0b011_1111 => Self::One,
            0b011_1010 => Self::MinusOne,
            0b000_1100 => Self::D,
            0b011_0000 => Self::A,
            0b000_1101 => Self::NotD,
            0b011_0001 => Self::NotA,
            0b000_1111 => Self::NegD,
            0b011_0011 => Self::NegA,
            0b001_1111 => Self::DPlusOne,
            0b011_0111 => Self::APlusOne,
            0b000_1110 => Self::DMinusOne,
            0b011_0010 => Self::AMinusOne,
            0b000_0010 => Self::DPlusA,
            0b001_0011 => Self::DMinusA,
            0b000_0111 => Self::AMinusD,
            0b000_0000 => Self::DAndA,
            0b001_0101 => Self::DOrA,
            0b111_0000 => Self::M,
            0b111_0001 => Self::NotM,
            0b111_0011 => Self::NegM,
            0b111_0111 => Self::MPlusOne,
            0b111_0010 => Self::MMinusOne,
            0b100_0010 => Self::DPlusM,
            0b101_0011 => Self::DMinusM,
            0b100_0111 => Self::MMinusD,
            0b100_0000 => Self::DAndM,
            0b101_0101 => Self::DOrM,
            _ => return None,
        };

        Some(comp)
    }

    /// Return the canonical encoding of this function, operand select in
    /// the most significant position.
    #[must_use]
    pub fn encoding(self) -> u7 {
        let bits = match self {
            Self::Zero => 0b010_1010,
            Self::One => 0b011_1111,
            Self::MinusOne => 0b011_1010,
            Self::D => 0b000_1100,
            Self::A => 0b011_0000,
            Self::NotD => 0b000_1101,
            Self::NotA => 0b011_0001,
            Self::NegD => 0b000_1111,
            Self::NegA => 0b011_0011,
            Self::DPlusOne => 0b001_1111,
            Self::APlusOne => 0b011_0111,
            Self::DMinusOne => 0b000_1110,
            Self::AMinusOne => 0b011_0010,
            Self::DPlusA => 0b000_0010,
            Self::DMinusA => 0b001_0011,
            Self::AMinusD => 0b000_0111,
            Self::DAndA => 0b000_0000,
            Self::DOrA => 0b001_0101,
            Self::M => 0b111_0000,
            Self::NotM => 0b111_0001,
            Self::NegM => 0b111_0011,
            Self::MPlusOne => 0b111_0111,
            Self::MMinusOne => 0b111_0010,
            Self::DPlusM => 0b100_0010,
            Self::DMinusM => 0b101_0011,
            Self::MMinusD => 0b100_0111,
            Self::DAndM => 0b100_0000,
            Self::DOrM => 0b101_0101,
        };

        u7::new(bits)
    }

    /// Return the six ALU control lines this function asserts.
    #[must_use]
    pub fn control(self) -> Control {
        Control::from_bits(u6::new(self.encoding().value() & 0b11_1111))
    }

    /// Check if this function reads the addressed memory word instead of
    /// the A register.
    #[must_use]
    pub fn reads_memory(self) -> bool {
        self.encoding().value() & 0b100_0000 != 0
    }
}

/// The register set a compute result lands in: any subset of A, D and the
/// addressed memory word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dest {
    /// Store nowhere.
    Null,
    /// Store to memory.
    M,
    /// Store to D.
    D,
    /// Store to memory and D.
    MD,
    /// Store to A.
    A,
    /// Store to A and memory.
    AM,
    /// Store to A and D.
    AD,
    /// Store everywhere.
    AMD,
}

impl Dest {
    /// Decode the dest field. Every value is a valid subset.
    #[must_use]
    pub fn decode(field: u3) -> Self {
        match field.value() {
            0b000 => Self::Null,
            0b001 => Self::M,
            0b010 => Self::D,
            0b011 => Self::MD,
            0b100 => Self::A,
            0b101 => Self::AM,
            0b110 => Self::AD,
            _ => Self::AMD,
        }
    }

    /// Return the canonical encoding of this subset.
    #[must_use]
    pub fn encoding(self) -> u3 {
        let bits = match self {
            Self::Null => 0b000,
            Self::M => 0b001,
            Self::D => 0b010,
            Self::MD => 0b011,
            Self::A => 0b100,
            Self::AM => 0b101,
            Self::AD => 0b110,
            Self::AMD => 0b111,
        };

        u3::new(bits)
    }

    /// Check if the A register is part of this subset.
    #[must_use]
    pub fn has_a(self) -> bool {
        self.encoding().value() & 0b100 != 0
    }

    /// Check if the D register is part of this subset.
    #[must_use]
    pub fn has_d(self) -> bool {
        self.encoding().value() & 0b010 != 0
    }

    /// Check if the addressed memory word is part of this subset.
    #[must_use]
    pub fn has_m(self) -> bool {
        self.encoding().value() & 0b001 != 0
    }
}

/// The condition under which the counter is loaded from A.
///
/// The conditions read the ALU status lines of the same tick, so a jump
/// tests the value the instruction just computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    /// Never jump.
    Null,
    /// Jump when the result is positive.
    Jgt,
    /// Jump when the result is zero.
    Jeq,
    /// Jump when the result is zero or positive.
    Jge,
    /// Jump when the result is negative.
    Jlt,
    /// Jump when the result is non-zero.
    Jne,
    /// Jump when the result is zero or negative.
    Jle,
    /// Always jump.
    Jmp,
}

impl Jump {
    /// Decode the jump field. Every value is a valid condition.
    #[must_use]
    pub fn decode(field: u3) -> Self {
        match field.value() {
            0b000 => Self::Null,
            0b001 => Self::Jgt,
            0b010 => Self::Jeq,
            0b011 => Self::Jge,
            0b100 => Self::Jlt,
            0b101 => Self::Jne,
            0b110 => Self::Jle,
            _ => Self::Jmp,
        }
    }

    /// Return the canonical encoding of this condition.
    #[must_use]
    pub fn encoding(self) -> u3 {
        let bits = match self {
            Self::Null => 0b000,
            Self::Jgt => 0b001,
            Self::Jeq => 0b010,
            Self::Jge => 0b011,
            Self::Jlt => 0b100,
            Self::Jne => 0b101,
            Self::Jle => 0b110,
            Self::Jmp => 0b111,
        };

        u3::new(bits)
    }

    /// Evaluate this condition against the ALU status lines.
    #[must_use]
    pub fn taken(self, zr: bool, ng: bool) -> bool {
        match self {
            Self::Null => false,
            Self::Jgt => !ng && !zr,
            Self::Jeq => zr,
            Self::Jge => !ng,
            Self::Jlt => ng,
            Self::Jne => !zr,
            Self::Jle => ng || zr,
            Self::Jmp => true,
        }
    }
}

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Load a 15-bit constant into the A register.
    At(u15),
    /// Run the ALU and route the result.
    Compute {
        /// The function to compute.
        comp: Comp,
        /// Where the result lands.
        dest: Dest,
        /// When the counter is loaded from A.
        jump: Jump,
    },
}

impl Instruction {
    /// Decode an instruction word.
    ///
    /// The two convention lines below the sign line are not inspected;
    /// only the comp field can make a compute instruction invalid.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IllegalInstruction`] when the comp field is not in
    /// the table.
    pub fn decode(word: Word) -> Result<Self, Fault> {
        let raw = RawInstruction(word.value());

        if !raw.op() {
            return Ok(Self::At(u15::new(raw.immediate())));
        }

        let comp = Comp::decode(u7::new(raw.comp())).ok_or(Fault::IllegalInstruction {
            word: word.value(),
        })?;
        let dest = Dest::decode(u3::new(raw.dest()));
        let jump = Jump::decode(u3::new(raw.jump()));

        Ok(Self::Compute { comp, dest, jump })
    }

    /// Encode this instruction as a word, convention lines high.
    #[must_use]
    pub fn encode(self) -> Word {
        match self {
            Self::At(addr) => Word::new(addr.value()),
            Self::Compute { comp, dest, jump } => Word::new(
                0b111 << 13
                    | u16::from(comp.encoding().value()) << 6
                    | u16::from(dest.encoding().value()) << 3
                    | u16::from(jump.encoding().value()),
            ),
        }
    }
}
