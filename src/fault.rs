//! Faults raised at the machine's boundaries.
//!
//! The machine itself has no failure modes: gates are total functions and
//! arithmetic wraps. A fault can only enter through the edges, a program
//! that does not fit its ROM, an instruction word outside the instruction
//! set, or an address beyond the memory map. None of them is recoverable
//! mid-tick; whoever drives the clock decides what to do with the fault.

use thiserror::Error;

/// A fatal condition detected at a machine boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// The comp, dest or jump field of a C-instruction is not part of the
    /// instruction set.
    #[error("unrecognised instruction word {word:#06x}")]
    IllegalInstruction {
        /// The offending 16-bit instruction word.
        word: u16,
    },
    /// An address past the keyboard register, which ends the memory map.
    #[error("address {addr:#06x} falls outside the memory map")]
    AddressOutOfRange {
        /// The offending 15-bit address.
        addr: u16,
    },
    /// A program longer than the 32,768 words the ROM can hold.
    #[error("program of {len} words does not fit in the 32K ROM")]
    ProgramTooLarge {
        /// The number of words in the rejected program.
        len: usize,
    },
    /// A line of a textual program listing that is not sixteen `0`/`1`
    /// characters.
    #[error("line {line} is not a 16-bit instruction word")]
    MalformedProgram {
        /// The 1-based line number of the rejected line.
        line: usize,
    },
}
