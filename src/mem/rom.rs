//! The instruction ROM.
//!
//! The ROM is the one memory with no write path: it is burnt once from an
//! assembled program and read combinationally ever after. Programs shorter
//! than the full 32K are padded with zero words, which decode as `@0` and
//! are harmless to fall into.

use arbitrary_int::u15;

use crate::bits::Word;
use crate::fault::Fault;

/// The number of words the ROM holds.
pub const ROM_WORDS: usize = 1 << 15;

/// A 32,768-word instruction ROM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rom32k {
    words: Box<[Word; ROM_WORDS]>,
}

impl Rom32k {
    /// Create a ROM holding only zero words.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: Box::new([Word::ZERO; ROM_WORDS]),
        }
    }

    /// Burn a ROM from an assembled program, padding with zero words.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::ProgramTooLarge`] when the program holds more than
    /// 32,768 words.
    pub fn from_words(program: &[Word]) -> Result<Self, Fault> {
        if program.len() > ROM_WORDS {
            return Err(Fault::ProgramTooLarge {
                len: program.len(),
            });
        }

        let mut rom = Self::new();
        rom.words[..program.len()].copy_from_slice(program);

        log::info!(
            "burnt {} word program, checksum {:#06x}",
            program.len(),
            rom.checksum()
        );

        Ok(rom)
    }

    /// Read the word at the given address.
    #[must_use]
    pub fn read(&self, addr: u15) -> Word {
        self.words[usize::from(addr.value())]
    }

    /// Return the checksum of the words burnt into this ROM.
    #[must_use]
    pub fn checksum(&self) -> u16 {
        self.words
            .iter()
            .map(|word| word.value())
            .fold(0, u16::wrapping_add)
    }
}

impl Default for Rom32k {
    fn default() -> Self {
        Self::new()
    }
}
