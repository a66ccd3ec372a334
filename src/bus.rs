//! The memory-mapped bus.
//!
//! One 15-bit address space covering three stores: the 16K main RAM, the
//! 8K screen frame-buffer behind it, and the keyboard register at the very
//! top. The top two address lines pick the store; anything past the
//! keyboard register is outside the map and rejected.
//!
//! The keyboard register has no write path from the processor. It is fed
//! from outside between ticks, which is the only externally driven
//! mutation in the whole machine.

use arbitrary_int::{u13, u14, u15};

use crate::bits::Word;
use crate::fault::Fault;
use crate::gates::{dmux, mux16};
use crate::hardware::Frame;
use crate::mem::cell::Register16;
use crate::mem::ram::{Ram16k, Ram8k};

/// The first address of the screen frame-buffer.
pub const SCREEN_START: u16 = 0x4000;

/// The address of the keyboard register, the last valid address.
pub const KEYBOARD: u16 = 0x6000;

/// The three memory stores behind one address space.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Bus {
    ram: Ram16k,
    screen: Ram8k,
    keyboard: Register16,
    out: Word,
}

impl Bus {
    /// Create a bus with zeroed stores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bus whose RAM and screen hold power-on garbage.
    #[must_use]
    pub fn new_random() -> Self {
        Self {
            ram: Ram16k::new_random(),
            screen: Ram8k::new_random(),
            keyboard: Register16::new(),
            out: Word::ZERO,
        }
    }

    /// Return the word read on the last tick.
    #[must_use]
    pub const fn out(&self) -> Word {
        self.out
    }

    /// Store a key code into the keyboard register.
    ///
    /// This is the input side of the machine; a frontend calls it between
    /// ticks and the program sees the code on the following read.
    pub fn set_key(&mut self, code: Word) {
        self.keyboard = self.keyboard.tick(code, true);
    }

    /// Return the word at the given address without clocking.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] past the keyboard register.
    pub fn peek(&self, addr: u15) -> Result<Word, Fault> {
        let addr = addr.value();

        if addr > KEYBOARD {
            return Err(Fault::AddressOutOfRange { addr });
        }

        if addr < SCREEN_START {
            Ok(self.ram.peek(u14::new(addr)))
        } else if addr < KEYBOARD {
            Ok(self.screen.peek(u13::new(addr & 0x1fff)))
        } else {
            Ok(self.keyboard.out())
        }
    }

    /// Copy the screen store into a frame a renderer can consume.
    #[must_use]
    pub fn snapshot_screen(&self) -> Frame {
        Frame::from_fn(|addr| self.screen.peek(addr))
    }

    /// Clock the bus, optionally storing `input` at `addr`.
    ///
    /// A store into the keyboard region is dropped; the register only ever
    /// changes through [`Bus::set_key`].
    ///
    /// # Errors
    ///
    /// Returns [`Fault::AddressOutOfRange`] past the keyboard register; no
    /// store has changed when this happens.
    pub fn tick(self, input: Word, addr: u15, load: bool) -> Result<Self, Fault> {
        if addr.value() > KEYBOARD {
            return Err(Fault::AddressOutOfRange { addr: addr.value() });
        }

        // Line 14 separates the RAM from the mapped devices, line 13 the
        // screen from the keyboard.
        let device = addr.value() >> 14 & 1 != 0;
        let keyboard_side = addr.value() >> 13 & 1 != 0;

        let (ram_load, device_load) = dmux(load, device);
        let (screen_load, _dropped) = dmux(device_load, keyboard_side);

        let ram = self
            .ram
            .tick(input, ram_load, u14::new(addr.value() & 0x3fff));
        let screen = self
            .screen
            .tick(input, screen_load, u13::new(addr.value() & 0x1fff));

        let out = mux16(
            ram.out(),
            mux16(screen.out(), self.keyboard.out(), keyboard_side),
            device,
        );

        Ok(Self {
            ram,
            screen,
            keyboard: self.keyboard,
            out,
        })
    }
}
