//! The whole machine.
//!
//! A [`Computer`] is the ROM, the processor and the bus folded together.
//! One tick runs the full fetch-execute path: read the instruction at the
//! counter, execute it, then clock the bus with whatever the instruction
//! asked to store. Nothing in between is observable; the successor value
//! is the machine one clock edge later.

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::fault::Fault;
use crate::mem::rom::Rom32k;

/// The Hack machine: instruction ROM, processor and memory bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computer {
    rom: Rom32k,
    cpu: Cpu,
    bus: Bus,
}

impl Computer {
    /// Create a machine in its cold-start state around a burnt ROM:
    /// registers, counter and memory all zero.
    #[must_use]
    pub fn new(rom: Rom32k) -> Self {
        Self {
            rom,
            cpu: Cpu::new(),
            bus: Bus::new(),
        }
    }

    /// Return the instruction ROM.
    #[must_use]
    pub const fn rom(&self) -> &Rom32k {
        &self.rom
    }

    /// Return the processor state.
    #[must_use]
    pub const fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Return the memory bus.
    #[must_use]
    pub const fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Return the memory bus mutably, for feeding the keyboard register
    /// between ticks.
    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    /// Advance the machine by one clock tick.
    ///
    /// Holding `reset` high restarts the program: the instruction still
    /// executes, but the counter comes out zero.
    ///
    /// # Errors
    ///
    /// Returns [`Fault::IllegalInstruction`] or
    /// [`Fault::AddressOutOfRange`] when the fetched instruction is
    /// outside the instruction set or addresses memory outside the map.
    /// Faults are fatal; the machine they consumed is gone.
    pub fn tick(self, reset: bool) -> Result<Self, Fault> {
        let instruction = self.rom.read(self.cpu.pc_out());

        let cpu = self.cpu.tick(instruction, self.bus.out(), reset)?;
        let bus = self.bus.tick(cpu.out_m(), cpu.address_m(), cpu.write_m())?;

        Ok(Self {
            rom: self.rom,
            cpu,
            bus,
        })
    }
}
