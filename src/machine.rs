//! The host-side clock driver.
//!
//! A [`Machine`] wraps a [`Computer`] and paces it against a frontend: a
//! frame's worth of ticks, with the keyboard sampled before and the screen
//! handed to the renderer after. Like the parts it drives, the machine is
//! a value; driving it forward consumes it and returns the successor.

use crate::bits::Word;
use crate::computer::Computer;
use crate::fault::Fault;
use crate::hardware::{Interface, Keypad, Render};
use crate::mem::rom::Rom32k;

/// Host pacing knobs.
#[derive(Debug, Clone, Copy)]
pub struct Settings {
    /// The number of clock ticks run per rendered frame.
    pub ticks_per_frame: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ticks_per_frame: 30_000,
        }
    }
}

/// A [`Computer`] with host pacing attached.
#[derive(Debug, Clone)]
pub struct Machine {
    computer: Computer,
    settings: Settings,
}

impl Machine {
    /// Create a machine around a burnt ROM with default pacing.
    #[must_use]
    pub fn new(rom: Rom32k) -> Self {
        Self::with_settings(rom, Settings::default())
    }

    /// Create a machine around a burnt ROM with the given pacing.
    #[must_use]
    pub fn with_settings(rom: Rom32k, settings: Settings) -> Self {
        Self {
            computer: Computer::new(rom),
            settings,
        }
    }

    /// Return the wrapped machine state.
    #[must_use]
    pub const fn computer(&self) -> &Computer {
        &self.computer
    }

    /// Advance by one clock tick.
    ///
    /// # Errors
    ///
    /// Propagates any [`Fault`] the tick raises; the fault is logged and
    /// the machine is gone.
    pub fn step(mut self, reset: bool) -> Result<Self, Fault> {
        self.computer = self.computer.tick(reset).map_err(|fault| {
            log::warn!("machine halted: {fault}");
            fault
        })?;

        Ok(self)
    }

    /// Restart the running program by holding reset for one tick.
    ///
    /// # Errors
    ///
    /// Propagates any [`Fault`] the tick raises.
    pub fn restart(self) -> Result<Self, Fault> {
        log::debug!("restarting program");

        self.step(true)
    }

    /// Run one frame against a frontend.
    ///
    /// The currently held key is sampled once and stays visible to the
    /// program for the whole frame; afterwards the screen store is copied
    /// out and handed to the renderer.
    ///
    /// # Errors
    ///
    /// Propagates any [`Fault`] raised during the frame.
    pub fn frame<R, K>(mut self, interface: &mut Interface<'_, R, K>) -> Result<Self, Fault>
    where
        R: Render,
        K: Keypad,
    {
        let code = interface
            .keypad
            .pressed()
            .map_or(Word::ZERO, |key| key.code());
        self.computer.bus_mut().set_key(code);

        for _ in 0..self.settings.ticks_per_frame {
            self = self.step(false)?;
        }

        interface.renderer.blit(&self.computer.bus().snapshot_screen());

        Ok(self)
    }
}
