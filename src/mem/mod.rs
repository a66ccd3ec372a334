//! The sequential side of the machine.
//!
//! Everything in here latches state on a clock edge. A component's `tick`
//! consumes it and returns the successor holding the newly latched state;
//! ticking is the only way state changes, so a component value is always a
//! consistent snapshot of one instant.

pub mod cell;
pub mod pc;
pub mod ram;
pub mod rom;
