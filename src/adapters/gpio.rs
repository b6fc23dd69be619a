//! `embedded-hal` GPIO adapter.
//!
//! Maps line numbers onto concrete [`OutputPin`]s so the channel bus and the
//! shift register can drive real hardware.  Pin errors are logged and
//! dropped: a stuck line must not stop the control loop.

use embedded_hal::digital::{Error as _, OutputPin};
use heapless::Vec;
use log::warn;

use crate::app::ports::OutputSink;
use crate::error::{Error, Result};

pub struct GpioSink<P, const N: usize> {
    pins: Vec<(u8, P), N>,
}

impl<P: OutputPin, const N: usize> GpioSink<P, N> {
    pub const fn new() -> Self {
        Self { pins: Vec::new() }
    }

    /// Attach `pin` as `line`.  A line can only be attached once.
    pub fn attach(&mut self, line: u8, pin: P) -> Result<()> {
        if self.pins.iter().any(|(l, _)| *l == line) {
            return Err(Error::Config("gpio line attached twice"));
        }
        self.pins
            .push((line, pin))
            .map_err(|_| Error::Config("gpio table full"))
    }

    pub fn lines(&self) -> impl Iterator<Item = u8> + '_ {
        self.pins.iter().map(|(l, _)| *l)
    }

    fn pin_mut(&mut self, line: u8) -> Option<&mut P> {
        self.pins.iter_mut().find(|(l, _)| *l == line).map(|(_, p)| p)
    }
}

impl<P: OutputPin, const N: usize> Default for GpioSink<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: OutputPin, const N: usize> OutputSink for GpioSink<P, N> {
    fn set_level(&mut self, line: u8, high: bool) {
        let Some(pin) = self.pin_mut(line) else {
            warn!("gpio {}: not attached", line);
            return;
        };
        let result = if high { pin.set_high() } else { pin.set_low() };
        if let Err(e) = result {
            warn!("gpio {}: write failed ({:?})", line, e.kind());
        }
    }
}
