//! Daisy-chained 74HC595-style shift register bank.
//!
//! Holds the parallel-output image for every register in the chain and
//! bit-bangs it out through an [`OutputSink`] whenever a bit changes.
//!
//! ## Addressing
//!
//! A linear channel index maps to `(index / 8, index % 8)`:
//!
//! ```text
//!   index 10 ──▶ byte 1, bit 2
//!
//!   image:  [ byte 0 ][ byte 1 ][ byte 2 ] …
//!                       ^^^^^^
//!                       0000_0100
//! ```
//!
//! ## Commit
//!
//! Latch low, shift every byte (highest index first, MSB first, data
//! sampled on the clock's rising edge), latch high.  The outputs change
//! atomically when the latch rises, so a commit always presents a whole
//! image.
//!
//! Configuration happens once.  Later `configure` calls are ignored so a
//! second zone cannot re-initialise hardware that is already driving
//! valves.

use heapless::Vec;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::app::ports::OutputSink;
use crate::error::{Error, Result};

/// Largest supported chain (64 channels).
pub const MAX_SHIFT_BYTES: usize = 8;

/// GPIO lines wired to the register chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftPins {
    pub serial: u8,
    pub latch: u8,
    pub clock: u8,
}

impl ShiftPins {
    pub const fn contains(&self, line: u8) -> bool {
        self.serial == line || self.latch == line || self.clock == line
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShiftRegisterBank {
    pins: Option<ShiftPins>,
    image: Vec<u8, MAX_SHIFT_BYTES>,
}

impl ShiftRegisterBank {
    pub const fn new() -> Self {
        Self {
            pins: None,
            image: Vec::new(),
        }
    }

    /// Configure pins and chain length, then clear every output.
    ///
    /// Returns `Ok(false)` without touching anything when already configured.
    pub fn configure(&mut self, pins: ShiftPins, total_bytes: u8, sink: &mut impl OutputSink) -> Result<bool> {
        if let Some(current) = self.pins {
            debug!(
                "shift register already configured ({:?}, {} bytes); ignoring {:?}, {} bytes",
                current,
                self.image.len(),
                pins,
                total_bytes
            );
            return Ok(false);
        }
        let len = usize::from(total_bytes);
        if len == 0 || len > MAX_SHIFT_BYTES {
            return Err(Error::InvalidShiftBytes(total_bytes));
        }

        sink.configure_output(pins.serial);
        sink.configure_output(pins.latch);
        sink.configure_output(pins.clock);

        self.image.clear();
        // Length already checked against capacity.
        let _ = self.image.resize(len, 0);
        self.pins = Some(pins);
        self.commit(pins, sink);

        info!(
            "shift register: serial={} latch={} clock={} bytes={}",
            pins.serial, pins.latch, pins.clock, total_bytes
        );
        Ok(true)
    }

    pub const fn is_configured(&self) -> bool {
        self.pins.is_some()
    }

    pub const fn pins(&self) -> Option<ShiftPins> {
        self.pins
    }

    pub fn total_bytes(&self) -> usize {
        self.image.len()
    }

    /// Number of addressable channels.
    pub fn channels(&self) -> u16 {
        self.image.len() as u16 * 8
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Set or clear one channel and shift the full image out.
    pub fn set_bit(&mut self, index: u16, level: bool, sink: &mut impl OutputSink) -> Result<()> {
        let pins = self.pins.ok_or(Error::ShiftRegisterNotConfigured)?;
        let (byte, bit) = self.locate(index).ok_or(Error::ChannelOutOfRange(index))?;
        if level {
            self.image[byte] |= 1 << bit;
        } else {
            self.image[byte] &= !(1 << bit);
        }
        self.commit(pins, sink);
        Ok(())
    }

    /// Current image bit.  Out-of-range indices read low.
    pub fn read_bit(&self, index: u16) -> bool {
        self.locate(index)
            .is_some_and(|(byte, bit)| self.image[byte] & (1 << bit) != 0)
    }

    fn locate(&self, index: u16) -> Option<(usize, u8)> {
        let byte = usize::from(index / 8);
        (byte < self.image.len()).then_some((byte, (index % 8) as u8))
    }

    fn commit(&self, pins: ShiftPins, sink: &mut impl OutputSink) {
        sink.set_level(pins.latch, false);
        for &byte in self.image.iter().rev() {
            for bit in (0..8).rev() {
                sink.set_level(pins.serial, byte & (1 << bit) != 0);
                sink.set_level(pins.clock, true);
                sink.set_level(pins.clock, false);
            }
        }
        sink.set_level(pins.latch, true);
    }
}
