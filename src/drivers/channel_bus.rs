//! Channel routing: direct GPIO lines and shift-register bits behind one port.
//!
//! [`ChannelBus`] owns the line driver and the single [`ShiftRegisterBank`]
//! shared by every shifted zone.  Zones borrow it mutably for the duration
//! of a call, so within one control loop writes are naturally serialised.
//!
//! When the bus must be reachable from more than one thread, wrap it in a
//! [`SharedChannelBus`]: each write (including the full-image commit it
//! may trigger) runs inside one critical section, so two zones can never
//! interleave partial shift-outs.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::CriticalSectionMutex;
use log::{debug, warn};

use super::shift_register::{ShiftPins, ShiftRegisterBank};
use crate::app::ports::{ChannelAddress, ChannelPort, OutputSink};
use crate::error::Result;

/// Bitmap covering every `u8` line number.
const DIRECT_IMAGE_BYTES: usize = 32;

pub struct ChannelBus<S> {
    sink: S,
    bank: ShiftRegisterBank,
    direct: [u8; DIRECT_IMAGE_BYTES],
}

impl<S: OutputSink> ChannelBus<S> {
    pub const fn new(sink: S) -> Self {
        Self {
            sink,
            bank: ShiftRegisterBank::new(),
            direct: [0; DIRECT_IMAGE_BYTES],
        }
    }

    /// Configure the shared shift register.  Only the first call takes
    /// effect; returns whether this one did.
    pub fn configure_shift(&mut self, pins: ShiftPins, total_bytes: u8) -> Result<bool> {
        self.bank.configure(pins, total_bytes, &mut self.sink)
    }

    pub const fn bank(&self) -> &ShiftRegisterBank {
        &self.bank
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn set_direct(&mut self, pin: u8, level: bool) {
        let (byte, bit) = (usize::from(pin / 8), pin % 8);
        if level {
            self.direct[byte] |= 1 << bit;
        } else {
            self.direct[byte] &= !(1 << bit);
        }
        self.sink.set_level(pin, level);
    }

    fn direct_level(&self, pin: u8) -> bool {
        self.direct[usize::from(pin / 8)] & (1 << (pin % 8)) != 0
    }
}

impl<S: OutputSink> ChannelPort for ChannelBus<S> {
    fn write(&mut self, address: ChannelAddress, level: bool) {
        match address {
            ChannelAddress::Direct(pin) => self.set_direct(pin, level),
            ChannelAddress::Shifted(index) => {
                if let Err(e) = self.bank.set_bit(index, level, &mut self.sink) {
                    warn!("{}: write dropped ({})", address, e);
                }
            }
        }
    }

    fn read(&self, address: ChannelAddress) -> bool {
        match address {
            ChannelAddress::Direct(pin) => self.direct_level(pin),
            ChannelAddress::Shifted(index) => self.bank.read_bit(index),
        }
    }

    fn begin(&mut self, address: ChannelAddress) {
        match address {
            ChannelAddress::Direct(pin) => {
                self.sink.configure_output(pin);
                self.set_direct(pin, false);
            }
            ChannelAddress::Shifted(index) => {
                if !self.bank.is_configured() {
                    warn!("{}: shift register not configured", address);
                } else if index >= self.bank.channels() {
                    warn!("{}: beyond {} shift channels", address, self.bank.channels());
                } else {
                    debug!("{}: cleared by shift register init", address);
                }
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Thread-shared bus
// ───────────────────────────────────────────────────────────────

/// [`ChannelBus`] behind a critical-section mutex.  `&SharedChannelBus`
/// implements [`ChannelPort`].
pub struct SharedChannelBus<S> {
    inner: CriticalSectionMutex<RefCell<ChannelBus<S>>>,
}

impl<S: OutputSink> SharedChannelBus<S> {
    pub const fn new(bus: ChannelBus<S>) -> Self {
        Self {
            inner: CriticalSectionMutex::new(RefCell::new(bus)),
        }
    }

    /// Run `f` with exclusive access to the bus.
    pub fn with<R>(&self, f: impl FnOnce(&mut ChannelBus<S>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn into_inner(self) -> ChannelBus<S> {
        self.inner.into_inner().into_inner()
    }
}

impl<S: OutputSink> ChannelPort for &SharedChannelBus<S> {
    fn write(&mut self, address: ChannelAddress, level: bool) {
        self.with(|bus| bus.write(address, level));
    }

    fn read(&self, address: ChannelAddress) -> bool {
        self.inner.lock(|cell| cell.borrow().read(address))
    }

    fn begin(&mut self, address: ChannelAddress) {
        self.with(|bus| bus.begin(address));
    }
}
