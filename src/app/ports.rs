//! Port traits: the hexagonal boundary between zone logic and the outside world.
//!
//! ```text
//!   ClockPort ──▶ ZoneController ──▶ ChannelPort ──▶ OutputSink ──▶ GPIO
//!                       │                 │
//!                       ▼                 └──▶ ShiftRegisterBank
//!                   EventSink
//! ```
//!
//! The zone core never touches hardware directly.  It computes *what* a
//! channel should read and hands that to a [`ChannelPort`]; the port decides
//! whether that means toggling one line or re-shifting a whole register
//! image through an [`OutputSink`].

use core::fmt;

use serde::{Deserialize, Serialize};

use super::events::ZoneEvent;
use crate::time::Timestamp;

// ───────────────────────────────────────────────────────────────
// Channel addressing
// ───────────────────────────────────────────────────────────────

/// Where a zone's output lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelAddress {
    /// A dedicated GPIO line.
    Direct(u8),
    /// A linear bit index into the shared shift-register image.
    Shifted(u16),
}

impl fmt::Display for ChannelAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Direct(pin) => write!(f, "pin {pin}"),
            Self::Shifted(index) => write!(f, "shift {index}"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Output sink (driven adapter: domain → physical lines)
// ───────────────────────────────────────────────────────────────

/// Physical line driver.
///
/// Writes are synchronous and infallible at this layer; adapters wrapping
/// fallible pins log and swallow their errors.
pub trait OutputSink {
    /// Drive `line` high or low.
    fn set_level(&mut self, line: u8, high: bool);

    /// Put `line` into output mode.  Most sinks are pre-configured.
    fn configure_output(&mut self, _line: u8) {}
}

impl<T: OutputSink + ?Sized> OutputSink for &mut T {
    fn set_level(&mut self, line: u8, high: bool) {
        (**self).set_level(line, high);
    }

    fn configure_output(&mut self, line: u8) {
        (**self).configure_output(line);
    }
}

// ───────────────────────────────────────────────────────────────
// Channel port (logical channels)
// ───────────────────────────────────────────────────────────────

/// Logical channel access used by [`Zone`](crate::zone::Zone).
pub trait ChannelPort {
    /// Set a channel's level.
    fn write(&mut self, address: ChannelAddress, level: bool);

    /// Last level written to a channel (from the in-memory image).
    fn read(&self, address: ChannelAddress) -> bool;

    /// Prepare a channel for use and drive it low.
    fn begin(&mut self, address: ChannelAddress);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Source of the current local time.  Must be monotonically non-decreasing.
pub trait ClockPort {
    fn now(&self) -> Timestamp;
}

// ───────────────────────────────────────────────────────────────
// Event sink
// ───────────────────────────────────────────────────────────────

/// The controller emits [`ZoneEvent`]s through this port.  Adapters decide
/// where they go (serial log, telemetry, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &ZoneEvent);
}
