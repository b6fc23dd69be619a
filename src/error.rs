//! Unified error type for the zone controller.
//!
//! Configuration mistakes never panic and never stop the control loop: the
//! offending zone is left disabled and the caller receives one of these
//! variants so it can tell "no schedule" apart from a legitimate midnight.
//! All variants are `Copy` so they can ride inside controller events.

use core::fmt;

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Packed `HHMM` value with hour > 23 or minute > 59.
    InvalidTime(u16),
    /// Daily stop time of 00:00 cannot arm a schedule.
    StopAtMidnight,
    /// Packed day list decoded to no days at all.
    EmptyDaySet,
    /// Packed day list contained a digit outside 1..=7.
    InvalidDayDigit(u8),
    /// Interval on/off duration of zero seconds.
    ZeroDuration,
    /// Shifted channel index beyond the configured bank.
    ChannelOutOfRange(u16),
    /// A shifted channel was addressed before the bank was configured.
    ShiftRegisterNotConfigured,
    /// Shift register byte count outside 1..=MAX_SHIFT_BYTES.
    InvalidShiftBytes(u8),
    /// Controller zone table is full.
    TooManyZones,
    /// Zone index does not exist.
    UnknownZone(usize),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTime(t) => write!(f, "invalid packed time {t:04}"),
            Self::StopAtMidnight => write!(f, "stop time 00:00 is not schedulable"),
            Self::EmptyDaySet => write!(f, "no scheduled days"),
            Self::InvalidDayDigit(d) => write!(f, "invalid day digit {d} (expected 1-7)"),
            Self::ZeroDuration => write!(f, "interval durations must be non-zero"),
            Self::ChannelOutOfRange(i) => write!(f, "shift channel {i} out of range"),
            Self::ShiftRegisterNotConfigured => write!(f, "shift register not configured"),
            Self::InvalidShiftBytes(n) => write!(f, "invalid shift register byte count {n}"),
            Self::TooManyZones => write!(f, "zone table full"),
            Self::UnknownZone(id) => write!(f, "unknown zone {id}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
