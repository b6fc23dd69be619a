//! Local epoch timestamps and their wall-clock decomposition.
//!
//! The controller never looks at a calendar: a [`Timestamp`] is plain
//! seconds since 1970-01-01 00:00 *local* time (the clock adapter applies
//! a fixed UTC offset, see [`crate::adapters::time`]).  Hour, minute and
//! day-of-week are derived arithmetically so both schedule variants agree
//! on a single convention.
//!
//! Day-of-week ordinals run `0 = Sunday … 6 = Saturday`.

use core::fmt;
use core::ops::Add;
use core::time::Duration;

use serde::{Deserialize, Serialize};

pub const SECS_PER_MINUTE: u64 = 60;
pub const SECS_PER_HOUR: u64 = 3_600;
pub const SECS_PER_DAY: u64 = 86_400;

/// 1970-01-01 was a Thursday.
const EPOCH_WEEKDAY: u64 = 4;

/// Seconds since the local epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Hour of day, 0–23.
    pub const fn hour(self) -> u8 {
        ((self.0 / SECS_PER_HOUR) % 24) as u8
    }

    /// Minute of hour, 0–59.
    pub const fn minute(self) -> u8 {
        ((self.0 / SECS_PER_MINUTE) % 60) as u8
    }

    /// Day-of-week ordinal, `0 = Sunday`.
    pub const fn weekday(self) -> u8 {
        ((self.0 / SECS_PER_DAY + EPOCH_WEEKDAY) % 7) as u8
    }

    pub const fn wall_clock(self) -> WallClock {
        WallClock {
            hour: self.hour(),
            minute: self.minute(),
            weekday: self.weekday(),
        }
    }

    /// Seconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub const fn saturating_since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    pub const fn saturating_add_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        self.saturating_add_secs(rhs.as_secs())
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.wall_clock();
        write!(
            f,
            "{}[{} {:02}:{:02}]",
            self.0,
            weekday_name(w.weekday),
            w.hour,
            w.minute
        )
    }
}

/// Broken-down minute-resolution view of a [`Timestamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallClock {
    pub hour: u8,
    pub minute: u8,
    pub weekday: u8,
}

pub const fn weekday_name(ordinal: u8) -> &'static str {
    match ordinal {
        0 => "Sun",
        1 => "Mon",
        2 => "Tue",
        3 => "Wed",
        4 => "Thu",
        5 => "Fri",
        6 => "Sat",
        _ => "???",
    }
}
