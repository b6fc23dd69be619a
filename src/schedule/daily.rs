//! Time-of-day / day-of-week schedule.
//!
//! Times and day lists arrive packed as decimal integers, the way they are
//! typed into a config file or a serial console:
//!
//! | Packed    | Meaning                          |
//! |-----------|----------------------------------|
//! | `1637`    | 16:37                            |
//! | `5`       | 00:05                            |
//! | `1234567` | every day (digit `d` → ordinal `d - 1`, `1` = Sunday) |
//! | `246`     | Monday, Wednesday, Friday        |
//!
//! Matching is minute-granular: a boundary is a single-minute window.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::time::{WallClock, weekday_name};

// ---------------------------------------------------------------------------
// Time of day
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: Self = Self { hour: 0, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidTime(u16::from(hour) * 100 + u16::from(minute)));
        }
        Ok(Self { hour, minute })
    }

    /// Parse a packed `HHMM` integer.
    pub fn from_packed(packed: u16) -> Result<Self> {
        let hour = packed / 100;
        let minute = packed % 100;
        if hour > 23 || minute > 59 {
            return Err(Error::InvalidTime(packed));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub const fn packed(self) -> u16 {
        self.hour as u16 * 100 + self.minute as u16
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    pub const fn is_midnight(self) -> bool {
        self.hour == 0 && self.minute == 0
    }

    pub const fn matches(self, clock: WallClock) -> bool {
        self.hour == clock.hour && self.minute == clock.minute
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// ---------------------------------------------------------------------------
// Day set
// ---------------------------------------------------------------------------

/// Set of day-of-week ordinals stored as a 7-bit mask (bit 0 = Sunday).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySet(u8);

impl DaySet {
    pub const EMPTY: Self = Self(0);
    pub const EVERY_DAY: Self = Self(0b0111_1111);

    /// Decode a packed decimal day list, rightmost digit first.
    ///
    /// Duplicate digits are harmless; `0`, `8` and `9` are rejected.
    pub fn from_packed(mut packed: u32) -> Result<Self> {
        if packed == 0 {
            return Err(Error::EmptyDaySet);
        }
        let mut mask = 0u8;
        while packed > 0 {
            let digit = (packed % 10) as u8;
            if !(1..=7).contains(&digit) {
                return Err(Error::InvalidDayDigit(digit));
            }
            mask |= 1 << (digit - 1);
            packed /= 10;
        }
        Ok(Self(mask))
    }

    /// Re-encode as a packed decimal list in ascending digit order.
    pub fn to_packed(self) -> u32 {
        self.iter().fold(0, |acc, ordinal| acc * 10 + u32::from(ordinal) + 1)
    }

    pub const fn contains(self, ordinal: u8) -> bool {
        ordinal < 7 && self.0 & (1 << ordinal) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Ordinals in ascending order.
    pub fn iter(self) -> impl Iterator<Item = u8> {
        (0..7u8).filter(move |&d| self.contains(d))
    }
}

impl fmt::Display for DaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for d in self.iter() {
            if !first {
                f.write_str(",")?;
            }
            f.write_str(weekday_name(d))?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Daily schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySchedule {
    start: TimeOfDay,
    stop: TimeOfDay,
    days: DaySet,
}

impl DailySchedule {
    /// Build from packed config values.
    ///
    /// A stop time of `0000` and an empty day list are both rejected: neither
    /// can arm a schedule.  A start time of `0000` is valid.
    pub fn from_packed(start_time: u16, stop_time: u16, days_of_week: u32) -> Result<Self> {
        if stop_time == 0 {
            return Err(Error::StopAtMidnight);
        }
        let start = TimeOfDay::from_packed(start_time)?;
        let stop = TimeOfDay::from_packed(stop_time)?;
        let days = DaySet::from_packed(days_of_week)?;
        Ok(Self { start, stop, days })
    }

    pub fn new(start: TimeOfDay, stop: TimeOfDay, days: DaySet) -> Result<Self> {
        if stop.is_midnight() {
            return Err(Error::StopAtMidnight);
        }
        if days.is_empty() {
            return Err(Error::EmptyDaySet);
        }
        Ok(Self { start, stop, days })
    }

    pub const fn start(&self) -> TimeOfDay {
        self.start
    }

    pub const fn stop(&self) -> TimeOfDay {
        self.stop
    }

    pub const fn days(&self) -> DaySet {
        self.days
    }

    pub const fn is_scheduled_day(&self, clock: WallClock) -> bool {
        self.days.contains(clock.weekday)
    }

    pub const fn is_start(&self, clock: WallClock) -> bool {
        self.start.matches(clock)
    }

    pub const fn is_stop(&self, clock: WallClock) -> bool {
        self.stop.matches(clock)
    }
}
