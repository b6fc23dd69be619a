//! Clock adapters.
//!
//! - [`SystemClock`] reads the host wall clock through `chrono` and shifts
//!   it by a fixed UTC offset, producing local epoch seconds.
//! - [`SimClock`] is stepped by hand, for the simulator and tests.

use core::cell::Cell;
use core::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

use crate::app::ports::ClockPort;
use crate::error::{Error, Result};
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(utc_offset_secs: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(utc_offset_secs).ok_or(Error::Config("utc offset out of range"))?;
        Ok(Self { offset })
    }

    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    pub fn offset_secs(&self) -> i32 {
        self.offset.local_minus_utc()
    }
}

impl ClockPort for SystemClock {
    fn now(&self) -> Timestamp {
        let local = Utc::now().timestamp() + i64::from(self.offset.local_minus_utc());
        // Pre-1970 local time only happens on a clock that was never set.
        Timestamp::from_secs(u64::try_from(local).unwrap_or(0))
    }
}

/// Manually stepped clock.
#[derive(Debug, Default)]
pub struct SimClock {
    now: Cell<Timestamp>,
}

impl SimClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get() + step);
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }
}

impl ClockPort for SimClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}
