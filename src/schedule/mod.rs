//! Automatic schedules.
//!
//! A zone carries at most one [`Schedule`]: either a [`DailySchedule`]
//! (time-of-day window on selected weekdays) or an [`IntervalSchedule`]
//! (fixed on/off cycle from an anchor epoch).  Replacing a schedule is
//! always a whole-value swap; nothing is patched in place.

pub mod daily;
pub mod interval;

use serde::{Deserialize, Serialize};

pub use daily::{DailySchedule, DaySet, TimeOfDay};
pub use interval::{IntervalSchedule, Pattern, Phase};

/// Desired output level produced by a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    On,
    Off,
}

impl Intent {
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Schedule {
    Daily(DailySchedule),
    Interval(IntervalSchedule),
}

/// Queryable schedule fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleElement {
    StartTime,
    StopTime,
    StartHour,
    StartMinute,
    StopHour,
    StopMinute,
    DaysOfWeek,
    EpochStart,
    OnDuration,
    OffDuration,
}

impl Schedule {
    /// Read one schedule field, `None` when the variant has no such field.
    ///
    /// Times come back packed (`HHMM`), days as a packed digit list and
    /// durations in seconds.
    pub fn read(&self, element: ScheduleElement) -> Option<u64> {
        use ScheduleElement as E;
        match self {
            Self::Daily(d) => {
                let v = match element {
                    E::StartTime => u64::from(d.start().packed()),
                    E::StopTime => u64::from(d.stop().packed()),
                    E::StartHour => u64::from(d.start().hour()),
                    E::StartMinute => u64::from(d.start().minute()),
                    E::StopHour => u64::from(d.stop().hour()),
                    E::StopMinute => u64::from(d.stop().minute()),
                    E::DaysOfWeek => u64::from(d.days().to_packed()),
                    E::EpochStart | E::OnDuration | E::OffDuration => return None,
                };
                Some(v)
            }
            Self::Interval(i) => match element {
                E::EpochStart => Some(i.epoch_start().as_secs()),
                E::OnDuration => Some(u64::from(i.primary().on_secs())),
                E::OffDuration => Some(u64::from(i.primary().off_secs())),
                _ => None,
            },
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Daily(_) => "daily",
            Self::Interval(_) => "interval",
        }
    }
}
