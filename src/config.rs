//! System configuration parameters
//!
//! Describes the zone fleet: which channel each zone drives, its schedule,
//! the shared shift register and the control-loop timing.  Loaded from JSON
//! by the simulator and from postcard bytes by firmware that keeps it in
//! flash.

use core::fmt::Write;
use core::time::Duration;

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::app::ports::ChannelAddress;
use crate::app::service::MAX_ZONES;
use crate::drivers::shift_register::{ShiftPins, MAX_SHIFT_BYTES};
use crate::error::{Error, Result};
use crate::pins;
use crate::schedule::{DailySchedule, Pattern};
use crate::time::{Timestamp, SECS_PER_HOUR};
use crate::zone::Zone;

/// Longest zone label kept.
pub const LABEL_LEN: usize = 24;

/// Largest UTC offset any real zone uses.
const MAX_UTC_OFFSET_SECS: i32 = 14 * SECS_PER_HOUR as i32;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Control loop interval (milliseconds).  Must stay under a minute so
    /// no daily boundary is missed.
    pub control_loop_interval_ms: u32,
    /// Local time offset applied by the clock adapter (seconds east of UTC).
    #[serde(default)]
    pub utc_offset_secs: i32,
    #[serde(default)]
    pub shift_register: Option<ShiftRegisterConfig>,
    pub zones: Vec<ZoneConfig, MAX_ZONES>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRegisterConfig {
    pub serial_pin: u8,
    pub latch_pin: u8,
    pub clock_pin: u8,
    pub total_bytes: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub label: String<LABEL_LEN>,
    pub channel: ChannelAddress,
    #[serde(default)]
    pub schedule: Option<ScheduleConfig>,
}

/// Schedule in its packed form (`HHMM` times, day digits `1 = Sunday`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleConfig {
    Daily {
        start_time: u16,
        stop_time: u16,
        days_of_week: u32,
        #[serde(default = "enabled_by_default")]
        enabled: bool,
    },
    Interval {
        epoch_start: u64,
        on_secs: u32,
        off_secs: u32,
        #[serde(default)]
        secondary_on_secs: u32,
        #[serde(default)]
        secondary_off_secs: u32,
    },
}

fn enabled_by_default() -> bool {
    true
}

impl ShiftRegisterConfig {
    pub const fn pins(&self) -> ShiftPins {
        ShiftPins {
            serial: self.serial_pin,
            latch: self.latch_pin,
            clock: self.clock_pin,
        }
    }

    pub const fn channels(&self) -> u16 {
        self.total_bytes as u16 * 8
    }

    fn validate(&self) -> Result<()> {
        if self.total_bytes == 0 || usize::from(self.total_bytes) > MAX_SHIFT_BYTES {
            return Err(Error::InvalidShiftBytes(self.total_bytes));
        }
        if self.serial_pin == self.latch_pin
            || self.serial_pin == self.clock_pin
            || self.latch_pin == self.clock_pin
        {
            return Err(Error::Config("shift register lines must be distinct"));
        }
        Ok(())
    }
}

impl ScheduleConfig {
    /// Install this schedule on `zone`.  Errors leave the zone disabled.
    pub fn apply(&self, zone: &mut Zone) -> Result<()> {
        match *self {
            Self::Daily {
                start_time,
                stop_time,
                days_of_week,
                enabled,
            } => zone.configure_daily(start_time, stop_time, days_of_week, enabled),
            Self::Interval {
                epoch_start,
                on_secs,
                off_secs,
                secondary_on_secs,
                secondary_off_secs,
            } => zone.configure_interval(
                Timestamp::from_secs(epoch_start),
                Duration::from_secs(u64::from(on_secs)),
                Duration::from_secs(u64::from(off_secs)),
                Duration::from_secs(u64::from(secondary_on_secs)),
                Duration::from_secs(u64::from(secondary_off_secs)),
            ),
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::Daily {
                start_time,
                stop_time,
                days_of_week,
                ..
            } => DailySchedule::from_packed(start_time, stop_time, days_of_week).map(|_| ()),
            Self::Interval { on_secs, off_secs, .. } => Pattern::from_secs(on_secs, off_secs).map(|_| ()),
        }
    }
}

impl SystemConfig {
    /// Check everything that would otherwise fail (or misbehave) at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.control_loop_interval_ms == 0 || self.control_loop_interval_ms > 60_000 {
            return Err(Error::Config("control loop interval must be 1..=60000 ms"));
        }
        if self.utc_offset_secs.abs() > MAX_UTC_OFFSET_SECS {
            return Err(Error::Config("utc offset beyond 14 hours"));
        }
        if let Some(shift) = &self.shift_register {
            shift.validate()?;
        }

        for (i, zone) in self.zones.iter().enumerate() {
            match (zone.channel, &self.shift_register) {
                (ChannelAddress::Direct(pin), Some(shift)) if shift.pins().contains(pin) => {
                    return Err(Error::Config("zone pin is a shift register line"));
                }
                (ChannelAddress::Direct(_), _) => {}
                (ChannelAddress::Shifted(_), None) => return Err(Error::ShiftRegisterNotConfigured),
                (ChannelAddress::Shifted(index), Some(shift)) if index >= shift.channels() => {
                    return Err(Error::ChannelOutOfRange(index));
                }
                (ChannelAddress::Shifted(_), Some(_)) => {}
            }
            if self.zones[..i].iter().any(|z| z.channel == zone.channel) {
                return Err(Error::Config("two zones share a channel"));
            }
            if let Some(schedule) = &zone.schedule {
                schedule.validate()?;
            }
        }
        Ok(())
    }

    pub fn control_loop_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.control_loop_interval_ms))
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut zones = Vec::new();
        let windows = [(1920, 1921), (1922, 1923), (1924, 1925)];
        for (i, (pin, (start, stop))) in pins::DEFAULT_ZONE_PINS.iter().zip(windows).enumerate() {
            let mut label = String::new();
            // "zone N" always fits.
            let _ = write!(label, "zone {}", i + 1);
            let _ = zones.push(ZoneConfig {
                label,
                channel: ChannelAddress::Direct(*pin),
                schedule: Some(ScheduleConfig::Daily {
                    start_time: start,
                    stop_time: stop,
                    days_of_week: 1_234_567,
                    enabled: true,
                }),
            });
        }

        Self {
            control_loop_interval_ms: 1000, // 1 Hz
            utc_offset_secs: 0,
            shift_register: None,
            zones,
        }
    }
}
