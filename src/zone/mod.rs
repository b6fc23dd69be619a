//! Per-zone scheduling state machine.
//!
//! A [`Zone`] reconciles three control sources onto one output channel:
//!
//! ```text
//!   ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐
//!   │ Daily / Intv │  │ Manual on/off│  │ Timed manual on  │
//!   │  schedule    │  │  (operator)  │  │  (expires)       │
//!   └──────┬───────┘  └──────┬───────┘  └────────┬─────────┘
//!          │ auto_verified   │ OverrideState     │ timed_stop
//!          ▼                 ▼                   ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │                 Zone::evaluate(now)                 │
//!   └──────────────────────────┬──────────────────────────┘
//!                              ▼
//!                     ChannelPort::write
//! ```
//!
//! Priority within one `evaluate` call:
//!
//! 1. An expired timed override forces the zone off (`TimedOff`).
//! 2. Disabled zones stop here; manual calls still work.
//! 3. Under manual override the schedule keeps its `auto_verified` flag in
//!    step with what it *would* have done, without touching the output, so
//!    a released override never re-fires a boundary auto already claimed.
//! 4. Otherwise the schedule drives the output.
//!
//! At most one write is issued per call.

mod override_state;

use core::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

pub use override_state::OverrideState;

use crate::app::ports::{ChannelAddress, ChannelPort};
use crate::error::{Error, Result};
use crate::schedule::{DailySchedule, Intent, IntervalSchedule, Pattern, Schedule, ScheduleElement};
use crate::time::Timestamp;

/// Outcome of one [`Zone::evaluate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionEvent {
    None,
    AutoOn,
    AutoOff,
    TimedOff,
}

impl TransitionEvent {
    pub const fn is_transition(self) -> bool {
        !matches!(self, Self::None)
    }
}

#[derive(Debug, Clone)]
pub struct Zone {
    address: ChannelAddress,
    schedule: Option<Schedule>,
    enabled: bool,
    /// The schedule believes the zone is in its "on" phase.
    auto_verified: bool,
    override_state: OverrideState,
    /// Channel level read back after this zone's last write.
    level: bool,
}

impl Zone {
    /// A zone with no schedule.  Disabled until a schedule is configured.
    pub const fn new(address: ChannelAddress) -> Self {
        Self {
            address,
            schedule: None,
            enabled: false,
            auto_verified: false,
            override_state: OverrideState::new(),
            level: false,
        }
    }

    /// A zone with a daily schedule from packed values.  Invalid values
    /// leave the zone unscheduled and disabled.
    pub fn with_daily(address: ChannelAddress, start_time: u16, stop_time: u16, days_of_week: u32) -> Self {
        let mut zone = Self::new(address);
        let _ = zone.configure_daily(start_time, stop_time, days_of_week, true);
        zone
    }

    /// Configure the zone's channel and drive it low.
    pub fn begin(&mut self, bus: &mut impl ChannelPort) {
        bus.begin(self.address);
        self.level = bus.read(self.address);
    }

    // ── Configuration ─────────────────────────────────────────

    /// Replace the schedule with a daily one from packed `HHMM` times and a
    /// packed day list.
    ///
    /// On error the zone is left unscheduled and disabled.
    pub fn configure_daily(
        &mut self,
        start_time: u16,
        stop_time: u16,
        days_of_week: u32,
        enabled: bool,
    ) -> Result<()> {
        match DailySchedule::from_packed(start_time, stop_time, days_of_week) {
            Ok(daily) => {
                info!(
                    "{}: daily {}-{} on {}",
                    self.address,
                    daily.start(),
                    daily.stop(),
                    daily.days()
                );
                self.install(Schedule::Daily(daily), enabled);
                Ok(())
            }
            Err(e) => Err(self.reject(e)),
        }
    }

    /// Replace the schedule with an interval cycle starting at `epoch_start`.
    ///
    /// A zero secondary component drops the secondary pattern.  On error the
    /// zone is left unscheduled and disabled.
    pub fn configure_interval(
        &mut self,
        epoch_start: Timestamp,
        on: Duration,
        off: Duration,
        secondary_on: Duration,
        secondary_off: Duration,
    ) -> Result<()> {
        let primary = match Pattern::new(on, off) {
            Ok(p) => p,
            Err(e) => return Err(self.reject(e)),
        };
        let secondary = Pattern::new(secondary_on, secondary_off).ok();
        info!(
            "{}: interval from {} on={}s off={}s",
            self.address,
            epoch_start,
            primary.on_secs(),
            primary.off_secs()
        );
        self.install(
            Schedule::Interval(IntervalSchedule::new(epoch_start, primary, secondary)),
            true,
        );
        Ok(())
    }

    pub fn clear_schedule(&mut self) {
        self.schedule = None;
        self.enabled = false;
        self.auto_verified = false;
    }

    fn install(&mut self, schedule: Schedule, enabled: bool) {
        self.schedule = Some(schedule);
        self.enabled = enabled;
        self.auto_verified = false;
    }

    fn reject(&mut self, error: Error) -> Error {
        warn!("{}: schedule rejected ({}), zone disabled", self.address, error);
        self.clear_schedule();
        error
    }

    // ── Polling ───────────────────────────────────────────────

    /// Decide and apply this tick's transition.  Call at least once a minute
    /// (typically 1 Hz) with the same `now` for every zone.
    pub fn evaluate(&mut self, now: Timestamp, bus: &mut impl ChannelPort) -> TransitionEvent {
        if self.override_state.is_expired(now) {
            info!("{}: timed manual override expired at {}", self.address, now);
            self.manual_off(bus);
            return TransitionEvent::TimedOff;
        }
        if !self.enabled {
            return TransitionEvent::None;
        }
        let manual = self.override_state.is_active();

        let intent = match &mut self.schedule {
            None => return TransitionEvent::None,
            Some(Schedule::Daily(daily)) => daily_intent(daily, now, self.auto_verified),
            Some(Schedule::Interval(interval)) => interval.poll(now),
        };
        let Some(intent) = intent else {
            return TransitionEvent::None;
        };

        if manual {
            if self.auto_verified != intent.is_on() {
                debug!(
                    "{}: manual override holds output, auto now claims {:?}",
                    self.address, intent
                );
            }
            self.auto_verified = intent.is_on();
            return TransitionEvent::None;
        }

        match (intent, self.auto_verified) {
            (Intent::On, false) => {
                self.drive(true, bus);
                self.auto_verified = true;
                info!("{}: auto on at {}", self.address, now);
                TransitionEvent::AutoOn
            }
            (Intent::Off, true) => {
                self.drive(false, bus);
                self.auto_verified = false;
                info!("{}: auto off at {}", self.address, now);
                TransitionEvent::AutoOff
            }
            _ => TransitionEvent::None,
        }
    }

    // ── Manual control ────────────────────────────────────────

    /// Turn on until [`manual_off`](Self::manual_off).
    pub fn manual_on(&mut self, bus: &mut impl ChannelPort) {
        self.drive(true, bus);
        self.override_state.engage();
        info!("{}: manual on", self.address);
    }

    /// Turn on until `now + duration`.
    pub fn manual_on_for(&mut self, now: Timestamp, duration: Duration, bus: &mut impl ChannelPort) {
        let stop = now + duration;
        self.drive(true, bus);
        self.override_state.engage_until(stop);
        info!("{}: manual on until {}", self.address, stop);
    }

    /// Turn off and hand control back to the schedule.
    pub fn manual_off(&mut self, bus: &mut impl ChannelPort) {
        self.drive(false, bus);
        self.override_state.release();
        info!("{}: manual off", self.address);
    }

    /// Resume automatic evaluation.  Interval cycles re-anchor on the next
    /// poll instead of replaying edges missed while disabled.
    pub fn enable(&mut self) {
        if !self.enabled {
            if let Some(Schedule::Interval(interval)) = &mut self.schedule {
                interval.reset();
            }
        }
        self.enabled = true;
    }

    /// Stop automatic evaluation without touching the schedule or output.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Write `level` and cache what the channel actually holds afterwards;
    /// a dropped write leaves the previous level in place.
    fn drive(&mut self, level: bool, bus: &mut impl ChannelPort) {
        bus.write(self.address, level);
        self.level = bus.read(self.address);
    }

    // ── Queries ───────────────────────────────────────────────

    pub const fn is_running(&self) -> bool {
        self.level
    }

    pub const fn is_stopped(&self) -> bool {
        !self.level
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn is_disabled(&self) -> bool {
        !self.enabled
    }

    pub const fn is_manual(&self) -> bool {
        self.override_state.is_active()
    }

    pub const fn auto_verified(&self) -> bool {
        self.auto_verified
    }

    pub const fn address(&self) -> ChannelAddress {
        self.address
    }

    pub const fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub const fn override_state(&self) -> &OverrideState {
        &self.override_state
    }

    /// Read one schedule field; `None` when unscheduled or not applicable.
    pub fn read(&self, element: ScheduleElement) -> Option<u64> {
        self.schedule.as_ref().and_then(|s| s.read(element))
    }
}

/// What the daily schedule claims at `now`, if this minute is a boundary
/// it has not already acted on.
fn daily_intent(daily: &DailySchedule, now: Timestamp, auto_verified: bool) -> Option<Intent> {
    let clock = now.wall_clock();
    if !daily.is_scheduled_day(clock) {
        return None;
    }
    if !auto_verified && daily.is_start(clock) {
        Some(Intent::On)
    } else if auto_verified && daily.is_stop(clock) {
        Some(Intent::Off)
    } else {
        None
    }
}
