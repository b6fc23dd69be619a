//! Zone controller: the hexagonal core.
//!
//! [`ZoneController`] owns every [`Zone`] and drives them from one control
//! loop.  It exposes a hardware-agnostic API; all I/O flows through port
//! traits injected at call sites, so the whole controller is testable with
//! mock adapters.
//!
//! ```text
//!  ClockPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                │     ZoneController     │
//! ZoneCommand ──▶│  Zone · Zone · Zone …  │──▶ ChannelPort
//!                └────────────────────────┘
//! ```
//!
//! Every zone in one tick is evaluated against the same captured `now`.

use heapless::Vec;
use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::error::{Error, Result};
use crate::time::Timestamp;
use crate::zone::Zone;

use super::commands::ZoneCommand;
use super::events::{ZoneEvent, ZoneId};
use super::ports::{ChannelPort, ClockPort, EventSink};

/// Upper bound on zones per controller.
pub const MAX_ZONES: usize = 16;

// ───────────────────────────────────────────────────────────────
// ZoneController
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct ZoneController {
    zones: Vec<Zone, MAX_ZONES>,
    tick_count: u64,
    last_tick: Option<Timestamp>,
}

impl ZoneController {
    pub const fn new() -> Self {
        Self {
            zones: Vec::new(),
            tick_count: 0,
            last_tick: None,
        }
    }

    /// Build one zone per configured entry.  The configuration is validated
    /// first; nothing is built from an invalid one.
    pub fn from_config(config: &SystemConfig) -> Result<Self> {
        config.validate()?;
        let mut controller = Self::new();
        for zone_config in &config.zones {
            let mut zone = Zone::new(zone_config.channel);
            if let Some(schedule) = &zone_config.schedule {
                schedule.apply(&mut zone)?;
            }
            let id = controller.add_zone(zone)?;
            debug!("zone {} \"{}\" on {}", id, zone_config.label, zone_config.channel);
        }
        Ok(controller)
    }

    pub fn add_zone(&mut self, zone: Zone) -> Result<ZoneId> {
        self.zones.push(zone).map_err(|_| Error::TooManyZones)?;
        Ok(self.zones.len() - 1)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Initialise every zone's output (low).
    pub fn begin(&mut self, bus: &mut impl ChannelPort, sink: &mut impl EventSink) {
        for zone in self.zones.iter_mut() {
            zone.begin(bus);
        }
        sink.emit(&ZoneEvent::Started {
            zones: self.zones.len(),
        });
        info!("zone controller started with {} zones", self.zones.len());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Evaluate every zone at `now`.  Returns how many zones changed output.
    pub fn tick(&mut self, now: Timestamp, bus: &mut impl ChannelPort, sink: &mut impl EventSink) -> usize {
        if let Some(last) = self.last_tick {
            if now < last {
                warn!("clock went backwards: {} -> {}", last, now);
            }
        }
        self.last_tick = Some(now);
        self.tick_count += 1;

        let mut transitions = 0;
        for (id, zone) in self.zones.iter_mut().enumerate() {
            let event = zone.evaluate(now, bus);
            if event.is_transition() {
                transitions += 1;
                sink.emit(&ZoneEvent::Transition { zone: id, event, at: now });
            }
        }
        transitions
    }

    /// [`tick`](Self::tick) at the clock's current time.
    pub fn tick_with_clock(
        &mut self,
        clock: &impl ClockPort,
        bus: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) -> usize {
        self.tick(clock.now(), bus, sink)
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply an operator command to one zone.
    ///
    /// A rejected schedule still takes effect in the sense that the zone is
    /// left disabled; the error is both emitted and returned.
    pub fn handle_command(
        &mut self,
        id: ZoneId,
        cmd: ZoneCommand,
        now: Timestamp,
        bus: &mut impl ChannelPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let zone = self.zones.get_mut(id).ok_or(Error::UnknownZone(id))?;
        match cmd {
            ZoneCommand::ManualOn => {
                zone.manual_on(bus);
                sink.emit(&ZoneEvent::Manual {
                    zone: id,
                    on: true,
                    until: None,
                });
            }
            ZoneCommand::ManualOnFor { duration } => {
                zone.manual_on_for(now, duration, bus);
                sink.emit(&ZoneEvent::Manual {
                    zone: id,
                    on: true,
                    until: zone.override_state().timed_stop(),
                });
            }
            ZoneCommand::ManualOff => {
                zone.manual_off(bus);
                sink.emit(&ZoneEvent::Manual {
                    zone: id,
                    on: false,
                    until: None,
                });
            }
            ZoneCommand::Enable | ZoneCommand::Disable => {
                let enable = matches!(cmd, ZoneCommand::Enable);
                if zone.is_enabled() != enable {
                    if enable {
                        zone.enable();
                    } else {
                        zone.disable();
                    }
                    sink.emit(&ZoneEvent::EnabledChanged {
                        zone: id,
                        enabled: enable,
                    });
                }
            }
            ZoneCommand::ConfigureDaily {
                start_time,
                stop_time,
                days_of_week,
                enabled,
            } => {
                let result = zone.configure_daily(start_time, stop_time, days_of_week, enabled);
                Self::report_reconfigure(id, zone, result, sink)?;
            }
            ZoneCommand::ConfigureInterval {
                epoch_start,
                on,
                off,
                secondary_on,
                secondary_off,
            } => {
                let result = zone.configure_interval(epoch_start, on, off, secondary_on, secondary_off);
                Self::report_reconfigure(id, zone, result, sink)?;
            }
        }
        Ok(())
    }

    fn report_reconfigure(id: ZoneId, zone: &Zone, result: Result<()>, sink: &mut impl EventSink) -> Result<()> {
        match result {
            Ok(()) => {
                let kind = zone.schedule().map_or("none", |s| s.kind());
                sink.emit(&ZoneEvent::Reconfigured { zone: id, kind });
                Ok(())
            }
            Err(error) => {
                sink.emit(&ZoneEvent::ConfigRejected { zone: id, error });
                Err(error)
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zones whose output is currently on.
    pub fn running_count(&self) -> usize {
        self.zones.iter().filter(|z| z.is_running()).count()
    }

    /// Total ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_tick(&self) -> Option<Timestamp> {
        self.last_tick
    }
}
