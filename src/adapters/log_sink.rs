//! Log-based adapters.
//!
//! [`LogEventSink`] writes controller events to the logger (serial console
//! in production, `tracing-subscriber` in the simulator).  [`LogOutputSink`]
//! stands in for GPIO when no hardware is attached.

use log::{debug, info, trace, warn};

use crate::app::events::ZoneEvent;
use crate::app::ports::{EventSink, OutputSink};

/// Adapter that logs every [`ZoneEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u64,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ZoneEvent) {
        self.emitted += 1;
        match event {
            ZoneEvent::Started { zones } => {
                info!("START | zones={}", zones);
            }
            ZoneEvent::Transition { zone, event, at } => {
                info!("AUTO  | zone={} {:?} at {}", zone, event, at);
            }
            ZoneEvent::Manual { zone, on, until } => match until {
                Some(stop) => info!("MANUAL| zone={} on until {}", zone, stop),
                None => info!("MANUAL| zone={} {}", zone, if *on { "on" } else { "off" }),
            },
            ZoneEvent::EnabledChanged { zone, enabled } => {
                info!(
                    "STATE | zone={} {}",
                    zone,
                    if *enabled { "enabled" } else { "disabled" }
                );
            }
            ZoneEvent::Reconfigured { zone, kind } => {
                info!("CONFIG| zone={} schedule={}", zone, kind);
            }
            ZoneEvent::ConfigRejected { zone, error } => {
                warn!("CONFIG| zone={} rejected: {}", zone, error);
            }
        }
    }
}

/// Line driver that only records and logs levels.
#[derive(Debug, Default)]
pub struct LogOutputSink {
    levels: [u8; 32],
    writes: u64,
}

impl LogOutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, line: u8) -> bool {
        self.levels[usize::from(line / 8)] & (1 << (line % 8)) != 0
    }

    /// Total `set_level` calls, including repeats.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl OutputSink for LogOutputSink {
    fn set_level(&mut self, line: u8, high: bool) {
        self.writes += 1;
        if self.level(line) != high {
            trace!("line {} -> {}", line, if high { "high" } else { "low" });
        }
        let mask = 1 << (line % 8);
        let byte = &mut self.levels[usize::from(line / 8)];
        if high {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    fn configure_output(&mut self, line: u8) {
        debug!("line {} configured as output", line);
    }
}
