//! Outbound controller events.
//!
//! The [`ZoneController`](super::service::ZoneController) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, record in a test, or
//! publish to whatever telemetry the enclosing firmware has.

use crate::error::Error;
use crate::time::Timestamp;
use crate::zone::TransitionEvent;

/// Index of a zone inside its controller.
pub type ZoneId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneEvent {
    /// The controller initialised every zone's output.
    Started { zones: usize },

    /// A zone changed its output on its own (schedule or timed expiry).
    Transition {
        zone: ZoneId,
        event: TransitionEvent,
        at: Timestamp,
    },

    /// An operator drove a zone; `until` is set for timed overrides.
    Manual {
        zone: ZoneId,
        on: bool,
        until: Option<Timestamp>,
    },

    EnabledChanged { zone: ZoneId, enabled: bool },

    /// A new schedule was installed.
    Reconfigured { zone: ZoneId, kind: &'static str },

    /// A schedule was rejected; the zone is now disabled.
    ConfigRejected { zone: ZoneId, error: Error },
}
