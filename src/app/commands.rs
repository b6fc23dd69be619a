//! Inbound commands to the zone controller.
//!
//! These represent actions requested by the outside world (a button, a
//! serial console, a remote API) that the
//! [`ZoneController`](super::service::ZoneController) applies to one zone.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneCommand {
    /// Run until told otherwise.
    ManualOn,

    /// Run for a fixed duration from the moment the command is handled.
    ManualOnFor { duration: Duration },

    /// Stop and return control to the schedule.
    ManualOff,

    Enable,
    Disable,

    /// Replace the schedule with a daily window (packed `HHMM` / day digits).
    ConfigureDaily {
        start_time: u16,
        stop_time: u16,
        days_of_week: u32,
        enabled: bool,
    },

    /// Replace the schedule with an interval cycle.
    ConfigureInterval {
        epoch_start: Timestamp,
        on: Duration,
        off: Duration,
        secondary_on: Duration,
        secondary_off: Duration,
    },
}
