//! Application core: zone orchestration, zero I/O.
//!
//! [`service::ZoneController`] owns the zones and applies commands.  All
//! interaction with hardware happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
