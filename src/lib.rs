//! Pluo irrigation zone controller library.
//!
//! Zones switch valves on daily windows or repeating intervals, accept
//! manual and timed overrides, and drive either a dedicated GPIO line or one
//! bit of a shared shift-register chain.  Everything hardware-specific sits
//! behind the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod pins;
pub mod schedule;
pub mod time;
pub mod zone;

mod error;

pub use error::{Error, Result};
