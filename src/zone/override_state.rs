//! Manual override bookkeeping.
//!
//! Tracks whether an operator currently owns the zone, and if that
//! ownership expires at a fixed timestamp.  A timed stop only ever exists
//! alongside an active override; releasing clears both.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideState {
    manual_active: bool,
    timed_stop: Option<Timestamp>,
}

impl OverrideState {
    pub const fn new() -> Self {
        Self {
            manual_active: false,
            timed_stop: None,
        }
    }

    /// Indefinite manual control.  Drops any pending timed stop.
    pub fn engage(&mut self) {
        self.manual_active = true;
        self.timed_stop = None;
    }

    /// Manual control that expires at `stop`.
    pub fn engage_until(&mut self, stop: Timestamp) {
        self.manual_active = true;
        self.timed_stop = Some(stop);
    }

    pub fn release(&mut self) {
        self.manual_active = false;
        self.timed_stop = None;
    }

    pub const fn is_active(&self) -> bool {
        self.manual_active
    }

    pub const fn timed_stop(&self) -> Option<Timestamp> {
        self.timed_stop
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.timed_stop.is_some_and(|stop| now >= stop)
    }
}
