//! Repeating on/off cycle anchored to an epoch.
//!
//! ```text
//!  epoch_start
//!      │◀─ on ─▶│◀ off ▶│◀─ on ─▶│◀ off ▶│
//!      ┌────────┐       ┌────────┐       ┌───
//!  ────┘        └───────┘        └───────┘
//!      rise     fall    rise     fall    rise
//! ```
//!
//! Edges are rigidly aligned to `epoch_start`; each new `next_trigger` is
//! computed from the edge just passed, never from the caller's `now`, so
//! late ticks do not accumulate drift.  The first poll at or after the
//! epoch anchors the cycle arithmetically instead of replaying every edge.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use super::Intent;
use crate::error::{Error, Result};
use crate::time::Timestamp;

/// One on/off duration pair, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    on_secs: u32,
    off_secs: u32,
}

impl Pattern {
    pub fn new(on: Duration, off: Duration) -> Result<Self> {
        Self::from_secs(
            u32::try_from(on.as_secs()).unwrap_or(u32::MAX),
            u32::try_from(off.as_secs()).unwrap_or(u32::MAX),
        )
    }

    pub fn from_secs(on_secs: u32, off_secs: u32) -> Result<Self> {
        if on_secs == 0 || off_secs == 0 {
            return Err(Error::ZeroDuration);
        }
        Ok(Self { on_secs, off_secs })
    }

    pub const fn on_secs(self) -> u32 {
        self.on_secs
    }

    pub const fn off_secs(self) -> u32 {
        self.off_secs
    }

    pub const fn period_secs(self) -> u64 {
        self.on_secs as u64 + self.off_secs as u64
    }
}

/// Which edge the schedule is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Phase {
    AwaitingRise = 0,
    AwaitingFall = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalSchedule {
    epoch_start: Timestamp,
    primary: Pattern,
    /// Stored for forward compatibility; never consulted when polling.
    secondary: Option<Pattern>,
    phase: Phase,
    previous_trigger: Option<Timestamp>,
    next_trigger: Option<Timestamp>,
}

impl IntervalSchedule {
    pub fn new(epoch_start: Timestamp, primary: Pattern, secondary: Option<Pattern>) -> Self {
        Self {
            epoch_start,
            primary,
            secondary,
            phase: Phase::AwaitingRise,
            previous_trigger: None,
            next_trigger: None,
        }
    }

    /// Build from raw seconds.  The secondary pattern is kept only when
    /// both of its components are non-zero.
    pub fn from_secs(
        epoch_start: Timestamp,
        on_secs: u32,
        off_secs: u32,
        secondary_on_secs: u32,
        secondary_off_secs: u32,
    ) -> Result<Self> {
        let primary = Pattern::from_secs(on_secs, off_secs)?;
        let secondary = Pattern::from_secs(secondary_on_secs, secondary_off_secs).ok();
        Ok(Self::new(epoch_start, primary, secondary))
    }

    pub const fn epoch_start(&self) -> Timestamp {
        self.epoch_start
    }

    pub const fn primary(&self) -> Pattern {
        self.primary
    }

    pub const fn secondary(&self) -> Option<Pattern> {
        self.secondary
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn previous_trigger(&self) -> Option<Timestamp> {
        self.previous_trigger
    }

    pub const fn next_trigger(&self) -> Option<Timestamp> {
        self.next_trigger
    }

    /// Forget all trigger bookkeeping; the next poll re-anchors.
    pub fn reset(&mut self) {
        self.phase = Phase::AwaitingRise;
        self.previous_trigger = None;
        self.next_trigger = None;
    }

    /// Advance the cycle to `now`.
    ///
    /// Returns the intent that applies from now on whenever the bookkeeping
    /// moved (anchoring or an edge), `None` while between edges or before
    /// the epoch.  At most one edge is consumed per call.  Once `now` is past
    /// the edge after the pending one, the cycle re-anchors instead and the
    /// net intent is reported once.
    pub fn poll(&mut self, now: Timestamp) -> Option<Intent> {
        if now < self.epoch_start {
            return None;
        }
        let Some(next) = self.next_trigger else {
            return Some(self.anchor(now));
        };
        if now < next {
            return None;
        }
        let following = match self.phase {
            Phase::AwaitingRise => next.saturating_add_secs(u64::from(self.primary.on_secs)),
            Phase::AwaitingFall => next.saturating_add_secs(u64::from(self.primary.off_secs)),
        };
        if now > following {
            return Some(self.anchor(now));
        }

        self.previous_trigger = Some(next);
        match self.phase {
            Phase::AwaitingRise => {
                self.phase = Phase::AwaitingFall;
                self.next_trigger = Some(next.saturating_add_secs(u64::from(self.primary.on_secs)));
                Some(Intent::On)
            }
            Phase::AwaitingFall => {
                self.phase = Phase::AwaitingRise;
                self.next_trigger = Some(next.saturating_add_secs(u64::from(self.primary.off_secs)));
                Some(Intent::Off)
            }
        }
    }

    /// Place the cycle around `now` without replaying missed edges.
    fn anchor(&mut self, now: Timestamp) -> Intent {
        let period = self.primary.period_secs();
        let on = u64::from(self.primary.on_secs);
        let elapsed = now.saturating_since(self.epoch_start);
        let cycle_start = self.epoch_start.saturating_add_secs(elapsed / period * period);
        let fall = cycle_start.saturating_add_secs(on);

        if now < fall {
            self.phase = Phase::AwaitingFall;
            self.previous_trigger = Some(cycle_start);
            self.next_trigger = Some(fall);
            Intent::On
        } else {
            self.phase = Phase::AwaitingRise;
            self.previous_trigger = Some(fall);
            self.next_trigger = Some(cycle_start.saturating_add_secs(period));
            Intent::Off
        }
    }
}
