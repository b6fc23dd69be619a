//! Mock hardware for integration tests.
//!
//! [`MockLines`] records every line write and, when given the shift pins,
//! emulates a 74HC595 chain so tests can assert on what the registers
//! actually latched.  [`RecordingSink`] keeps every controller event.

use pluo::app::events::ZoneEvent;
use pluo::app::ports::{EventSink, OutputSink};
use pluo::drivers::shift_register::ShiftPins;

// ── Line recorder ─────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MockLines {
    pub writes: Vec<(u8, bool)>,
    pub configured: Vec<u8>,
    chain: Option<ChainState>,
}

#[derive(Debug)]
struct ChainState {
    pins: ShiftPins,
    serial: bool,
    clock: bool,
    shifted: Vec<bool>,
    latched: Vec<Vec<u8>>,
}

#[allow(dead_code)]
impl MockLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(pins: ShiftPins) -> Self {
        Self {
            chain: Some(ChainState {
                pins,
                serial: false,
                clock: false,
                shifted: Vec::new(),
                latched: Vec::new(),
            }),
            ..Self::default()
        }
    }

    /// Last level written to `line`.
    pub fn level(&self, line: u8) -> bool {
        self.writes
            .iter()
            .rev()
            .find(|(l, _)| *l == line)
            .is_some_and(|(_, high)| *high)
    }

    /// Writes to lines other than the shift register's.
    pub fn direct_writes(&self) -> Vec<(u8, bool)> {
        self.writes
            .iter()
            .copied()
            .filter(|(l, _)| self.chain.as_ref().is_none_or(|c| !c.pins.contains(*l)))
            .collect()
    }

    /// Every frame latched by the emulated chain, in shift order (the byte
    /// shifted first is the one furthest down the chain).
    pub fn latched(&self) -> &[Vec<u8>] {
        self.chain.as_ref().map_or(&[], |c| c.latched.as_slice())
    }

    /// Latched frame reordered to image order (byte 0 first).
    pub fn last_image(&self) -> Option<Vec<u8>> {
        self.latched().last().map(|frame| frame.iter().rev().copied().collect())
    }
}

impl OutputSink for MockLines {
    fn set_level(&mut self, line: u8, high: bool) {
        self.writes.push((line, high));
        let Some(chain) = self.chain.as_mut() else {
            return;
        };
        if line == chain.pins.serial {
            chain.serial = high;
        } else if line == chain.pins.clock {
            if high && !chain.clock {
                chain.shifted.push(chain.serial);
            }
            chain.clock = high;
        } else if line == chain.pins.latch {
            if high {
                let frame = chain
                    .shifted
                    .chunks(8)
                    .map(|bits| bits.iter().fold(0u8, |acc, &b| (acc << 1) | u8::from(b)))
                    .collect();
                chain.latched.push(frame);
            }
            chain.shifted.clear();
        }
    }

    fn configure_output(&mut self, line: u8) {
        self.configured.push(line);
    }
}

// ── Event recorder ────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ZoneEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transitions(&self) -> impl Iterator<Item = &ZoneEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, ZoneEvent::Transition { .. }))
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ZoneEvent) {
        self.events.push(*event);
    }
}
