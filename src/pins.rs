//! GPIO pin assignments for the reference valve board.
//!
//! Single source of truth for the defaults; deployments override them via
//! [`SystemConfig`](crate::config::SystemConfig).

// ---------------------------------------------------------------------------
// Shift register chain (74HC595)
// ---------------------------------------------------------------------------

/// Serial data in (DS).
pub const SHIFT_SERIAL_GPIO: u8 = 11;
/// Storage register clock (ST_CP).  Outputs update on the rising edge.
pub const SHIFT_LATCH_GPIO: u8 = 8;
/// Shift register clock (SH_CP).
pub const SHIFT_CLOCK_GPIO: u8 = 12;

// ---------------------------------------------------------------------------
// Directly driven valves
// ---------------------------------------------------------------------------

/// Valve relays on boards without a shift register.
pub const DEFAULT_ZONE_PINS: [u8; 3] = [11, 12, 13];
