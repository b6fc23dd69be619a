//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                      |
//! |------------|--------------|----------------------------------|
//! | `gpio`     | OutputSink   | `embedded-hal` output pins       |
//! | `log_sink` | EventSink    | `log` facade                     |
//! |            | OutputSink   | in-memory levels (simulation)    |
//! | `time`     | ClockPort    | host wall clock / stepped clock  |

pub mod gpio;
pub mod log_sink;
pub mod time;
