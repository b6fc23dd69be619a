//! Output drivers: the shared shift register and channel routing.

pub mod channel_bus;
pub mod shift_register;
