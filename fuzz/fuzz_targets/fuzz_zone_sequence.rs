//! Fuzz target: zone command / evaluate sequences
//!
//! Drives one shifted zone through an arbitrary stream of operations,
//! verifying:
//! - No panics for any schedule parameters or time steps
//! - The shift register bit always equals the zone's reported output
//! - At most one channel write happens per `evaluate`
//!
//! cargo fuzz run fuzz_zone_sequence

#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use pluo::app::ports::{ChannelAddress, ChannelPort, OutputSink};
use pluo::drivers::channel_bus::ChannelBus;
use pluo::drivers::shift_register::ShiftPins;
use pluo::time::Timestamp;
use pluo::zone::Zone;

const PINS: ShiftPins = ShiftPins {
    serial: 1,
    latch: 2,
    clock: 3,
};

#[derive(Default)]
struct CountingLines {
    latches: u64,
}

impl OutputSink for CountingLines {
    fn set_level(&mut self, line: u8, high: bool) {
        if line == PINS.latch && high {
            self.latches += 1;
        }
    }
}

fn u16_at(data: &[u8], i: usize) -> u16 {
    u16::from_le_bytes([data.get(i).copied().unwrap_or(0), data.get(i + 1).copied().unwrap_or(0)])
}

fn u32_at(data: &[u8], i: usize) -> u32 {
    u32::from(u16_at(data, i)) | (u32::from(u16_at(data, i + 2)) << 16)
}

fuzz_target!(|data: &[u8]| {
    let address = ChannelAddress::Shifted(3);
    let mut bus = ChannelBus::new(CountingLines::default());
    bus.configure_shift(PINS, 1).expect("valid bank");
    let mut zone = Zone::new(address);
    let mut now = Timestamp::from_secs(u64::from(u32_at(data, 0)));

    let mut i = 4;
    while i < data.len() {
        let op = data[i];
        i += 1;
        match op % 8 {
            0 => {
                let _ = zone.configure_daily(u16_at(data, i), u16_at(data, i + 2), u32_at(data, i + 4), op & 0x80 != 0);
                i += 8;
            }
            1 => {
                let _ = zone.configure_interval(
                    Timestamp::from_secs(u64::from(u32_at(data, i))),
                    Duration::from_secs(u64::from(u16_at(data, i + 4))),
                    Duration::from_secs(u64::from(u16_at(data, i + 6))),
                    Duration::ZERO,
                    Duration::ZERO,
                );
                i += 8;
            }
            2 => zone.manual_on(&mut bus),
            3 => {
                zone.manual_on_for(now, Duration::from_secs(u64::from(u16_at(data, i))), &mut bus);
                i += 2;
            }
            4 => zone.manual_off(&mut bus),
            5 => {
                if op & 0x80 != 0 {
                    zone.enable();
                } else {
                    zone.disable();
                }
            }
            _ => {
                now = now + Duration::from_secs(u64::from(u16_at(data, i)));
                i += 2;
                let before = bus.sink().latches;
                zone.evaluate(now, &mut bus);
                assert!(bus.sink().latches - before <= 1, "more than one write per evaluate");
            }
        }
        assert_eq!(bus.read(address), zone.is_running());
    }
});
