//! Zones driving real channel routing: direct lines and shared shift
//! register bits, through the same `ChannelBus` the firmware uses.

use std::time::Duration;

use pluo::app::ports::{ChannelAddress, ChannelPort};
use pluo::drivers::channel_bus::ChannelBus;
use pluo::drivers::shift_register::ShiftPins;
use pluo::schedule::ScheduleElement;
use pluo::time::{SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE, Timestamp};
use pluo::zone::{TransitionEvent, Zone};

use crate::mock_hw::MockLines;

const PINS: ShiftPins = ShiftPins {
    serial: 11,
    latch: 8,
    clock: 12,
};

/// 1970-01-05, a Monday.
const MONDAY: u64 = 4 * SECS_PER_DAY;

fn at(day: u64, hour: u64, minute: u64) -> Timestamp {
    Timestamp::from_secs(day + hour * SECS_PER_HOUR + minute * SECS_PER_MINUTE)
}

fn shifted_bus(bytes: u8) -> ChannelBus<MockLines> {
    let mut bus = ChannelBus::new(MockLines::with_chain(PINS));
    assert!(bus.configure_shift(PINS, bytes).unwrap());
    bus
}

// ── Daily window on a direct pin ──────────────────────────────

#[test]
fn monday_window_on_direct_pin() {
    let mut bus = ChannelBus::new(MockLines::new());
    let mut zone = Zone::with_daily(ChannelAddress::Direct(13), 600, 605, 2);
    zone.begin(&mut bus);

    assert_eq!(zone.evaluate(at(MONDAY, 6, 0), &mut bus), TransitionEvent::AutoOn);
    assert!(bus.sink().level(13));
    assert_eq!(zone.evaluate(at(MONDAY, 6, 5), &mut bus), TransitionEvent::AutoOff);
    assert!(!bus.sink().level(13));
    assert_eq!(
        zone.evaluate(at(MONDAY + SECS_PER_DAY, 6, 0), &mut bus),
        TransitionEvent::None
    );

    assert_eq!(bus.sink().configured, vec![13]);
    assert_eq!(bus.sink().writes, vec![(13, false), (13, true), (13, false)]);
}

#[test]
fn one_hz_polling_through_window_fires_once_each_way() {
    let mut bus = ChannelBus::new(MockLines::new());
    let mut zone = Zone::with_daily(ChannelAddress::Direct(4), 600, 602, 2);

    let mut events = Vec::new();
    let start = at(MONDAY, 5, 59).as_secs();
    for t in start..start + 5 * 60 {
        let e = zone.evaluate(Timestamp::from_secs(t), &mut bus);
        if e.is_transition() {
            events.push((t - start, e));
        }
    }
    assert_eq!(
        events,
        vec![(60, TransitionEvent::AutoOn), (180, TransitionEvent::AutoOff)]
    );
}

// ── Shared shift register ─────────────────────────────────────

#[test]
fn shifted_zones_share_one_image() {
    let mut bus = shifted_bus(2);
    let mut a = Zone::with_daily(ChannelAddress::Shifted(2), 600, 610, 2);
    let mut b = Zone::with_daily(ChannelAddress::Shifted(10), 600, 605, 2);
    a.begin(&mut bus);
    b.begin(&mut bus);

    let now = at(MONDAY, 6, 0);
    assert_eq!(a.evaluate(now, &mut bus), TransitionEvent::AutoOn);
    assert_eq!(b.evaluate(now, &mut bus), TransitionEvent::AutoOn);
    assert_eq!(bus.sink().last_image(), Some(vec![0b0000_0100, 0b0000_0100]));

    // Turning b off leaves a's bit untouched.
    assert_eq!(b.evaluate(at(MONDAY, 6, 5), &mut bus), TransitionEvent::AutoOff);
    assert_eq!(bus.sink().last_image(), Some(vec![0b0000_0100, 0]));
    assert!(bus.read(ChannelAddress::Shifted(2)));
    assert!(!bus.read(ChannelAddress::Shifted(10)));

    // No direct lines were touched.
    assert!(bus.sink().direct_writes().is_empty());
}

#[test]
fn shifted_zone_without_bank_never_drives_lines() {
    let mut bus = ChannelBus::new(MockLines::new());
    let mut zone = Zone::new(ChannelAddress::Shifted(3));
    zone.manual_on(&mut bus);
    assert!(zone.is_manual());
    assert!(!zone.is_running(), "dropped write is not reported as running");
    assert!(bus.sink().writes.is_empty());
}

// ── Overrides ─────────────────────────────────────────────────

#[test]
fn timed_override_on_shifted_channel() {
    let mut bus = shifted_bus(1);
    let mut zone = Zone::new(ChannelAddress::Shifted(7));
    let t = at(MONDAY, 12, 0);

    zone.manual_on_for(t, Duration::from_secs(30 * 60), &mut bus);
    assert_eq!(bus.sink().last_image(), Some(vec![0b1000_0000]));
    assert_eq!(
        zone.evaluate(t + Duration::from_secs(29 * 60), &mut bus),
        TransitionEvent::None
    );
    assert!(zone.is_running());
    assert_eq!(
        zone.evaluate(t + Duration::from_secs(30 * 60), &mut bus),
        TransitionEvent::TimedOff
    );
    assert!(!zone.is_running());
    assert_eq!(bus.sink().last_image(), Some(vec![0]));
}

#[test]
fn manual_off_at_start_minute_does_not_reopen_valve() {
    let mut bus = ChannelBus::new(MockLines::new());
    let mut zone = Zone::with_daily(ChannelAddress::Direct(5), 600, 605, 2);

    assert_eq!(zone.evaluate(at(MONDAY, 6, 0), &mut bus), TransitionEvent::AutoOn);
    zone.manual_off(&mut bus);
    assert!(zone.auto_verified());
    for secs in [1, 15, 59] {
        assert_eq!(
            zone.evaluate(at(MONDAY, 6, 0) + Duration::from_secs(secs), &mut bus),
            TransitionEvent::None
        );
    }
    assert!(!bus.sink().level(5));
}

#[test]
fn manual_through_window_then_release() {
    let mut bus = ChannelBus::new(MockLines::new());
    let mut zone = Zone::with_daily(ChannelAddress::Direct(5), 600, 605, 2);

    zone.manual_on(&mut bus);
    zone.evaluate(at(MONDAY, 6, 0), &mut bus);
    zone.evaluate(at(MONDAY, 6, 5), &mut bus);
    assert!(zone.is_running(), "override holds through the window");
    assert!(!zone.auto_verified());

    zone.manual_off(&mut bus);
    assert_eq!(
        zone.evaluate(at(MONDAY, 6, 6), &mut bus),
        TransitionEvent::None
    );
    assert_eq!(bus.sink().writes, vec![(5, true), (5, false)]);
}

// ── Interval ──────────────────────────────────────────────────

#[test]
fn interval_drives_channel() {
    let mut bus = ChannelBus::new(MockLines::new());
    let mut zone = Zone::new(ChannelAddress::Direct(9));
    zone.configure_interval(
        Timestamp::from_secs(1000),
        Duration::from_secs(100),
        Duration::from_secs(50),
        Duration::from_secs(30),
        Duration::from_secs(30),
    )
    .unwrap();
    assert_eq!(zone.read(ScheduleElement::OnDuration), Some(100));

    assert_eq!(zone.evaluate(Timestamp::from_secs(1050), &mut bus), TransitionEvent::AutoOn);
    assert_eq!(zone.evaluate(Timestamp::from_secs(1150), &mut bus), TransitionEvent::AutoOff);
    assert_eq!(zone.evaluate(Timestamp::from_secs(1200), &mut bus), TransitionEvent::AutoOn);
    assert_eq!(bus.sink().writes, vec![(9, true), (9, false), (9, true)]);
}

#[test]
fn interval_first_call_long_after_epoch_anchors() {
    let mut bus = ChannelBus::new(MockLines::new());
    let mut zone = Zone::new(ChannelAddress::Direct(9));
    zone.configure_interval(
        Timestamp::from_secs(1000),
        Duration::from_secs(100),
        Duration::from_secs(50),
        Duration::ZERO,
        Duration::ZERO,
    )
    .unwrap();

    // 4005 is 20 whole cycles (3000 s) plus 5 s: inside an on phase.
    assert_eq!(zone.evaluate(Timestamp::from_secs(4005), &mut bus), TransitionEvent::AutoOn);
    assert_eq!(zone.evaluate(Timestamp::from_secs(4100), &mut bus), TransitionEvent::AutoOff);
    assert_eq!(zone.evaluate(Timestamp::from_secs(4150), &mut bus), TransitionEvent::AutoOn);
}
