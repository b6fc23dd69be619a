//! Integration tests for the config → ZoneController → channel pipeline.
//!
//! Runs whole simulated days against mock lines and checks both the
//! outputs and the event stream.

use std::time::Duration;

use pluo::Error;
use pluo::adapters::time::SimClock;
use pluo::app::commands::ZoneCommand;
use pluo::app::events::ZoneEvent;
use pluo::app::ports::{ChannelAddress, ClockPort};
use pluo::app::service::ZoneController;
use pluo::config::{ScheduleConfig, ShiftRegisterConfig, SystemConfig};
use pluo::drivers::channel_bus::{ChannelBus, SharedChannelBus};
use pluo::time::{SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE, Timestamp};
use pluo::zone::TransitionEvent;

use crate::mock_hw::{MockLines, RecordingSink};

/// 1970-01-05, a Monday.
const MONDAY: u64 = 4 * SECS_PER_DAY;

const GARDEN_JSON: &str = r#"{
    "control_loop_interval_ms": 1000,
    "shift_register": { "serial_pin": 2, "latch_pin": 3, "clock_pin": 4, "total_bytes": 2 },
    "zones": [
        { "label": "lawn", "channel": { "Direct": 13 },
          "schedule": { "Daily": { "start_time": 600, "stop_time": 630, "days_of_week": 246 } } },
        { "label": "beds", "channel": { "Shifted": 9 },
          "schedule": { "Daily": { "start_time": 615, "stop_time": 620, "days_of_week": 1234567 } } },
        { "label": "drip", "channel": { "Shifted": 0 },
          "schedule": { "Interval": { "epoch_start": 0, "on_secs": 3600, "off_secs": 10800 } } }
    ]
}"#;

fn garden() -> (SystemConfig, ZoneController, ChannelBus<MockLines>) {
    let config: SystemConfig = serde_json::from_str(GARDEN_JSON).unwrap();
    let shift = config.shift_register.unwrap();
    let mut bus = ChannelBus::new(MockLines::with_chain(shift.pins()));
    bus.configure_shift(shift.pins(), shift.total_bytes).unwrap();
    let controller = ZoneController::from_config(&config).unwrap();
    (config, controller, bus)
}

fn run_minutes(
    controller: &mut ZoneController,
    clock: &SimClock,
    minutes: u64,
    bus: &mut ChannelBus<MockLines>,
    sink: &mut RecordingSink,
) {
    for _ in 0..minutes {
        controller.tick_with_clock(clock, bus, sink);
        clock.advance(Duration::from_secs(SECS_PER_MINUTE));
    }
}

// ── Whole-day simulation ─────────────────────────────────────

#[test]
fn monday_morning_from_json_config() {
    let (_, mut controller, mut bus) = garden();
    let mut sink = RecordingSink::new();
    controller.begin(&mut bus, &mut sink);
    assert_eq!(sink.events[0], ZoneEvent::Started { zones: 3 });

    let clock = SimClock::new(Timestamp::from_secs(MONDAY + 5 * SECS_PER_HOUR + 50 * SECS_PER_MINUTE));
    run_minutes(&mut controller, &clock, 45, &mut bus, &mut sink);

    let fired: Vec<(usize, TransitionEvent, u64)> = sink
        .transitions()
        .filter_map(|e| match *e {
            ZoneEvent::Transition { zone, event, at } => Some((zone, event, (at.as_secs() - MONDAY) / 60)),
            _ => None,
        })
        .collect();
    assert_eq!(
        fired,
        vec![
            // drip: first tick anchors at 05:50, inside the off phase of its
            // 00:00/04:00/08:00 cycle, so nothing until 08:00.
            (0, TransitionEvent::AutoOn, 6 * 60),
            (1, TransitionEvent::AutoOn, 6 * 60 + 15),
            (1, TransitionEvent::AutoOff, 6 * 60 + 20),
            (0, TransitionEvent::AutoOff, 6 * 60 + 30),
        ]
    );
    assert_eq!(controller.tick_count(), 45);
    assert_eq!(controller.running_count(), 0);
}

#[test]
fn interval_zone_follows_its_cycle_across_a_day() {
    let (_, mut controller, mut bus) = garden();
    let mut sink = RecordingSink::new();
    let clock = SimClock::new(Timestamp::from_secs(MONDAY));
    run_minutes(&mut controller, &clock, 24 * 60, &mut bus, &mut sink);

    let drip: Vec<(TransitionEvent, u64)> = sink
        .transitions()
        .filter_map(|e| match *e {
            ZoneEvent::Transition { zone: 2, event, at } => Some((event, (at.as_secs() - MONDAY) / 3600)),
            _ => None,
        })
        .collect();
    let expected: Vec<(TransitionEvent, u64)> = (0..6)
        .flat_map(|k| [(TransitionEvent::AutoOn, 4 * k), (TransitionEvent::AutoOff, 4 * k + 1)])
        .collect();
    assert_eq!(drip, expected);
}

#[test]
fn tick_uses_one_timestamp_for_all_zones() {
    let mut config = SystemConfig::default();
    // Three zones, all at 19:20 so they fire in the same tick.
    for zone in config.zones.iter_mut() {
        zone.schedule = Some(ScheduleConfig::Daily {
            start_time: 1920,
            stop_time: 1930,
            days_of_week: 1_234_567,
            enabled: true,
        });
    }
    let mut controller = ZoneController::from_config(&config).unwrap();
    let mut bus = ChannelBus::new(MockLines::new());
    let mut sink = RecordingSink::new();

    let now = Timestamp::from_secs(MONDAY + 19 * SECS_PER_HOUR + 20 * SECS_PER_MINUTE);
    assert_eq!(controller.tick(now, &mut bus, &mut sink), 3);
    assert!(
        sink.transitions()
            .all(|e| matches!(e, ZoneEvent::Transition { at, .. } if *at == now))
    );
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn command_flow_on_shared_bus() {
    let (_, mut controller, bus) = garden();
    let shared = SharedChannelBus::new(bus);
    let mut port = &shared;
    let mut sink = RecordingSink::new();
    // 02:00 is inside drip's off phase, so only the override shows up.
    let now = Timestamp::from_secs(MONDAY + 2 * SECS_PER_HOUR);

    controller
        .handle_command(
            1,
            ZoneCommand::ManualOnFor {
                duration: Duration::from_secs(10 * 60),
            },
            now,
            &mut port,
            &mut sink,
        )
        .unwrap();
    assert!(shared.with(|b| b.bank().read_bit(9)));

    controller.tick(now + Duration::from_secs(9 * 60), &mut port, &mut sink);
    assert!(controller.zone(1).unwrap().is_running());
    assert_eq!(controller.tick(now + Duration::from_secs(10 * 60), &mut port, &mut sink), 1);
    assert!(!shared.with(|b| b.bank().read_bit(9)));

    assert_eq!(
        sink.events,
        vec![
            ZoneEvent::Manual {
                zone: 1,
                on: true,
                until: Some(now + Duration::from_secs(600))
            },
            ZoneEvent::Transition {
                zone: 1,
                event: TransitionEvent::TimedOff,
                at: now + Duration::from_secs(600)
            },
        ]
    );
}

#[test]
fn disabled_zone_skips_schedule_until_reenabled() {
    let (_, mut controller, mut bus) = garden();
    let mut sink = RecordingSink::new();
    let six = Timestamp::from_secs(MONDAY + 6 * SECS_PER_HOUR);

    controller
        .handle_command(0, ZoneCommand::Disable, six, &mut bus, &mut sink)
        .unwrap();
    assert_eq!(controller.tick(six, &mut bus, &mut sink), 0);

    controller
        .handle_command(0, ZoneCommand::Enable, six, &mut bus, &mut sink)
        .unwrap();
    assert_eq!(controller.tick(six, &mut bus, &mut sink), 1);
    assert!(bus.sink().level(13));
}

#[test]
fn reconfigure_rejects_and_reports() {
    let (_, mut controller, mut bus) = garden();
    let mut sink = RecordingSink::new();
    let err = controller.handle_command(
        0,
        ZoneCommand::ConfigureDaily {
            start_time: 700,
            stop_time: 730,
            days_of_week: 0,
            enabled: true,
        },
        Timestamp::ZERO,
        &mut bus,
        &mut sink,
    );
    assert_eq!(err, Err(Error::EmptyDaySet));
    assert!(controller.zone(0).unwrap().is_disabled());
    assert!(controller.zone(0).unwrap().schedule().is_none());
}

#[test]
fn clock_port_drives_tick() {
    let (_, mut controller, mut bus) = garden();
    let mut sink = RecordingSink::new();
    let clock = SimClock::new(Timestamp::from_secs(MONDAY + 6 * SECS_PER_HOUR));
    controller.tick_with_clock(&clock, &mut bus, &mut sink);
    assert_eq!(controller.last_tick(), Some(clock.now()));
}

// ── Config rejection ─────────────────────────────────────────

#[test]
fn invalid_config_builds_nothing() {
    let mut config: SystemConfig = serde_json::from_str(GARDEN_JSON).unwrap();
    config.shift_register = Some(ShiftRegisterConfig {
        total_bytes: 1,
        ..config.shift_register.unwrap()
    });
    assert_eq!(
        ZoneController::from_config(&config).err(),
        Some(Error::ChannelOutOfRange(9))
    );

    config.zones[0].channel = ChannelAddress::Direct(3);
    config.shift_register = None;
    assert_eq!(
        ZoneController::from_config(&config).err(),
        Some(Error::ShiftRegisterNotConfigured)
    );
}
