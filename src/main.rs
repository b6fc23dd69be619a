//! pluo-sim: host simulator for the zone controller.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Adapters (outer ring)                    │
//! │                                                          │
//! │  SimClock / SystemClock   LogEventSink   LogOutputSink   │
//! │  (ClockPort)              (EventSink)    (OutputSink)    │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ───────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │   ZoneController (pure logic)                  │      │
//! │  │   Zone · Zone · Zone  ──▶ SharedChannelBus     │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Runs either a stepped simulation (default: one day at one-minute steps)
//! or a realtime loop against the host clock.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use tracing_subscriber::EnvFilter;

use pluo::adapters::log_sink::{LogEventSink, LogOutputSink};
use pluo::adapters::time::{SimClock, SystemClock};
use pluo::app::ports::ClockPort;
use pluo::app::service::ZoneController;
use pluo::config::SystemConfig;
use pluo::drivers::channel_bus::{ChannelBus, SharedChannelBus};
use pluo::time::Timestamp;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON system configuration; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulation start, local epoch seconds; defaults to the host clock.
    #[arg(short, long)]
    start: Option<u64>,

    /// Number of control ticks to run.
    #[arg(short, long, default_value_t = 1440)]
    ticks: u64,

    /// Simulated seconds per tick.
    #[arg(long, default_value_t = 60)]
    step_secs: u64,

    /// Follow the host clock, sleeping one control interval per tick.
    #[arg(long)]
    realtime: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<SystemConfig> {
    let Some(path) = path else {
        return Ok(SystemConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pluo=info,pluo_sim=info")))
        .compact()
        .init();

    let cli = Cli::parse();
    info!("pluo-sim v{}", env!("CARGO_PKG_VERSION"));

    // ── 1. Configuration ──────────────────────────────────────
    let config = load_config(cli.config.as_ref())?;
    config.validate().context("invalid configuration")?;
    let system_clock = SystemClock::new(config.utc_offset_secs)?;

    // ── 2. Output bus ─────────────────────────────────────────
    let mut bus = ChannelBus::new(LogOutputSink::new());
    if let Some(shift) = &config.shift_register {
        bus.configure_shift(shift.pins(), shift.total_bytes)?;
    }
    let shared = SharedChannelBus::new(bus);
    let mut port = &shared;

    // ── 3. Controller ─────────────────────────────────────────
    let mut controller = ZoneController::from_config(&config)?;
    let mut events = LogEventSink::new();
    controller.begin(&mut port, &mut events);

    // ── 4. Control loop ───────────────────────────────────────
    let mut transitions = 0;
    if cli.realtime {
        info!("realtime loop every {} ms", config.control_loop_interval_ms);
        for _ in 0..cli.ticks {
            transitions += controller.tick_with_clock(&system_clock, &mut port, &mut events);
            std::thread::sleep(config.control_loop_interval());
        }
    } else {
        let start = cli
            .start
            .map_or_else(|| system_clock.now(), Timestamp::from_secs);
        let clock = SimClock::new(start);
        let step = Duration::from_secs(cli.step_secs);
        info!("simulating {} ticks of {}s from {}", cli.ticks, cli.step_secs, start);
        for _ in 0..cli.ticks {
            transitions += controller.tick_with_clock(&clock, &mut port, &mut events);
            clock.advance(step);
        }
    }

    // ── 5. Summary ────────────────────────────────────────────
    let bus = shared.into_inner();
    info!(
        "done: ticks={} transitions={} events={} running={} line_writes={}",
        controller.tick_count(),
        transitions,
        events.emitted(),
        controller.running_count(),
        bus.sink().writes()
    );
    Ok(())
}
