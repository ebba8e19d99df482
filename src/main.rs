//! Sensor node simulator.
//!
//! Runs the publish-decision core against a simulated board on an
//! accelerated clock and prints every report it would put on the radio.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  SimBoard            RadioFrameSink + LogPublishSink       │
//! │  (Sampling + LED)    (PublishSink fan-out)                 │
//! │  ManualClock         EventQueue                            │
//! │                                                            │
//! │  ───────────────── Port Trait Boundary ────────────────    │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │            NodeService (pure logic)                  │  │
//! │  │  PublishGate · Gestures · Orientation · ServiceMode  │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info};

use sensornode::adapters::sim::{SimBoard, SimProfile};
use sensornode::adapters::{LogPublishSink, ManualClock, RadioFrameSink, RadioTransport};
use sensornode::app::ports::TickClock;
use sensornode::error::PublishError;
use sensornode::events::EventQueue;
use sensornode::{NodeConfig, NodeService};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Profile {
    /// Thermometer + accelerometer, click-counted button
    PushButton,
    /// Thermometer only, press-counted button
    KitPushButton,
}

/// Simulate a battery sensor node and print what it publishes
#[derive(Parser, Debug)]
#[command(name = "sensornode")]
#[command(version)]
struct Args {
    /// Built-in deployment profile
    #[arg(short, long, value_enum, default_value_t = Profile::PushButton)]
    profile: Profile,

    /// JSON config file; overrides --profile
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Simulated run time
    #[arg(short, long, default_value_t = 30)]
    minutes: u64,

    /// Simulation step
    #[arg(long, default_value_t = 10)]
    step_ms: u64,

    /// RNG seed for the synthetic sensors
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Share of polls returning no data
    #[arg(long, default_value_t = 0.02)]
    fault_rate: f64,

    /// Print the effective config as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Radio stand-in that only tallies what would have been sent.
#[derive(Default)]
struct AirTally {
    frames: u32,
    bytes: usize,
}

impl RadioTransport for AirTally {
    fn send(&mut self, frame: &[u8]) -> Result<(), PublishError> {
        self.frames += 1;
        self.bytes += frame.len();
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(&args)?;
    if args.dump_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }
    anyhow::ensure!(args.step_ms > 0, "--step-ms must be > 0");

    info!(
        "Simulating '{}' for {} min in {} ms steps",
        config.pairing_name, args.minutes, args.step_ms
    );

    let clock = ManualClock::new(0);
    let queue = EventQueue::new();
    let mut board = SimBoard::new(SimProfile {
        seed: args.seed,
        fault_rate: args.fault_rate.clamp(0.0, 1.0),
        ..SimProfile::default()
    });
    let mut sink = (RadioFrameSink::new(AirTally::default()), LogPublishSink::new());
    let mut node = NodeService::with_dice(config, clock.now());

    node.start(clock.now(), &mut board, &mut sink);

    let end = args.minutes.saturating_mul(60_000);
    while clock.now() < end {
        let now = clock.advance(args.step_ms);
        board.step(now, &queue);
        queue.drain(|event| node.handle_event(event, now, &mut board, &mut sink));
        node.poll_timers(now, &mut board);
    }

    let stats = node.stats();
    let radio = &sink.0;
    info!(
        "Done: {} events, {} reports, {} skipped, {} sensor errors, {} queue drops",
        stats.events_handled,
        stats.reports_published,
        stats.samples_skipped,
        stats.sensor_errors,
        queue.dropped()
    );
    info!(
        "Radio: {} frames ({} bytes), {} failed; service mode {}",
        radio.transport().frames,
        radio.transport().bytes,
        radio.failed(),
        if node.in_service_mode() { "still active" } else { "ended" }
    );
    Ok(())
}

fn load_config(args: &Args) -> Result<NodeConfig> {
    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            NodeConfig::from_json(&json).with_context(|| format!("loading {}", path.display()))?
        }
        None => match args.profile {
            Profile::PushButton => NodeConfig::push_button(),
            Profile::KitPushButton => NodeConfig::kit_push_button(),
        },
    };
    config.validate()?;
    Ok(config)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}
