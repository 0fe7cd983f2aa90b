//! DirectInput command-line entry point.
//!
//! Loads the config file, starts the failsafe watchdog, and runs one input
//! command against the native `SendInput` backend.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML file or defaults
//!  └─ init_failsafe()          -- background hold-to-abort watchdog
//!  └─ spawn ctrl_c listener    -- clears the `running` flag
//!  └─ spawn_blocking(run)      -- input commands sleep between events
//!       ├─ circle   -> InputSimulator::move_mouse_to (until Ctrl-C)
//!       ├─ press    -> InputSimulator::key_press
//!       ├─ hotkey   -> InputSimulator::hotkey
//!       ├─ write    -> InputSimulator::write
//!       ├─ detect   -> KeyDetector::detect
//!       └─ position -> InputSimulator::mouse_position / display_size
//! ```
//!
//! Input commands block on `std::thread::sleep` between events, so they run
//! on Tokio's blocking pool rather than on the async worker threads.

use std::f64::consts::TAU;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use directinput::application::detect_keys::KeyDetector;
use directinput::application::simulate_input::{InputSimulator, PressOptions};
use directinput::infrastructure::default_failsafe::{init_failsafe, stop_failsafe};
use directinput::infrastructure::input_simulation::NativeInputSimulator;
use directinput::infrastructure::key_state::NativeKeyState;
use directinput::infrastructure::storage::config::{
    load_config, load_config_from, AppConfig, ConfigError,
};
use directinput_core::geometry::Point;

/// Points per revolution of the `circle` command.
const CIRCLE_STEPS: u32 = 36;

/// Shortest time spent on one segment of the circle.
const MIN_SEGMENT: Duration = Duration::from_millis(20);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Scan-code keyboard and mouse simulation.
///
/// Hold Esc for five seconds at any time to abort (see `[failsafe]` in the
/// config file).
#[derive(Debug, Parser)]
#[command(name = "directinput", version)]
struct Cli {
    /// Path to the config file (defaults to the platform config directory).
    #[arg(long, env = "DIRECTINPUT_CONFIG")]
    config: Option<PathBuf>,

    /// Do not start the failsafe watchdog.
    #[arg(long)]
    no_failsafe: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
enum Command {
    /// Move the cursor in a circle around the screen centre until Ctrl-C.
    Circle {
        /// Circle radius in pixels.
        #[arg(long, default_value_t = 200)]
        radius: u32,
        /// Seconds per revolution.
        #[arg(long, default_value_t = 2.0)]
        period: f64,
    },
    /// Press and release keys.
    Press {
        #[arg(required = true)]
        keys: Vec<String>,
        #[arg(long, default_value_t = 1)]
        presses: u32,
        /// Seconds to wait after each press.
        #[arg(long, default_value_t = 0.0)]
        interval: f64,
        /// Press all keys together instead of one after another.
        #[arg(long)]
        simultaneously: bool,
    },
    /// Press a key combination, e.g. `hotkey ctrl shift esc`.
    Hotkey {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Type text.
    Write {
        text: String,
        /// Seconds to wait after each character.
        #[arg(long, default_value_t = 0.0)]
        interval: f64,
    },
    /// Report whether every given key or mouse button is held right now.
    Detect {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print the cursor position and the primary display size.
    Position,
}

impl Default for Command {
    fn default() -> Self {
        Command::Circle {
            radius: 200,
            period: 2.0,
        }
    }
}

fn seconds(value: f64, flag: &str) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| format!("invalid --{flag}: {value}"))
}

fn read_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    let result = match path {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    match result {
        Err(ConfigError::NoPlatformConfigDir) => Ok(AppConfig::default()),
        other => other.context("failed to load configuration"),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run(
    command: Command,
    simulator: &InputSimulator,
    detector: &KeyDetector,
    running: &AtomicBool,
) -> anyhow::Result<()> {
    match command {
        Command::Circle { radius, period } => {
            circle(simulator, radius, seconds(period, "period")?, running)
        }
        Command::Press {
            keys,
            presses,
            interval,
            simultaneously,
        } => {
            let options = PressOptions::new()
                .presses(presses)
                .interval(seconds(interval, "interval")?)
                .key_delay(simulator.timing().key_delay)
                .simultaneously(simultaneously);
            simulator.key_press(&keys, options)?;
            Ok(())
        }
        Command::Hotkey { keys } => {
            simulator.hotkey(&keys, simulator.timing().key_delay)?;
            Ok(())
        }
        Command::Write { text, interval } => {
            simulator.write(
                &text,
                seconds(interval, "interval")?,
                simulator.timing().write_key_delay,
            )?;
            Ok(())
        }
        Command::Detect { keys } => {
            let held = detector.detect(&keys)?;
            println!("{}: {}", keys.join("+"), if held { "held" } else { "released" });
            Ok(())
        }
        Command::Position => {
            let position = simulator.mouse_position()?;
            let display = simulator.display_size()?;
            println!(
                "cursor ({}, {}) on a {}x{} display",
                position.x, position.y, display.width, display.height
            );
            Ok(())
        }
    }
}

/// Point `step` of `CIRCLE_STEPS` around `center`.
fn circle_point(center: Point, radius: u32, step: u32) -> Point {
    let angle = f64::from(step % CIRCLE_STEPS) / f64::from(CIRCLE_STEPS) * TAU;
    let radius = f64::from(radius);
    center.offset(
        (radius * angle.cos()).round() as i32,
        (radius * angle.sin()).round() as i32,
    )
}

fn circle(
    simulator: &InputSimulator,
    radius: u32,
    period: Duration,
    running: &AtomicBool,
) -> anyhow::Result<()> {
    let center = simulator.display_size()?.center();
    let segment = (period / CIRCLE_STEPS).max(MIN_SEGMENT);
    info!("circling ({}, {}) with radius {radius}; Ctrl-C to stop", center.x, center.y);

    let mut step = 0u32;
    while running.load(Ordering::Relaxed) {
        let target = circle_point(center, radius, step);
        simulator.move_mouse_to(Some(target.x), Some(target.y), segment)?;
        step = (step + 1) % CIRCLE_STEPS;
    }
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = read_config(cli.config.as_ref())?;

    // RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level)),
        )
        .init();

    info!("DirectInput starting");

    // ── Failsafe ──────────────────────────────────────────────────────────────
    if cli.no_failsafe || !config.failsafe.enabled {
        info!("failsafe not started");
    } else {
        let options = config
            .failsafe
            .to_options()
            .context("invalid [failsafe] configuration")?;
        init_failsafe(options).context("failed to start the failsafe")?;
    }

    // ── Input backends ────────────────────────────────────────────────────────
    let simulator = InputSimulator::with_timing(
        Arc::new(NativeInputSimulator::new()),
        config.input.to_timing(),
    );
    let detector = KeyDetector::new(Arc::new(NativeKeyState::new()));

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl-C: {e}"),
        }
    });

    // ── Run the command ───────────────────────────────────────────────────────
    let command = cli.command.unwrap_or_default();
    let result = tokio::task::spawn_blocking(move || {
        run(command, &simulator, &detector, &running)
    })
    .await
    .context("input task panicked")?;

    stop_failsafe();
    info!("DirectInput stopped");
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
