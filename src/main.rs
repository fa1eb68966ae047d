//! Perch - window docking for desktop avatars
//!
//! Drives the docking engine against the native window system, or replays
//! scripted desktops against the in-memory one.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use perch::config::{self, Config};
use perch::dock::{DockingEngine, SnapshotProvider, TickInput};
use perch::platform::{self, HostSignals, WindowHandle, WindowSystem};
use perch::sim::{self, Scenario, Simulation};

/// Perch - let a desktop avatar sit on other windows
#[derive(Parser)]
#[command(name = "perch")]
#[command(author = "Perch Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Dock a desktop avatar onto window title bars", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive an avatar window on the native desktop
    Run {
        /// Exact title of the avatar window
        #[arg(short, long)]
        title: Option<String>,

        /// Raw window handle of the avatar
        #[arg(long)]
        hwnd: Option<isize>,

        /// Tick interval (ms)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Replay a scenario file against a simulated desktop
    Simulate {
        /// Scenario file (TOML)
        scenario: Option<PathBuf>,

        /// Print a sample scenario
        #[arg(long)]
        sample: bool,

        /// Include debug geometry in the reports
        #[arg(long)]
        debug: bool,
    },

    /// List candidate windows, front-most first
    Windows {
        /// Read the desktop from a scenario file instead
        #[arg(short, long)]
        scenario: Option<PathBuf>,
    },

    /// Show current configuration
    Config {
        /// Generate sample configuration
        #[arg(long)]
        generate: bool,

        /// Output path for generated config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show system information
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration first so `general.verbose` can raise the log level
    let config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default().unwrap_or_default()
    };

    // Initialize logging; stdout is reserved for reports
    let filter = if cli.verbose || config.general.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            title,
            hwnd,
            interval,
        } => {
            run_native(config, title, hwnd, interval).await?;
        }
        Commands::Simulate {
            scenario,
            sample,
            debug,
        } => {
            if sample {
                print!("{}", sim::sample_scenario());
            } else if let Some(path) = scenario {
                run_simulation(config, &path, debug)?;
            } else {
                anyhow::bail!("Please specify a scenario file or use --sample");
            }
        }
        Commands::Windows { scenario } => {
            list_windows(&config, scenario.as_deref())?;
        }
        Commands::Config { generate, output } => {
            if generate {
                let sample = config::generate_sample_config()?;
                if let Some(path) = output {
                    std::fs::write(&path, &sample)?;
                    println!("Configuration written to: {}", path.display());
                } else {
                    println!("{}", sample);
                }
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Commands::Info => {
            print_system_info(&config);
        }
    }

    Ok(())
}

/// Drive the avatar on the native window system until Ctrl+C
async fn run_native(
    config: Config,
    title: Option<String>,
    hwnd: Option<isize>,
    interval: Option<u64>,
) -> anyhow::Result<()> {
    #[cfg(target_os = "windows")]
    {
        let mut ws = platform::Win32WindowSystem::new();
        let avatar = match (hwnd, title.or_else(|| config.general.avatar_title.clone())) {
            (Some(raw), _) => WindowHandle(raw),
            (None, Some(title)) => ws
                .find_window_by_title(&title)
                .ok_or_else(|| anyhow::anyhow!("No window titled '{}'", title))?,
            (None, None) => {
                anyhow::bail!("Please specify --title, --hwnd or general.avatar_title")
            }
        };
        let interval = interval.unwrap_or(config.general.tick_interval_ms).max(1);
        drive(&mut ws, avatar, config, Duration::from_millis(interval)).await
    }

    #[cfg(not(target_os = "windows"))]
    {
        let _ = (config, title, hwnd, interval);
        anyhow::bail!(
            "No native window system on {}; try `perch simulate --sample`",
            platform::platform_name()
        )
    }
}

/// Tick the engine on a fixed interval, printing reports that carry events
#[cfg_attr(not(target_os = "windows"), allow(dead_code))]
async fn drive<W: WindowSystem + HostSignals>(
    ws: &mut W,
    avatar: WindowHandle,
    config: Config,
    interval: Duration,
) -> anyhow::Result<()> {
    tracing::info!("Driving avatar {} every {:?}", avatar, interval);

    let mut engine = DockingEngine::new(avatar, config);
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    println!("\n========================================");
    println!("  Perch Running");
    println!("========================================");
    println!("  Avatar: {}", avatar);
    println!("  Interval: {} ms", interval.as_millis());
    println!("========================================");
    println!("\nDrag the avatar onto a title bar to dock.");
    println!("Press Ctrl+C to stop.\n");

    // Main loop
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let input = TickInput::from_host(&*ws, avatar);
                let report = engine.tick(ws, input);
                if !report.events.is_empty() {
                    println!("{}", serde_json::to_string(&report)?);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\nShutting down...");
                break;
            }
        }
    }

    if engine.release(ws).is_some() {
        tracing::info!("Released on shutdown");
    }
    tracing::info!("Stopped after {} ticks", engine.ticks());

    Ok(())
}

/// Replay a scenario, one JSON report per line
fn run_simulation(mut config: Config, path: &Path, debug: bool) -> anyhow::Result<()> {
    let mut scenario = Scenario::load(path)?;
    if debug {
        config.debug.visualize = true;
        if let Some(own) = scenario.config.as_mut() {
            own.debug.visualize = true;
        }
    }

    tracing::info!(
        "Simulating {} ({} windows, {} steps)",
        path.display(),
        scenario.windows.len(),
        scenario.steps.len()
    );

    let mut simulation = Simulation::new(scenario, config)?;
    for report in simulation.run()? {
        println!("{}", serde_json::to_string(&report)?);
    }

    Ok(())
}

/// Print the filtered candidate list
fn list_windows(config: &Config, scenario: Option<&Path>) -> anyhow::Result<()> {
    let provider = SnapshotProvider::new(config.filter.clone());

    if let Some(path) = scenario {
        let scenario = Scenario::load(path)?;
        let ws = scenario.build_desktop()?;
        print_snapshot(&provider, &ws, WindowHandle(scenario.avatar.handle));
        return Ok(());
    }

    #[cfg(target_os = "windows")]
    {
        let ws = platform::Win32WindowSystem::new();
        let avatar = config
            .general
            .avatar_title
            .as_deref()
            .and_then(|title| ws.find_window_by_title(title))
            .unwrap_or(WindowHandle(0));
        print_snapshot(&provider, &ws, avatar);
        Ok(())
    }

    #[cfg(not(target_os = "windows"))]
    {
        anyhow::bail!(
            "No native window system on {}; use --scenario",
            platform::platform_name()
        )
    }
}

fn print_snapshot<W: WindowSystem + ?Sized>(
    provider: &SnapshotProvider,
    ws: &W,
    avatar: WindowHandle,
) {
    let snapshot = provider.snapshot(ws, avatar);

    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>8}",
        "HANDLE", "LEFT", "TOP", "WIDTH", "HEIGHT"
    );
    for entry in snapshot.iter() {
        println!(
            "{:<12} {:>8} {:>8} {:>8} {:>8}",
            entry.handle.to_string(),
            entry.rect.left,
            entry.rect.top,
            entry.rect.width(),
            entry.rect.height()
        );
    }
    println!("\n{} candidate window(s), front-most first", snapshot.len());
}

/// Print system information
fn print_system_info(config: &Config) {
    println!("Perch System Information");
    println!("========================\n");

    println!("Platform: {}", platform::platform_name());
    println!(
        "Native backend: {}",
        if platform::has_native_backend() {
            "available"
        } else {
            "not available (simulate only)"
        }
    );

    #[cfg(target_os = "windows")]
    {
        println!("\nWindows Notes:");
        println!("  - The avatar process should be per-monitor DPI aware");
    }

    let docking = &config.docking;
    println!(
        "\nSnap zone: {}x{} at ({}, {}) from bottom-center",
        docking.snap_zone_size.width,
        docking.snap_zone_size.height,
        docking.snap_zone_offset.x,
        docking.snap_zone_offset.y
    );
    println!("Title bar strip: {} px", docking.title_bar_height);
    println!("Vertical trim: {} px", docking.vertical_offset);
    println!("Tick interval: {} ms", config.general.tick_interval_ms);
    if let Some(dir) = dirs::config_dir() {
        println!("Config path: {}", dir.join("perch/config.toml").display());
    }
}
