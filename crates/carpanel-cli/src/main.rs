//! carpanel - Main entry point
//!
//! Terminal remote-control panel for the robot car. Runs on a single-threaded
//! runtime; every input line becomes its own task so commands can overlap the
//! way button presses do in the browser panel.

mod config;
mod input;
mod terminal;

use anyhow::{Context, Result};
use carpanel_client::{HttpVehicle, Panel, Surface};
use clap::Parser;
use std::io::Stdout;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::input::{Action, HELP};
use crate::terminal::TerminalSurface;

type CarPanel = Panel<HttpVehicle>;

#[derive(Parser, Debug)]
#[command(name = "carpanel")]
#[command(about = "Remote-control panel for the robot car")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "carpanel.toml")]
    config: PathBuf,

    /// Base URL of the car (overrides the config file)
    #[arg(short, long)]
    url: Option<String>,

    /// Firmware without autonomous mode
    #[arg(long)]
    legacy: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Poll the status once, print it and exit
    #[arg(long)]
    status: bool,

    /// Write a default configuration file and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("carpanel v{}", env!("CARGO_PKG_VERSION"));

    if let Some(path) = &args.write_default_config {
        config::save_default_config(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    if let Some(url) = args.url {
        config.vehicle.base_url = url;
    }
    if args.legacy {
        config.panel.autonomous_mode = false;
    }

    info!(
        url = %config.vehicle.base_url,
        autonomous = config.panel.autonomous_mode,
        "Configuration loaded"
    );

    let vehicle = HttpVehicle::new(&config.vehicle.base_url, config.timeout())
        .context("Failed to create HTTP client")?;
    let terminal = Arc::new(TerminalSurface::new(std::io::stdout()));
    let surface: Arc<dyn Surface> = terminal.clone();
    let panel = Arc::new(Panel::new(vehicle, surface, config.panel_options()));

    if args.status {
        let status = panel
            .init()
            .await
            .with_context(|| format!("Vehicle at {} not reachable", panel.api().base_url()))?;
        if let Some(status) = status {
            terminal.show_status(&status);
        }
        return Ok(());
    }

    // Failures show up as a disabled panel
    let _ = panel.init().await;
    println!("\nType `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match input::parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Action::Quit)) => break,
            Ok(Some(Action::Help)) => println!("{}", HELP),
            Ok(Some(action)) => {
                let panel = panel.clone();
                let terminal = terminal.clone();
                tokio::spawn(async move {
                    run_action(&panel, &terminal, action).await;
                });
            }
            Err(e) => eprintln!("{}", e),
        }
    }

    debug!("Input closed, leaving");
    Ok(())
}

/// Carry out one user action; errors were already alerted by the panel
async fn run_action(panel: &CarPanel, terminal: &TerminalSurface<Stdout>, action: Action) {
    match action {
        Action::Command(command) => {
            let _ = panel.dispatch(command).await;
        }
        Action::Status => {
            // a stale reply was not applied and is not shown either
            if let Ok(Some(status)) = panel.refresh_status().await {
                terminal.show_status(&status);
            }
        }
        Action::Upload { target, path } => {
            let _ = panel.upload(target, path.as_deref()).await;
        }
        Action::Reload => {
            let _ = panel.reload().await;
        }
        Action::Help | Action::Quit => {}
    }
}
