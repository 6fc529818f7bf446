//! Headlink Daemon - Main entry point
//!
//! Reference driver that polls the tracking core at the cadence it
//! recommends and applies its output to a logging camera.

mod camera;
mod config;
mod simulate;

use anyhow::Result;
use clap::Parser;
use headlink_tracker::Tracker;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "headlink")]
#[command(about = "Bridges a head-tracking producer to a host camera over shared memory")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "headlink.toml")]
    config: PathBuf,

    /// Override the shared region name
    #[arg(short = 'n', long)]
    channel: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Run a single tick, print the camera state, and exit
    #[arg(long)]
    once: bool,

    /// Run a synthetic producer alongside the tracker
    #[arg(long)]
    simulate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Headlink v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let mut config = config::load_config(&args.config)?;

    // Override channel name if specified
    if let Some(channel) = args.channel {
        config.channel.name = channel;
    }

    info!(
        channel = %config.channel.name,
        advisory_lock = config.channel.advisory_lock,
        "Configuration loaded"
    );

    if args.simulate {
        let name = config.channel.name.clone();
        let advisory_lock = config.channel.advisory_lock;
        tokio::spawn(async move {
            if let Err(e) = simulate::run(&name, advisory_lock).await {
                error!(error = %e, "Simulated producer failed");
            }
        });
    }

    let mut tracker = Tracker::new(config.to_tracker_config())?;
    let mut camera = camera::LogCamera::default();
    let frame = Duration::from_secs_f64(config.daemon.frame_interval_secs);

    if args.once {
        // Single tick mode
        let next = tracker.tick(&mut camera);
        let axes = camera.axes();
        println!("next interval: {next:.3}s (negative = every frame)");
        println!(
            "camera: x={:.4} y={:.4} z={:.4} heading={:.2} pitch={:.2} roll={:.2}",
            axes[0], axes[1], axes[2], axes[3], axes[4], axes[5]
        );
        return Ok(());
    }

    info!("Driving tracker (ctrl-c to stop)");
    loop {
        let next = tracker.tick(&mut camera);
        let delay = if next < 0.0 {
            frame
        } else {
            Duration::from_secs_f64(next)
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
            _ = sleep(delay) => {}
        }
    }

    Ok(())
}
