use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use posecast_lib::settings::{store, types::Settings};

#[derive(Parser, Debug)]
#[command(name = "posecast", about = "Gesture-triggered pose snapshots and skeleton streaming")]
struct Cli {
    /// Settings file (default: $POSECAST_CONFIG, else ./posecast.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines recording to replay, overriding the settings file
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Pace the replay at its recorded speed
    #[arg(long)]
    realtime: bool,

    /// Do not stream frames
    #[arg(long)]
    no_stream: bool,

    /// Write the default settings to the settings path and exit
    #[arg(long)]
    write_config: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "posecast=info,posecast_lib=info,pose_wire=info".into()),
        )
        .init();

    info!("posecast v{} starting", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> posecast_lib::error::Result<()> {
    let path = cli.config.unwrap_or_else(store::config_path);

    if cli.write_config {
        store::save(&path, &Settings::default())?;
        info!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let mut settings = store::load(&path)?;
    tracing::debug!("Loaded settings from {}", path.display());
    if cli.replay.is_some() {
        settings.replay.path = cli.replay;
    }
    settings.replay.realtime |= cli.realtime;
    if cli.no_stream {
        settings.stream.enabled = false;
    }

    posecast_lib::run(&settings)?;
    Ok(())
}
