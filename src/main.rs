use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use newsreel::{
    composition::{AssemblyEngine, Mode},
    config::Config,
    media::FfmpegEngine,
};

#[derive(Parser)]
#[command(
    name = "newsreel",
    version,
    about = "Assemble narrated news videos from audio tracks and image folders",
    long_about = "Newsreel builds a finished video from a project folder containing one audio track and one numbered image folder per segment, plus optional template, anchor, transition and presenter assets. Requires FFmpeg on PATH."
)]
struct Cli {
    /// Project folder following the layout convention
    folder: PathBuf,

    /// Rendering mode: flat (full-screen slideshow) or template (composited)
    #[arg(short, long, default_value = "flat")]
    mode: String,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Newsreel v{}", env!("CARGO_PKG_VERSION"));

    let mode: Mode = cli
        .mode
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    // Load configuration
    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    let media = FfmpegEngine::new();
    if !media.check_available() {
        anyhow::bail!("FFmpeg not found. Install FFmpeg and make sure it is on PATH.");
    }

    let engine = AssemblyEngine::with_media_engine(config, media);

    let output = engine
        .create_final_video(&cli.folder, mode)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    info!("Assembly complete! Output saved to: {:?}", output);
    Ok(())
}
