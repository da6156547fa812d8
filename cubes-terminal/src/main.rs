/// Cubes Terminal Demo - Spinning and orbiting cubes
///
/// Controls:
///   - 1 / 2 / 3: spin, orbit a fixed point, orbit a relative point
///   - Space: pause
///   - Q/ESC: Quit
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use cubes_core::{DemoConfig, TransformStrategy};
use cubes_terminal::logging::{init_logging, LoggingConfig};
use cubes_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(version, about = "Lit, spinning and orbiting cubes rendered in the terminal")]
struct Cli {
    /// TOML scene configuration; the built-in scene is used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Initial transform strategy (spin, orbit-fixed, orbit-relative)
    #[arg(short, long)]
    strategy: Option<TransformStrategy>,

    /// Rotation speed multiplier
    #[arg(long)]
    speed: Option<f32>,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Write log records to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG (e.g. "cubes_core=debug")
    #[arg(long)]
    log: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        log_file: cli.log_file.clone(),
    })
    .context("failed to open log file")?;

    let mut config = match &cli.config {
        Some(path) => DemoConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => DemoConfig::builtin(),
    };
    if let Some(strategy) = cli.strategy {
        config.animation.strategy = strategy;
    }
    if let Some(speed) = cli.speed {
        config.animation.speed = speed;
    }
    config.validate().context("invalid command line overrides")?;

    let mut app = TerminalApp::new(&config, cli.fps).context("failed to query terminal size")?;
    app.run().context("terminal renderer failed")?;

    Ok(())
}
