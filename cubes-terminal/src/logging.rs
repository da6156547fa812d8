/// Logger setup for the terminal frontend
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Once;

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info",
/// "cubes_core=debug"). When `log_file` is set, records go there instead of
/// stderr so they do not tear the rendered frame.
#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub log_file: Option<PathBuf>,
}

static INIT: Once = Once::new();

/// Initializes the global logger once. Later calls are ignored.
pub fn init_logging(config: LoggingConfig) -> io::Result<()> {
    if INIT.is_completed() {
        return Ok(());
    }
    let target = match &config.log_file {
        Some(path) => Some(File::create(path)?),
        None => None,
    };

    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            // Anything louder scrolls over the animation
            builder.filter_level(log::LevelFilter::Warn);
        }

        if let Some(file) = target {
            builder
                .target(env_logger::Target::Pipe(Box::new(file)))
                .write_style(env_logger::WriteStyle::Never);
        }

        builder.init();
        log::debug!("logging initialized");
    });
    Ok(())
}
