use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use postscout_core::AppConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber: stderr plus an append-only `run.log` in the
/// output directory. `RUST_LOG` wins over the configured level.
pub fn init(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;

    std::fs::create_dir_all(&config.out_dir).with_context(|| {
        format!("failed to create output directory {}", config.out_dir.display())
    })?;
    let log_path = config.log_path();
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file)))
        .try_init()?;
    Ok(())
}
