//! Shared `--log-level` handling for the binaries.
use anyhow::{bail, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parse a level name, case-insensitively.  Unknown names are an error.
pub fn parse_level(s: &str) -> Result<Level> {
    let level = match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        other => bail!("unknown log level '{other}' (expected trace, debug, info, warn or error)"),
    };
    Ok(level)
}

/// Install the global fmt subscriber at `level`.
pub fn init(level: Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).with_target(false).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
