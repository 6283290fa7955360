// src/logging.rs

//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The filter is chosen in this order:
//! 1. `--log-level` (applies to this crate; dependencies stay at `warn`)
//! 2. `PREFAB_INDEX_LOG`, read as a full `EnvFilter` directive, so
//!    `PREFAB_INDEX_LOG=prefab_index::engine=trace` works
//! 3. `info` for this crate
//!
//! Everything goes to stderr; stdout is reserved for query results.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable consulted when no `--log-level` is given.
pub const LOG_ENV_VAR: &str = "PREFAB_INDEX_LOG";

const CRATE_TARGET: &str = "prefab_index";

/// Install the global subscriber. Call once, at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = match cli_level {
        Some(level) => crate_filter(level),
        None => std::env::var(LOG_ENV_VAR)
            .ok()
            .and_then(|raw| EnvFilter::try_new(raw.trim()).ok())
            .unwrap_or_else(|| crate_filter(LogLevel::Info)),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn directive(level: LogLevel) -> String {
    let name = match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };
    format!("warn,{CRATE_TARGET}={name}")
}

fn crate_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(directive(level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_level_scopes_to_this_crate() {
        assert_eq!(directive(LogLevel::Debug), "warn,prefab_index=debug");
        assert_eq!(directive(LogLevel::Error), "warn,prefab_index=error");
    }

    #[test]
    fn env_directives_parse() {
        assert!(EnvFilter::try_new("prefab_index::engine=trace").is_ok());
    }
}
