//! File logging. The terminal belongs to the dashboard, so everything goes to
//! `development.log` in the config directory.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "development.log";

/// `RUST_LOG` wins; otherwise `debug` in debug mode and `warn` outside it.
pub fn default_level(debug: bool) -> &'static str {
    if debug { "debug" } else { "warn" }
}

/// Install the global subscriber. Keep the guard alive until exit so buffered
/// lines are flushed. Returns `None` if a subscriber is already installed.
pub fn init(config_dir: &Path, debug: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(debug)));
    let appender = tracing_appender::rolling::never(config_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        return None;
    }
    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_follows_debug_flag() {
        assert_eq!(default_level(true), "debug");
        assert_eq!(default_level(false), "warn");
    }
}
