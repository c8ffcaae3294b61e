//! Tracing setup for the detector and its CLI.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Level applied to every crate other than this one when `level` is a bare level.
const DEPENDENCY_LEVEL: &str = "warn";

/// Expands the configured level into an `EnvFilter` directive.
///
/// A bare level such as `"debug"` only applies to `motion_pattern`; dependencies
/// stay at `warn` so per-frame detector output is not buried under decoder and
/// runtime noise. Anything containing a target (`=`) or a list (`,`) is used as-is.
pub fn filter_directive(level: &str) -> String {
    let level = level.trim();
    if level.is_empty() {
        return format!("{DEPENDENCY_LEVEL},{}=info", env!("CARGO_CRATE_NAME"));
    }
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    format!("{DEPENDENCY_LEVEL},{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `config.level`.
///
/// Returns `false` if a subscriber was already installed, which happens when the
/// CLI and a test harness both try to set one up.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = if config.json {
        builder.json().with_current_span(false).try_init()
    } else {
        builder.compact().with_target(true).try_init()
    };
    installed.is_ok()
}
