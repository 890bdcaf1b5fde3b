//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LockNoteConfig;
use crate::constants::LOG_ENV;

const DEFAULT_FILTER: &str = "warn";

/// Install a stderr subscriber. LOCKNOTE_LOG wins over the config level.
pub fn init(config: Option<&LockNoteConfig>, quiet: bool) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(value) if !value.trim().is_empty() => EnvFilter::new(value),
        _ if quiet => EnvFilter::new("error"),
        _ => {
            let level = config
                .and_then(|config| config.logging.level.as_deref())
                .unwrap_or(DEFAULT_FILTER);
            EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
