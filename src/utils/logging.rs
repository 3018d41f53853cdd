//! Logging bootstrap for hosts embedding the engine.
//!
//! The engine itself only speaks the `log` facade; this installs `env_logger`
//! for hosts that do not bring their own logger.

use env_logger::{Builder, Env};

use crate::models::settings::LoggingSettings;

/// Install `env_logger`, honouring `RUST_LOG` and falling back to the configured level.
///
/// Returns `false` when a logger was already installed, which is harmless.
pub fn init_logging(settings: &LoggingSettings) -> bool {
    let env = Env::default().default_filter_or(settings.level.as_str());
    match Builder::from_env(env).try_init() {
        Ok(()) => {
            log::info!("Logging initialized at level {}", settings.level);
            true
        }
        Err(_) => false,
    }
}
