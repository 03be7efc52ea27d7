//! Logging initialisation

use crate::settings::Settings;
use tracing_subscriber::EnvFilter;

/// Install a `tracing` fmt subscriber filtered by `RUST_LOG`, falling back to
/// `settings.log_level`.
///
/// Returns `false` when a global subscriber was already installed, which
/// makes repeated calls (for example from several tests) harmless.
pub fn init_logging(settings: &Settings) -> bool {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(true)
		.try_init()
		.is_ok()
}
