//! Pipeline settings

use crate::env::{Env, EnvError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Output format used when rendering an error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorFormat {
	#[default]
	Json,
	Html,
	Xml,
	#[serde(alias = "plain")]
	Text,
}

impl ErrorFormat {
	/// Content-Type sent with a body in this format
	pub fn content_type(&self) -> &'static str {
		match self {
			ErrorFormat::Json => "application/json",
			ErrorFormat::Html => "text/html; charset=utf-8",
			ErrorFormat::Xml => "application/xml",
			ErrorFormat::Text => "text/plain; charset=utf-8",
		}
	}
}

impl FromStr for ErrorFormat {
	type Err = SettingsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_lowercase().as_str() {
			"json" => Ok(ErrorFormat::Json),
			"html" => Ok(ErrorFormat::Html),
			"xml" => Ok(ErrorFormat::Xml),
			"text" | "plain" => Ok(ErrorFormat::Text),
			other => Err(SettingsError::Invalid {
				key: "default_error_format".to_string(),
				reason: format!("unknown error format '{}'", other),
			}),
		}
	}
}

impl fmt::Display for ErrorFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			ErrorFormat::Json => "json",
			ErrorFormat::Html => "html",
			ErrorFormat::Xml => "xml",
			ErrorFormat::Text => "text",
		};
		f.write_str(name)
	}
}

/// Settings consumed by the error middleware and logging setup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Include the error chain in rendered error responses
	pub display_error_details: bool,
	/// Log errors caught by the error middleware
	pub log_errors: bool,
	/// Include the error chain in log records
	pub log_error_details: bool,
	/// Format used when the client's Accept header matches nothing we render
	pub default_error_format: ErrorFormat,
	/// Default log filter directive, overridden by `RUST_LOG`
	pub log_level: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			display_error_details: false,
			log_errors: true,
			log_error_details: false,
			default_error_format: ErrorFormat::Json,
			log_level: "info".to_string(),
		}
	}
}

impl Settings {
	/// Parse settings from a TOML document; missing keys keep their defaults
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		toml::from_str(source).map_err(|e| SettingsError::Parse(e.to_string()))
	}

	/// Read settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
			path: path.display().to_string(),
			source: e,
		})?;
		Self::from_toml_str(&source)
	}

	/// Defaults overlaid with `<prefix>`-prefixed environment variables
	///
	/// # Examples
	///
	/// ```no_run
	/// use stackline_conf::Settings;
	///
	/// // Reads STACKLINE_DISPLAY_ERROR_DETAILS, STACKLINE_LOG_LEVEL, ...
	/// let settings = Settings::from_env("STACKLINE_").unwrap();
	/// ```
	pub fn from_env(prefix: &str) -> Result<Self, SettingsError> {
		Self::default().overlay_env(prefix)
	}

	/// Override fields with any `<prefix>`-prefixed environment variables that are set
	pub fn overlay_env(mut self, prefix: &str) -> Result<Self, SettingsError> {
		let env = Env::new().with_prefix(prefix);
		let mut overridden = Vec::new();

		if let Some(v) = env.optional_bool("DISPLAY_ERROR_DETAILS")? {
			self.display_error_details = v;
			overridden.push("display_error_details");
		}
		if let Some(v) = env.optional_bool("LOG_ERRORS")? {
			self.log_errors = v;
			overridden.push("log_errors");
		}
		if let Some(v) = env.optional_bool("LOG_ERROR_DETAILS")? {
			self.log_error_details = v;
			overridden.push("log_error_details");
		}
		if let Some(v) = env.optional_str("DEFAULT_ERROR_FORMAT")? {
			self.default_error_format = v.parse()?;
			overridden.push("default_error_format");
		}
		if let Some(v) = env.optional_str("LOG_LEVEL")? {
			self.log_level = v;
			overridden.push("log_level");
		}

		if !overridden.is_empty() {
			debug!(prefix, keys = ?overridden, "settings overridden from environment");
		}
		Ok(self)
	}
}

#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("Failed to read settings file '{path}': {source}")]
	Io {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse settings: {0}")]
	Parse(String),

	#[error("Invalid value for '{key}': {reason}")]
	Invalid { key: String, reason: String },

	#[error(transparent)]
	Env(#[from] EnvError),
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	fn test_defaults() {
		let settings = Settings::default();

		assert!(!settings.display_error_details);
		assert!(settings.log_errors);
		assert!(!settings.log_error_details);
		assert_eq!(settings.default_error_format, ErrorFormat::Json);
		assert_eq!(settings.log_level, "info");
	}

	#[rstest]
	fn test_empty_toml_gives_defaults() {
		assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
	}

	#[rstest]
	fn test_plain_alias() {
		let settings = Settings::from_toml_str("default_error_format = \"plain\"").unwrap();
		assert_eq!(settings.default_error_format, ErrorFormat::Text);
	}

	#[rstest]
	fn test_unknown_format_is_rejected() {
		let result = Settings::from_toml_str("default_error_format = \"yaml\"");
		assert!(matches!(result, Err(SettingsError::Parse(_))));

		assert!(matches!(
			"yaml".parse::<ErrorFormat>(),
			Err(SettingsError::Invalid { .. })
		));
	}

	#[rstest]
	#[case(ErrorFormat::Json, "application/json")]
	#[case(ErrorFormat::Html, "text/html; charset=utf-8")]
	#[case(ErrorFormat::Xml, "application/xml")]
	#[case(ErrorFormat::Text, "text/plain; charset=utf-8")]
	fn test_content_type(#[case] format: ErrorFormat, #[case] expected: &str) {
		assert_eq!(format.content_type(), expected);
	}

	#[rstest]
	#[serial]
	fn test_overlay_env_only_touches_set_keys() {
		// SAFETY: every test in this crate that touches the environment is #[serial].
		unsafe {
			std::env::set_var("STACKLINE_OVERLAY_TEST_LOG_LEVEL", "debug");
		}
		let settings = Settings::default().overlay_env("STACKLINE_OVERLAY_TEST_");
		// SAFETY: see above.
		unsafe {
			std::env::remove_var("STACKLINE_OVERLAY_TEST_LOG_LEVEL");
		}

		let settings = settings.unwrap();
		assert_eq!(settings.log_level, "debug");
		assert_eq!(
			settings,
			Settings {
				log_level: "debug".to_string(),
				..Settings::default()
			}
		);
	}
}
