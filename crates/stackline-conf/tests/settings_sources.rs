//! Integration tests for settings sources
//!
//! - TOML files on disk
//! - Prefixed environment variables layered over file settings

use rstest::rstest;
use serial_test::serial;
use stackline_conf::{ErrorFormat, Settings, SettingsError};
use std::io::Write;

#[rstest]
fn test_settings_from_file() {
	let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
	writeln!(
		file,
		"display_error_details = true\nlog_errors = false\ndefault_error_format = \"xml\""
	)
	.unwrap();

	let settings = Settings::from_file(file.path()).unwrap();

	assert!(settings.display_error_details);
	assert!(!settings.log_errors);
	assert_eq!(settings.default_error_format, ErrorFormat::Xml);
	assert_eq!(settings.log_level, "info");
}

#[rstest]
fn test_settings_from_missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let result = Settings::from_file(dir.path().join("absent.toml"));

	assert!(matches!(result, Err(SettingsError::Io { .. })));
}

#[rstest]
#[serial]
fn test_env_overrides_file_settings() {
	let file_settings = Settings::from_toml_str("display_error_details = false\nlog_level = \"warn\"").unwrap();

	// SAFETY: every test in this binary that touches the environment is #[serial].
	unsafe {
		std::env::set_var("STACKLINE_IT_DISPLAY_ERROR_DETAILS", "on");
		std::env::set_var("STACKLINE_IT_DEFAULT_ERROR_FORMAT", "html");
	}

	let settings = file_settings.overlay_env("STACKLINE_IT_").unwrap();

	// SAFETY: see above.
	unsafe {
		std::env::remove_var("STACKLINE_IT_DISPLAY_ERROR_DETAILS");
		std::env::remove_var("STACKLINE_IT_DEFAULT_ERROR_FORMAT");
	}

	assert!(settings.display_error_details);
	assert_eq!(settings.default_error_format, ErrorFormat::Html);
	// Untouched by the environment
	assert_eq!(settings.log_level, "warn");
}

#[rstest]
#[serial]
fn test_env_with_bad_boolean() {
	// SAFETY: every test in this binary that touches the environment is #[serial].
	unsafe {
		std::env::set_var("STACKLINE_BAD_LOG_ERRORS", "sometimes");
	}

	let result = Settings::from_env("STACKLINE_BAD_");

	// SAFETY: see above.
	unsafe {
		std::env::remove_var("STACKLINE_BAD_LOG_ERRORS");
	}

	assert!(matches!(result, Err(SettingsError::Env(_))));
}
