//! Environment variable handling
//!
//! Prefixed lookups with Django-environ style boolean parsing.

use std::env;
use thiserror::Error;

/// Environment variable reader with prefix support
#[derive(Debug, Clone, Default)]
pub struct Env {
	/// Optional prefix for environment variables (e.g., "STACKLINE_")
	pub prefix: Option<String>,
}

impl Env {
	/// Create a new Env instance
	pub fn new() -> Self {
		Self { prefix: None }
	}
	/// Set a prefix for all environment variable lookups
	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	fn get_key_name(&self, key: &str) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}{}", prefix, key),
			None => key.to_string(),
		}
	}

	/// Read an optional string value
	///
	/// Returns `Ok(None)` when the variable is not set.
	pub fn optional_str(&self, key: &str) -> Result<Option<String>, EnvError> {
		let full_key = self.get_key_name(key);
		validate_env_var_name(&full_key)?;

		match env::var(&full_key) {
			Ok(val) => Ok(Some(val)),
			Err(env::VarError::NotPresent) => Ok(None),
			Err(env::VarError::NotUnicode(_)) => Err(EnvError::ParseError {
				key: full_key,
				value_len: 0,
				error: "value is not valid unicode".to_string(),
			}),
		}
	}
	/// Read a string value
	pub fn str(&self, key: &str) -> Result<String, EnvError> {
		self.optional_str(key)?
			.ok_or_else(|| EnvError::MissingVariable(self.get_key_name(key)))
	}
	/// Read an optional boolean value
	pub fn optional_bool(&self, key: &str) -> Result<Option<bool>, EnvError> {
		match self.optional_str(key)? {
			Some(val) => parse_bool(&val)
				.map(Some)
				.map_err(|error| EnvError::ParseError {
					key: self.get_key_name(key),
					value_len: val.len(),
					error,
				}),
			None => Ok(None),
		}
	}
	/// Read a boolean value
	pub fn bool(&self, key: &str) -> Result<bool, EnvError> {
		self.optional_bool(key)?
			.ok_or_else(|| EnvError::MissingVariable(self.get_key_name(key)))
	}
}

/// Parse a boolean the way Django-environ does
///
/// # Examples
///
/// ```
/// use stackline_conf::parse_bool;
///
/// assert_eq!(parse_bool("Yes"), Ok(true));
/// assert_eq!(parse_bool("off"), Ok(false));
/// assert!(parse_bool("maybe").is_err());
/// ```
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.trim().to_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Ok(true),
		"false" | "no" | "off" | "0" | "" => Ok(false),
		other => Err(format!("cannot interpret '{}' as a boolean", other)),
	}
}

fn validate_env_var_name(name: &str) -> Result<(), EnvError> {
	if name.is_empty() {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not be empty".to_string(),
		});
	}

	if name.contains('=') || name.contains('\0') {
		return Err(EnvError::InvalidVariableName {
			name: name.to_string(),
			reason: "environment variable name must not contain '=' or NUL".to_string(),
		});
	}

	Ok(())
}

#[derive(Debug, Error)]
pub enum EnvError {
	#[error("Missing environment variable: {0}")]
	MissingVariable(String),

	#[error("Failed to parse environment variable '{key}' (value length: {value_len}): {error}")]
	ParseError {
		key: String,
		/// Length of the original value (the raw value is not kept)
		value_len: usize,
		error: String,
	},

	#[error("Invalid environment variable name '{name}': {reason}")]
	InvalidVariableName { name: String, reason: String },
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serial_test::serial;

	#[rstest]
	#[case("true", true)]
	#[case("TRUE", true)]
	#[case("on", true)]
	#[case("1", true)]
	#[case("no", false)]
	#[case("0", false)]
	fn test_parse_bool(#[case] input: &str, #[case] expected: bool) {
		assert_eq!(parse_bool(input), Ok(expected));
	}

	#[rstest]
	#[serial]
	fn test_prefixed_bool() {
		// SAFETY: every test in this crate that touches the environment is #[serial].
		unsafe {
			env::set_var("STACKLINE_ENV_TEST_FLAG", "yes");
		}
		let env = Env::new().with_prefix("STACKLINE_ENV_TEST_");
		assert!(env.bool("FLAG").unwrap());
		// SAFETY: see above.
		unsafe {
			env::remove_var("STACKLINE_ENV_TEST_FLAG");
		}
	}

	#[rstest]
	#[serial]
	fn test_invalid_bool_does_not_leak_value() {
		// SAFETY: every test in this crate that touches the environment is #[serial].
		unsafe {
			env::set_var("STACKLINE_ENV_TEST_SECRETISH", "hunter2");
		}
		let env = Env::new().with_prefix("STACKLINE_ENV_TEST_");
		let err = env.bool("SECRETISH").unwrap_err();
		assert!(matches!(err, EnvError::ParseError { value_len: 7, .. }));
		// SAFETY: see above.
		unsafe {
			env::remove_var("STACKLINE_ENV_TEST_SECRETISH");
		}
	}

	#[rstest]
	#[serial]
	fn test_missing_variable() {
		let env = Env::new().with_prefix("STACKLINE_ENV_TEST_");
		assert!(matches!(
			env.str("DEFINITELY_UNSET"),
			Err(EnvError::MissingVariable(key)) if key == "STACKLINE_ENV_TEST_DEFINITELY_UNSET"
		));
		assert!(env.optional_bool("DEFINITELY_UNSET").unwrap().is_none());
	}

	#[rstest]
	#[serial]
	fn test_rejects_bad_names() {
		let env = Env::new();
		assert!(matches!(
			env.str("A=B"),
			Err(EnvError::InvalidVariableName { .. })
		));
	}
}
