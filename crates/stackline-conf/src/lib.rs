//! # Stackline Conf
//!
//! Settings that shape how a stackline pipeline reports failures, plus
//! logging initialisation.
//!
//! Settings come from three places, later ones overriding earlier ones:
//!
//! 1. [`Settings::default`]
//! 2. a TOML document ([`Settings::from_toml_str`], [`Settings::from_file`])
//! 3. prefixed environment variables ([`Settings::overlay_env`])
//!
//! ```rust
//! use stackline_conf::{ErrorFormat, Settings};
//!
//! let settings = Settings::from_toml_str(r#"
//!     display_error_details = true
//!     default_error_format = "html"
//! "#).unwrap();
//!
//! assert!(settings.display_error_details);
//! assert_eq!(settings.default_error_format, ErrorFormat::Html);
//! assert!(settings.log_errors);
//! ```

pub mod env;
pub mod logging;
pub mod settings;

pub use env::{Env, EnvError, parse_bool};
pub use logging::init_logging;
pub use settings::{ErrorFormat, Settings, SettingsError};
