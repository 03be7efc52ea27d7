//! Configuration module.
//!
//! # Examples
//!
//! ```rust
//! use stackline::conf::{ErrorFormat, Settings};
//!
//! let settings = Settings::default();
//! assert_eq!(settings.default_error_format, ErrorFormat::Json);
//! assert!(!settings.display_error_details);
//! ```

pub use stackline_conf::*;
