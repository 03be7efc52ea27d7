//! # Stackline HTTP
//!
//! Request and response values that travel through a stackline pipeline.
//!
//! The pipeline itself never looks inside these values. They exist so that
//! handlers have something concrete to read from and write to, and so that an
//! error envelope can keep a copy of both at the point of failure.
//!
//! ```rust
//! use stackline_http::{Request, Response};
//! use http::{Method, StatusCode};
//!
//! let request = Request::builder()
//!     .method(Method::GET)
//!     .uri("/health")
//!     .build()
//!     .unwrap();
//! assert_eq!(request.path(), "/health");
//!
//! let response = Response::ok().with_body("alive");
//! assert_eq!(response.status, StatusCode::OK);
//! ```

pub mod request;
pub mod response;

pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export the http types that appear in the public API
pub use http::{HeaderMap, Method, StatusCode, Version, header};

use thiserror::Error;

/// Errors raised while building or serializing HTTP values
#[derive(Debug, Error)]
pub enum Error {
	/// The URI could not be parsed
	#[error("Invalid URI: {0}")]
	InvalidUri(String),

	/// A header name or value was rejected
	#[error("Invalid header: {0}")]
	InvalidHeader(String),

	/// A value could not be serialized to JSON
	#[error("Serialization error: {0}")]
	Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;
