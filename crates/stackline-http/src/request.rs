//! Inbound request value.

use crate::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri, Version};
use serde_json::Value;
use std::collections::HashMap;

/// HTTP Request representation
///
/// Treated as immutable by the pipeline. Middleware that wants to hand
/// something new to the rest of the chain builds a modified copy
/// (for example with [`Request::with_attribute`]) and passes that to the
/// continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Values attached by middleware for handlers further down the chain
	pub attributes: HashMap<String, Value>,
}

impl Request {
	/// Create a new request from its parts
	///
	/// # Examples
	///
	/// ```
	/// use stackline_http::Request;
	/// use http::{HeaderMap, Method, Uri, Version};
	/// use bytes::Bytes;
	///
	/// let request = Request::new(
	///     Method::POST,
	///     Uri::from_static("/items"),
	///     Version::HTTP_11,
	///     HeaderMap::new(),
	///     Bytes::from("payload"),
	/// );
	/// assert_eq!(request.method, Method::POST);
	/// assert_eq!(request.body, Bytes::from("payload"));
	/// ```
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			attributes: HashMap::new(),
		}
	}

	/// Start building a request
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Returns the path component of the URI
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Returns a header value as a string, if present and valid UTF-8
	///
	/// # Examples
	///
	/// ```
	/// use stackline_http::Request;
	///
	/// let request = Request::builder()
	///     .uri("/")
	///     .header("accept", "application/json")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.header("Accept"), Some("application/json"));
	/// assert_eq!(request.header("x-missing"), None);
	/// ```
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Returns an attribute attached by an earlier middleware
	pub fn attribute(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}

	/// Returns a copy of this request carrying an extra attribute
	///
	/// # Examples
	///
	/// ```
	/// use stackline_http::Request;
	/// use serde_json::json;
	///
	/// let request = Request::builder().uri("/").build().unwrap();
	/// let request = request.with_attribute("user_id", json!(42));
	/// assert_eq!(request.attribute("user_id"), Some(&json!(42)));
	/// ```
	pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(name.into(), value.into());
		self
	}
}

/// Builder for [`Request`]
///
/// Invalid URIs and headers are remembered and reported by [`RequestBuilder::build`].
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: std::result::Result<Uri, Error>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	error: Option<Error>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: Ok(Uri::from_static("/")),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			error: None,
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: &str) -> Self {
		self.uri = uri
			.parse::<Uri>()
			.map_err(|e| Error::InvalidUri(format!("{}: {}", uri, e)));
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Replace all headers
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Add a single header
	pub fn header(mut self, name: &str, value: &str) -> Self {
		match (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.insert(name, value);
			}
			_ => {
				self.error
					.get_or_insert(Error::InvalidHeader(name.to_string()));
			}
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Finish building
	///
	/// # Errors
	///
	/// Returns an error if the URI or any header was invalid.
	pub fn build(self) -> Result<Request> {
		if let Some(error) = self.error {
			return Err(error);
		}
		let uri = self.uri?;
		Ok(Request::new(
			self.method,
			uri,
			self.version,
			self.headers,
			self.body,
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_builder_defaults() {
		let request = Request::builder().build().unwrap();

		assert_eq!(request.method, Method::GET);
		assert_eq!(request.path(), "/");
		assert_eq!(request.version, Version::HTTP_11);
		assert!(request.headers.is_empty());
		assert!(request.body.is_empty());
	}

	#[rstest]
	fn test_builder_rejects_invalid_uri() {
		let result = Request::builder().uri("http://[::1").build();

		assert!(matches!(result, Err(Error::InvalidUri(_))));
	}

	#[rstest]
	fn test_builder_rejects_invalid_header() {
		let result = Request::builder().header("bad header", "x").build();

		assert!(matches!(result, Err(Error::InvalidHeader(name)) if name == "bad header"));
	}

	#[rstest]
	fn test_with_attribute_leaves_original_untouched() {
		let original = Request::builder().uri("/users").build().unwrap();
		let tagged = original.clone().with_attribute("role", "admin");

		assert_eq!(original.attribute("role"), None);
		assert_eq!(tagged.attribute("role"), Some(&json!("admin")));
		assert_ne!(original, tagged);
	}
}
