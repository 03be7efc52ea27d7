use bytes::{Bytes, BytesMut};
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{HeaderMap, StatusCode};
use serde::Serialize;

/// HTTP Response representation
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Default for Response {
	fn default() -> Self {
		Self::ok()
	}
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use stackline_http::Response;
	/// use http::StatusCode;
	///
	/// let response = Response::new(StatusCode::ACCEPTED);
	/// assert_eq!(response.status, StatusCode::ACCEPTED);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}
	/// Create a Response with HTTP 200 OK status
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}
	/// Create a Response with HTTP 404 Not Found status
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}
	/// Create a Response with HTTP 500 Internal Server Error status
	pub fn internal_server_error() -> Self {
		Self::new(StatusCode::INTERNAL_SERVER_ERROR)
	}
	/// Replace the status code
	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}
	/// Set the response body
	///
	/// # Examples
	///
	/// ```
	/// use stackline_http::Response;
	/// use bytes::Bytes;
	///
	/// let response = Response::ok().with_body("Hello, World!");
	/// assert_eq!(response.body, Bytes::from("Hello, World!"));
	/// ```
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}
	/// Append bytes to the end of the current body
	///
	/// Middleware that writes on the way in and on the way out uses this to
	/// build up a body across the whole chain.
	///
	/// # Examples
	///
	/// ```
	/// use stackline_http::Response;
	///
	/// let response = Response::ok().append_body("in ").append_body("out");
	/// assert_eq!(response.body_text(), "in out");
	/// ```
	pub fn append_body(mut self, chunk: impl AsRef<[u8]>) -> Self {
		let mut body = BytesMut::with_capacity(self.body.len() + chunk.as_ref().len());
		body.extend_from_slice(&self.body);
		body.extend_from_slice(chunk.as_ref());
		self.body = body.freeze();
		self
	}
	/// Add a custom header to the response
	///
	/// Invalid names or values are ignored.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.insert(name, value);
		}
		self
	}
	/// Set the Content-Type header
	pub fn with_content_type(self, content_type: &str) -> Self {
		self.with_header(CONTENT_TYPE.as_str(), content_type)
	}
	/// Set the response body to JSON and add appropriate Content-Type header
	///
	/// # Examples
	///
	/// ```
	/// use stackline_http::Response;
	/// use serde_json::json;
	///
	/// let response = Response::ok().with_json(&json!({"ok": true})).unwrap();
	/// assert_eq!(
	///     response.headers.get("content-type").unwrap().to_str().unwrap(),
	///     "application/json"
	/// );
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> crate::Result<Self> {
		let json =
			serde_json::to_vec(data).map_err(|e| crate::Error::Serialization(e.to_string()))?;
		self.body = Bytes::from(json);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}
	/// Body decoded as UTF-8, lossy
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_append_body_keeps_existing_bytes() {
		let response = Response::ok()
			.with_body("B ")
			.append_body("A ")
			.append_body(b"K");

		assert_eq!(response.body_text(), "B A K");
	}

	#[rstest]
	fn test_with_header_ignores_invalid_name() {
		let response = Response::ok().with_header("bad header", "value");

		assert!(response.headers.is_empty());
	}

	#[rstest]
	fn test_with_content_type() {
		let response = Response::ok().with_content_type("text/plain; charset=utf-8");

		assert_eq!(
			response.headers.get(CONTENT_TYPE).unwrap(),
			"text/plain; charset=utf-8"
		);
	}

	#[rstest]
	#[case(Response::ok(), StatusCode::OK)]
	#[case(Response::not_found(), StatusCode::NOT_FOUND)]
	#[case(Response::internal_server_error(), StatusCode::INTERNAL_SERVER_ERROR)]
	#[case(Response::ok().with_status(StatusCode::CREATED), StatusCode::CREATED)]
	fn test_status_constructors(#[case] response: Response, #[case] expected: StatusCode) {
		assert_eq!(response.status, expected);
	}

	#[rstest]
	fn test_default_is_empty_ok() {
		let response = Response::default();

		assert_eq!(response.status, StatusCode::OK);
		assert!(response.body.is_empty());
	}
}
