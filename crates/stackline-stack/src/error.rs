//! Pipeline errors and the request/response error envelope.

use http::StatusCode;
use stackline_http::{Request, Response};
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building or running a [`Stack`](crate::Stack)
#[derive(Debug, Error)]
pub enum Error {
	/// An entry was added while the stack was running
	#[error("Cannot add entries to a stack while it is running")]
	Locked,

	/// No resolver could turn the entry into a handler
	#[error("Entry `{0}` could not be resolved to a handler")]
	Unresolvable(String),

	/// A handler returned something other than a response
	///
	/// Only surfaces bare when the offending handler is the first one run.
	/// Behind another handler's continuation it reaches the caller wrapped in
	/// [`Error::Http`], so check [`HttpError::root_cause`] as well.
	#[error("Handler must return a response, got {0}")]
	ContractViolation(String),

	/// An error carrying the request and response it happened with
	#[error(transparent)]
	Http(Box<HttpError>),

	/// Plain failure raised by a handler
	#[error("Internal error: {0}")]
	Internal(String),

	/// Request or response value could not be built
	#[error(transparent)]
	Payload(#[from] stackline_http::Error),

	/// Any other error raised by a handler
	#[error(transparent)]
	Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
	/// Wrap a foreign error
	pub fn custom(error: impl std::error::Error + Send + Sync + 'static) -> Self {
		Error::Custom(Box::new(error))
	}

	/// Returns the envelope when this error carries request/response context
	pub fn as_http(&self) -> Option<&HttpError> {
		match self {
			Error::Http(envelope) => Some(envelope),
			_ => None,
		}
	}

	/// Whether this error already carries request/response context
	pub fn is_http(&self) -> bool {
		matches!(self, Error::Http(_))
	}

	/// Status a renderer should use for this error
	pub fn status(&self) -> StatusCode {
		match self {
			Error::Http(envelope) => envelope.status(),
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// Short machine-readable name of the variant
	pub fn kind(&self) -> &'static str {
		match self {
			Error::Locked => "locked",
			Error::Unresolvable(_) => "unresolvable",
			Error::ContractViolation(_) => "contract_violation",
			Error::Http(_) => "http",
			Error::Internal(_) => "internal",
			Error::Payload(_) => "payload",
			Error::Custom(_) => "custom",
		}
	}
}

impl From<HttpError> for Error {
	fn from(envelope: HttpError) -> Self {
		Error::Http(Box::new(envelope))
	}
}

/// Error envelope: the failure plus the request and response in flight when it happened
///
/// The stack wraps every non-envelope error coming out of a handler in one of
/// these, using the request and response that handler was called with.
/// Handlers can also raise one themselves (for example a 404) to pick the
/// status; the stack passes such errors through untouched.
///
/// # Examples
///
/// ```
/// use stackline_stack::{Error, HttpError};
/// use stackline_http::{Request, Response};
/// use http::StatusCode;
///
/// let request = Request::builder().uri("/missing").build().unwrap();
/// let error: Error = HttpError::new(request, Response::ok(), Error::Internal("no such page".into()))
///     .with_status(StatusCode::NOT_FOUND)
///     .into();
///
/// let envelope = error.as_http().unwrap();
/// assert_eq!(envelope.status(), StatusCode::NOT_FOUND);
/// assert_eq!(envelope.request().path(), "/missing");
/// assert_eq!(error.to_string(), "Internal error: no such page");
/// ```
#[derive(Debug)]
pub struct HttpError {
	status: StatusCode,
	request: Request,
	response: Response,
	source: Box<Error>,
}

impl HttpError {
	/// Create an envelope with status 500
	pub fn new(request: Request, response: Response, source: impl Into<Error>) -> Self {
		Self {
			status: StatusCode::INTERNAL_SERVER_ERROR,
			request,
			response,
			source: Box::new(source.into()),
		}
	}

	pub fn with_status(mut self, status: StatusCode) -> Self {
		self.status = status;
		self
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Request passed to the failing handler
	pub fn request(&self) -> &Request {
		&self.request
	}

	/// Response passed to the failing handler
	pub fn response(&self) -> &Response {
		&self.response
	}

	/// The wrapped error
	pub fn inner(&self) -> &Error {
		&self.source
	}

	/// Innermost non-envelope error
	pub fn root_cause(&self) -> &Error {
		let mut current: &Error = &self.source;
		while let Error::Http(envelope) = current {
			current = &envelope.source;
		}
		current
	}

	pub fn into_parts(self) -> (Request, Response, Error) {
		(self.request, self.response, *self.source)
	}
}

impl fmt::Display for HttpError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.source)
	}
}

impl std::error::Error for HttpError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(self.source.as_ref())
	}
}
