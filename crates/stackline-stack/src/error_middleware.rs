//! Outermost handler that turns pipeline errors into error responses.

use crate::error::{Error, Result};
use crate::handler::{Handler, Next, Reply};
use crate::renderer::{ErrorRenderer, error_chain};
use async_trait::async_trait;
use stackline_conf::Settings;
use stackline_http::{Request, Response};
use tracing::error;

/// Turns errors from the rest of the stack into rendered error responses.
///
/// Add it last so it wraps every other entry. The response format follows
/// the `Accept` header of the failing request.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use http::StatusCode;
/// use stackline_conf::Settings;
/// use stackline_http::{Request, Response};
/// use stackline_stack::{Error, ErrorMiddleware, Handler, Next, Reply, Result, Stack};
///
/// struct Broken;
///
/// #[async_trait]
/// impl Handler for Broken {
///     async fn handle(&self, _request: Request, _response: Response, _next: Next) -> Result<Reply> {
///         Err(Error::Internal("database unavailable".to_string()))
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let stack = Stack::new(Some(Broken.into()), Vec::new());
/// stack.add_front(ErrorMiddleware::new(&Settings::default())).unwrap();
///
/// let request = Request::builder().uri("/").header("accept", "text/plain").build().unwrap();
/// let response = stack.run(request, Response::ok()).await.unwrap();
/// assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
/// assert!(response.body_text().starts_with("500 Internal Server Error"));
/// # });
/// ```
pub struct ErrorMiddleware {
	renderer: ErrorRenderer,
	log_errors: bool,
	log_error_details: bool,
}

impl ErrorMiddleware {
	pub fn new(settings: &Settings) -> Self {
		Self {
			renderer: ErrorRenderer::from_settings(settings),
			log_errors: settings.log_errors,
			log_error_details: settings.log_error_details,
		}
	}

	/// Replace the renderer
	pub fn with_renderer(mut self, renderer: ErrorRenderer) -> Self {
		self.renderer = renderer;
		self
	}

	fn log(&self, err: &Error) {
		if !self.log_errors {
			return;
		}

		let status = err.status().as_u16();
		let path = err.as_http().map(|envelope| envelope.request().path());
		if self.log_error_details {
			error!(status, path, error = %err, chain = ?error_chain(err), "request failed");
		} else {
			error!(status, path, error = %err, "request failed");
		}
	}
}

#[async_trait]
impl Handler for ErrorMiddleware {
	async fn handle(&self, request: Request, response: Response, next: Next) -> Result<Reply> {
		let accept = request.header("accept").map(str::to_owned);

		match next.run(request, response).await {
			Ok(response) => Ok(response.into()),
			Err(err) => {
				self.log(&err);
				let accept = err
					.as_http()
					.and_then(|envelope| envelope.request().header("accept"))
					.or(accept.as_deref());
				Ok(self.renderer.render_for(&err, accept).into())
			}
		}
	}
}
