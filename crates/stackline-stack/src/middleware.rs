//! Single-pass middleware.
//!
//! A [`Handler`] sees the request, the response built so far and the
//! continuation. Many middleware only care about the request and the
//! response that comes back from the rest of the chain; those implement
//! [`Middleware`] instead and are put on a stack through [`SinglePass`].
//!
//! ```rust
//! use async_trait::async_trait;
//! use stackline_http::{Request, Response};
//! use stackline_stack::{Middleware, RequestHandler, Result, SinglePass, Stack};
//!
//! struct PoweredBy;
//!
//! #[async_trait]
//! impl Middleware for PoweredBy {
//!     async fn process(&self, request: Request, next: RequestHandler) -> Result<Response> {
//!         let response = next.handle(request).await?;
//!         Ok(response.with_header("x-powered-by", "stackline"))
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let stack = Stack::default();
//! stack.add_front(SinglePass::new(PoweredBy)).unwrap();
//!
//! let request = Request::builder().uri("/").build().unwrap();
//! let response = stack.run(request, Response::ok()).await.unwrap();
//! assert_eq!(response.headers.get("x-powered-by").unwrap(), "stackline");
//! # });
//! ```

use crate::error::Result;
use crate::handler::{Handler, Next, Reply};
use async_trait::async_trait;
use stackline_http::{Request, Response};

/// Middleware that only sees the request on the way in
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request, usually by delegating to `next`.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or the rest of the chain fails.
	async fn process(&self, request: Request, next: RequestHandler) -> Result<Response>;
}

/// Continuation given to a [`Middleware`]
///
/// Carries the response that was in flight when the middleware was reached,
/// so the rest of the stack keeps building on it.
pub struct RequestHandler {
	next: Next,
	response: Response,
}

impl RequestHandler {
	/// Run the rest of the stack with `request`
	pub async fn handle(self, request: Request) -> Result<Response> {
		self.next.run(request, self.response).await
	}
}

/// Adapter that lets a [`Middleware`] sit in a stack as a [`Handler`]
pub struct SinglePass<M> {
	middleware: M,
}

impl<M: Middleware> SinglePass<M> {
	pub fn new(middleware: M) -> Self {
		Self { middleware }
	}
}

#[async_trait]
impl<M: Middleware> Handler for SinglePass<M> {
	async fn handle(&self, request: Request, response: Response, next: Next) -> Result<Reply> {
		self.middleware
			.process(request, RequestHandler { next, response })
			.await
			.map(Reply::from)
	}
}
