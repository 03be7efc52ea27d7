//! Handler contract and the continuation passed to every handler.

use crate::error::{Error, Result};
use crate::stack::Stack;
use async_trait::async_trait;
use serde_json::Value;
use stackline_http::{Request, Response};
use std::future::Future;
use std::sync::Arc;

/// A unit of request handling inside a [`Stack`].
///
/// Handlers receive the request, the response built so far, and a [`Next`]
/// continuation. Calling `next.run(..)` runs the rest of the stack and hands
/// back its response, so work can happen both before and after delegating.
/// Not calling it ends the chain at this handler.
///
/// ```rust
/// use async_trait::async_trait;
/// use stackline_http::{Request, Response};
/// use stackline_stack::{Handler, Next, Reply, Result};
///
/// struct Timing;
///
/// #[async_trait]
/// impl Handler for Timing {
///     async fn handle(&self, request: Request, response: Response, next: Next) -> Result<Reply> {
///         let started = std::time::Instant::now();
///         let response = next.run(request, response).await?;
///         let elapsed = started.elapsed().as_millis().to_string();
///         Ok(response.with_header("x-elapsed-ms", &elapsed).into())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles the request and produces a reply.
	///
	/// # Errors
	///
	/// Any error returned here reaches the caller of [`Stack::run`], wrapped
	/// in an [`HttpError`](crate::HttpError) unless it already is one.
	async fn handle(&self, request: Request, response: Response, next: Next) -> Result<Reply>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request, response: Response, next: Next) -> Result<Reply> {
		(**self).handle(request, response, next).await
	}
}

/// What a handler hands back to the stack
///
/// Only [`Reply::Response`] satisfies the handler contract. A handler that
/// produces raw data instead makes the run fail with
/// [`Error::ContractViolation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
	Response(Response),
	Value(Value),
}

impl Reply {
	/// Extract the response, failing on any other value
	pub fn into_response(self) -> Result<Response> {
		match self {
			Reply::Response(response) => Ok(response),
			Reply::Value(value) => Err(Error::ContractViolation(describe(&value))),
		}
	}
}

impl From<Response> for Reply {
	fn from(response: Response) -> Self {
		Reply::Response(response)
	}
}

fn describe(value: &Value) -> String {
	let kind = match value {
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	};
	format!("a JSON {}", kind)
}

/// Continuation bound to the rest of the stack
///
/// Consumed by [`Next::run`], so each handler can delegate at most once.
pub struct Next {
	stack: Stack,
}

impl Next {
	pub(crate) fn new(stack: Stack) -> Self {
		Self { stack }
	}

	/// Run the remaining entries with the given request and response.
	///
	/// With nothing left in the queue this returns `response` unchanged.
	pub async fn run(self, request: Request, response: Response) -> Result<Response> {
		self.stack.execute(request, response).await
	}

	/// Number of entries still waiting behind this continuation
	pub fn remaining(&self) -> usize {
		self.stack.len()
	}
}

/// Handler built from an async closure, see [`handler_fn`]
pub struct HandlerFn<F> {
	f: F,
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
	F: Fn(Request, Response, Next) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Reply>> + Send + 'static,
{
	async fn handle(&self, request: Request, response: Response, next: Next) -> Result<Reply> {
		(self.f)(request, response, next).await
	}
}

/// Turn an async closure into a [`Handler`]
///
/// # Examples
///
/// ```
/// use stackline_http::{Request, Response};
/// use stackline_stack::{Error, Next, Reply, Stack, handler_fn};
///
/// # tokio_test::block_on(async {
/// let stack = Stack::default();
/// stack
///     .add_front(handler_fn(|request: Request, response: Response, next: Next| async move {
///         let response = next.run(request, response.append_body("in ")).await?;
///         Ok::<Reply, Error>(response.append_body("out").into())
///     }))
///     .unwrap();
///
/// let request = Request::builder().uri("/").build().unwrap();
/// let response = stack.run(request, Response::ok()).await.unwrap();
/// assert_eq!(response.body_text(), "in out");
/// # });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
	F: Fn(Request, Response, Next) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Reply>> + Send + 'static,
{
	HandlerFn { f }
}
