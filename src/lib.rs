//! # Stackline
//!
//! Onion-style middleware dispatch for request/response pipelines.
//!
//! A [`Stack`] holds a queue of handlers. The handler added last runs first,
//! receives a continuation for the rest of the queue, and decides whether and
//! how to call it. The kernel passed at construction runs last.
//!
//! ## Crates
//!
//! - [`http`] - the [`Request`] and [`Response`] values handlers pass along
//! - [`stack`] - the runner, handler traits, resolvers and error rendering
//! - [`conf`] - settings for error reporting and logging initialisation
//!
//! ## Quick Example
//!
//! ```rust
//! use stackline::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let registry = HandlerRegistry::new();
//! registry.register(
//!     "greeting",
//!     handler_fn(|request: Request, response: Response, next: Next| async move {
//!         let response = next.run(request, response.append_body("hello ")).await?;
//!         Ok::<Reply, Error>(response.into())
//!     }),
//! );
//!
//! let kernel = handler_fn(|_request: Request, response: Response, _next: Next| async move {
//!     Ok::<Reply, Error>(response.append_body("world").into())
//! });
//!
//! let stack = Stack::new(Some(kernel.into()), Vec::new());
//! stack.add_resolver(registry);
//! stack.add_front("greeting").unwrap();
//! stack.add_front(ErrorMiddleware::new(&Settings::default())).unwrap();
//!
//! let request = Request::builder().uri("/").build().unwrap();
//! let response = stack.run(request, Response::ok()).await.unwrap();
//! assert_eq!(response.body_text(), "hello world");
//! # });
//! ```

pub mod conf;
pub mod http;
pub mod stack;

// Re-export the main types
pub use stackline_conf::{ErrorFormat, Settings, SettingsError, init_logging};
pub use stackline_http::{Request, RequestBuilder, Response};
pub use stackline_stack::{
	Entry, Error, ErrorMiddleware, ErrorRenderer, Handler, HandlerRegistry, HttpError, Next, Reply,
	Resolver, Result, Stack, handler_fn,
};

// Re-export async_trait for implementing Handler and Middleware
pub use async_trait::async_trait;

/// Prelude module for convenient imports
pub mod prelude {
	pub use crate::{
		Entry, Error, ErrorFormat, ErrorMiddleware, Handler, HandlerRegistry, HttpError, Next,
		Reply, Request, Resolver, Response, Result, Settings, Stack, handler_fn,
	};
	pub use stackline_stack::{Middleware, RequestHandler, SinglePass};

	pub use async_trait::async_trait;
}
