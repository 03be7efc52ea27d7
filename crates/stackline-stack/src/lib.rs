//! # Stackline Stack
//!
//! Middleware dispatch for stackline: a queue of handlers run against one
//! request/response pair, onion style.
//!
//! ## Overview
//!
//! - Entries are added to the **front** of the queue. The entry added last
//!   runs first and wraps everything added before it; the kernel always runs
//!   last.
//! - Each handler gets a [`Next`] continuation. Awaiting it runs the rest of
//!   the queue and returns the inner response.
//! - Entries that are only a name are resolved through a chain of
//!   [`Resolver`]s, for example a [`HandlerRegistry`].
//! - Errors coming out of a handler are wrapped once in an [`HttpError`]
//!   carrying the request and response that handler was given. Errors that
//!   already carry that context pass through untouched.
//!
//! ## Architecture
//!
//! ```text
//! run(req, res) ─▶ [B] ──next──▶ [A] ──next──▶ [kernel]
//!                   │             │               │
//!        res ◀──────┘◀────────────┘◀──────────────┘
//! ```
//!
//! ## Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use stackline_http::{Request, Response};
//! use stackline_stack::{Handler, Next, Reply, Result, Stack};
//!
//! struct Letter(&'static str);
//!
//! #[async_trait]
//! impl Handler for Letter {
//!     async fn handle(&self, request: Request, response: Response, next: Next) -> Result<Reply> {
//!         let response = next.run(request, response.append_body(self.0)).await?;
//!         Ok(response.append_body(self.0).into())
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let stack = Stack::default();
//! stack.add_front(Letter("a")).unwrap();
//! stack.add_front(Letter("b")).unwrap();
//!
//! let request = Request::builder().uri("/").build().unwrap();
//! let response = stack.run(request, Response::ok()).await.unwrap();
//! assert_eq!(response.body_text(), "baab");
//! # });
//! ```

pub mod entry;
pub mod error;
pub mod error_middleware;
pub mod handler;
pub mod middleware;
pub mod registry;
pub mod renderer;
pub mod stack;

// Re-exports
pub use entry::{Entry, Resolver};
pub use error::{Error, HttpError, Result};
pub use error_middleware::ErrorMiddleware;
pub use handler::{Handler, HandlerFn, Next, Reply, handler_fn};
pub use middleware::{Middleware, RequestHandler, SinglePass};
pub use registry::HandlerRegistry;
pub use renderer::ErrorRenderer;
pub use stack::Stack;
