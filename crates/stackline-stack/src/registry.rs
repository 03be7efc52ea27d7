//! Name-based handler lookup.

use crate::entry::{Entry, Resolver};
use crate::handler::Handler;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of named handlers, usable as a [`Resolver`]
///
/// Names may use `service:action` notation. Such a name is looked up as a
/// whole first, then by its `service` part, so one handler can serve several
/// actions.
///
/// The registry is a shared handle; handlers registered after it was added
/// to a stack are still found.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use stackline_http::{Request, Response};
/// use stackline_stack::{Handler, HandlerRegistry, Next, Reply, Result, Stack};
///
/// struct Csrf;
///
/// #[async_trait]
/// impl Handler for Csrf {
///     async fn handle(&self, request: Request, response: Response, next: Next) -> Result<Reply> {
///         Ok(next.run(request, response.with_header("x-csrf", "checked")).await?.into())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let registry = HandlerRegistry::new();
/// let stack = Stack::default();
/// stack.add_resolver(registry.clone());
/// stack.add_front("csrf").unwrap();
/// registry.register("csrf", Csrf);
///
/// let request = Request::builder().uri("/").build().unwrap();
/// let response = stack.run(request, Response::ok()).await.unwrap();
/// assert_eq!(response.headers.get("x-csrf").unwrap(), "checked");
/// # });
/// ```
#[derive(Clone, Default)]
pub struct HandlerRegistry {
	handlers: Arc<RwLock<HashMap<String, Arc<dyn Handler>>>>,
}

impl HandlerRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a handler under `name`, replacing any previous one
	pub fn register(&self, name: impl Into<String>, handler: impl Handler + 'static) {
		self.register_arc(name, Arc::new(handler));
	}

	/// Register an already shared handler
	pub fn register_arc(&self, name: impl Into<String>, handler: Arc<dyn Handler>) {
		self.handlers.write().insert(name.into(), handler);
	}

	/// Look a name up, honouring `service:action` notation
	pub fn get(&self, name: &str) -> Option<Arc<dyn Handler>> {
		let handlers = self.handlers.read();
		if let Some(handler) = handlers.get(name) {
			return Some(handler.clone());
		}
		let (service, _action) = name.split_once(':')?;
		handlers.get(service).cloned()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	pub fn len(&self) -> usize {
		self.handlers.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Resolver for HandlerRegistry {
	fn resolve(&self, entry: &Entry) -> Option<Arc<dyn Handler>> {
		self.get(entry.name()?)
	}
}
