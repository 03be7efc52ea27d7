//! Stack entries and the resolvers that turn named entries into handlers.

use crate::handler::Handler;
use std::fmt;
use std::sync::Arc;

/// One item in a stack's queue
#[derive(Clone)]
pub enum Entry {
	/// Directly invocable handler
	Handler(Arc<dyn Handler>),
	/// Opaque name, turned into a handler by a [`Resolver`] when its turn comes
	Named(String),
}

impl Entry {
	pub fn named(name: impl Into<String>) -> Self {
		Entry::Named(name.into())
	}

	/// The name of a named entry
	pub fn name(&self) -> Option<&str> {
		match self {
			Entry::Named(name) => Some(name),
			Entry::Handler(_) => None,
		}
	}

	pub fn is_handler(&self) -> bool {
		matches!(self, Entry::Handler(_))
	}
}

impl<H: Handler + 'static> From<H> for Entry {
	fn from(handler: H) -> Self {
		Entry::Handler(Arc::new(handler))
	}
}

impl From<&str> for Entry {
	fn from(name: &str) -> Self {
		Entry::Named(name.to_string())
	}
}

impl From<String> for Entry {
	fn from(name: String) -> Self {
		Entry::Named(name)
	}
}

impl fmt::Debug for Entry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Entry::Handler(_) => f.write_str("Entry::Handler(..)"),
			Entry::Named(name) => f.debug_tuple("Entry::Named").field(name).finish(),
		}
	}
}

impl fmt::Display for Entry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Entry::Handler(_) => f.write_str("<handler>"),
			Entry::Named(name) => f.write_str(name),
		}
	}
}

/// Turns an entry that is not directly invocable into a handler.
///
/// Resolvers are tried in the order they were added to the stack; the first
/// one returning `Some` wins. Closures of the right shape are resolvers:
///
/// ```rust
/// use std::sync::Arc;
/// use stackline_stack::{Entry, Handler, Resolver};
///
/// let nothing = |_entry: &Entry| -> Option<Arc<dyn Handler>> { None };
/// assert!(nothing.resolve(&Entry::named("auth")).is_none());
/// ```
pub trait Resolver: Send + Sync {
	fn resolve(&self, entry: &Entry) -> Option<Arc<dyn Handler>>;
}

impl<F> Resolver for F
where
	F: Fn(&Entry) -> Option<Arc<dyn Handler>> + Send + Sync,
{
	fn resolve(&self, entry: &Entry) -> Option<Arc<dyn Handler>> {
		self(entry)
	}
}
