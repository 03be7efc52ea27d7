//! The stack runner.

use crate::entry::{Entry, Resolver};
use crate::error::{Error, HttpError, Result};
use crate::handler::{Handler, Next};
use parking_lot::{Mutex, RwLock};
use stackline_http::{Request, Response};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// Runs a queue of handlers against one request/response pair.
///
/// Entries are added to the front of the queue, so the entry added last runs
/// first and wraps everything added before it. The kernel given to
/// [`Stack::new`] always runs last.
///
/// `Stack` is a shared handle: clones see the same queue, resolvers and
/// running flag. One stack serves one request at a time; concurrent calls to
/// [`Stack::run`] on the same stack are not supported.
///
/// The queue is drained by a run and there is no reset. Running again
/// without adding entries returns the given response unchanged.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use stackline_http::{Request, Response};
/// use stackline_stack::{Handler, Next, Reply, Result, Stack};
///
/// struct Hello;
///
/// #[async_trait]
/// impl Handler for Hello {
///     async fn handle(&self, _request: Request, response: Response, _next: Next) -> Result<Reply> {
///         Ok(response.with_body("Hello!").into())
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let stack = Stack::new(Some(Hello.into()), Vec::new());
/// let request = Request::builder().uri("/").build().unwrap();
///
/// let response = stack.run(request, Response::ok()).await.unwrap();
/// assert_eq!(response.body_text(), "Hello!");
/// # });
/// ```
#[derive(Clone, Default)]
pub struct Stack {
	inner: Arc<StackInner>,
}

#[derive(Default)]
struct StackInner {
	queue: Mutex<VecDeque<Entry>>,
	resolvers: RwLock<Vec<Arc<dyn Resolver>>>,
	running: AtomicBool,
}

impl Stack {
	/// Create a stack with an optional innermost kernel and an initial resolver chain
	pub fn new(kernel: Option<Entry>, resolvers: Vec<Arc<dyn Resolver>>) -> Self {
		let queue: VecDeque<Entry> = kernel.into_iter().collect();
		Self {
			inner: Arc::new(StackInner {
				queue: Mutex::new(queue),
				resolvers: RwLock::new(resolvers),
				running: AtomicBool::new(false),
			}),
		}
	}

	/// Prepend an entry; it will run before everything already queued.
	///
	/// # Errors
	///
	/// Returns [`Error::Locked`] while the stack is running.
	pub fn add_front(&self, entry: impl Into<Entry>) -> Result<()> {
		self.ensure_idle()?;
		self.inner.queue.lock().push_front(entry.into());
		Ok(())
	}

	/// Prepend several entries, one at a time, in iteration order.
	///
	/// Same as calling [`Stack::add_front`] for each element, so the last
	/// element of the batch ends up running first.
	///
	/// # Errors
	///
	/// Returns [`Error::Locked`] while the stack is running; nothing is added
	/// in that case.
	pub fn add_front_batch<I, E>(&self, entries: I) -> Result<()>
	where
		I: IntoIterator<Item = E>,
		E: Into<Entry>,
	{
		self.ensure_idle()?;
		// The iterator may call back into this stack, so drain it before locking
		let entries: Vec<Entry> = entries.into_iter().map(Into::into).collect();
		let mut queue = self.inner.queue.lock();
		for entry in entries {
			queue.push_front(entry);
		}
		Ok(())
	}

	/// Append a resolver to the end of the resolver chain
	pub fn add_resolver(&self, resolver: impl Resolver + 'static) {
		self.inner.resolvers.write().push(Arc::new(resolver));
	}

	/// Number of entries waiting to run
	pub fn len(&self) -> usize {
		self.inner.queue.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether a run is in progress
	pub fn is_running(&self) -> bool {
		self.inner.running.load(Ordering::SeqCst)
	}

	/// Run the queued entries and return the final response.
	///
	/// The running flag is cleared again when this returns, whether the run
	/// succeeded, failed, panicked or was dropped half way. A failed run
	/// still leaves the queue partially consumed.
	///
	/// # Errors
	///
	/// - [`Error::Unresolvable`] when an entry cannot be turned into a handler
	/// - [`Error::ContractViolation`] when a handler replies with something
	///   other than a response
	/// - [`Error::Http`] wrapping whatever a handler failed with, together
	///   with the request and response that handler received
	pub async fn run(&self, request: Request, response: Response) -> Result<Response> {
		self.inner.running.store(true, Ordering::SeqCst);
		let _idle = scopeguard::guard(&self.inner.running, |running| {
			running.store(false, Ordering::SeqCst);
		});

		debug!(entries = self.len(), path = request.path(), "running stack");
		let result = self.execute(request, response).await;
		match &result {
			Ok(response) => debug!(status = %response.status, "stack finished"),
			Err(error) => debug!(kind = error.kind(), %error, "stack failed"),
		}
		result
	}

	/// Pop the front entry and run it; the continuation handed to it calls back in here.
	pub(crate) async fn execute(&self, request: Request, response: Response) -> Result<Response> {
		let entry = self.inner.queue.lock().pop_front();
		let Some(entry) = entry else {
			return Ok(response);
		};

		let handler = self.resolve(entry)?;
		let context = (request.clone(), response.clone());
		trace!(remaining = self.len(), "executing entry");

		match handler.handle(request, response, Next::new(self.clone())).await {
			Ok(reply) => reply.into_response(),
			Err(error @ Error::Http(_)) => Err(error),
			Err(error) => {
				debug!(kind = error.kind(), "attaching request context to handler error");
				let (request, response) = context;
				Err(HttpError::new(request, response, error).into())
			}
		}
	}

	fn resolve(&self, entry: Entry) -> Result<Arc<dyn Handler>> {
		if let Entry::Handler(handler) = entry {
			return Ok(handler);
		}

		let resolved = self
			.inner
			.resolvers
			.read()
			.iter()
			.find_map(|resolver| resolver.resolve(&entry));
		resolved.ok_or_else(|| Error::Unresolvable(entry.to_string()))
	}

	fn ensure_idle(&self) -> Result<()> {
		if self.is_running() {
			return Err(Error::Locked);
		}
		Ok(())
	}
}
