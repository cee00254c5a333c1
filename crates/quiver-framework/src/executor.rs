//! Command executors.
//!
//! A command's behaviour is either a plain async function or an object
//! implementing [`CommandExecutor`]. Both are normalised into the
//! [`Executor`] variant once, at registration time, and invoked uniformly:
//!
//! ```rust,ignore
//! // Function executor: any async closure returning a handler result.
//! let ping = Executor::function(|sender: User, _args: Arguments, _label: String| async move {
//!     println!("pong for {}", sender.name);
//! });
//!
//! // Object executor: a type with state.
//! struct Counter(AtomicUsize);
//!
//! #[async_trait]
//! impl CommandExecutor<User> for Counter {
//!     async fn execute(&self, _sender: User, _args: Arguments, _label: String) -> HandlerResult {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!         Ok(true)
//!     }
//! }
//! let count = Executor::object(Counter(AtomicUsize::new(0)));
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use futures::future::BoxFuture;
use tower::BoxError;

use quiver_core::Arguments;

/// The result of running a handler: `Ok(true)` on success, `Ok(false)` when
/// the handler declined (e.g. bad usage), `Err` on failure.
pub type HandlerResult = Result<bool, BoxError>;

// ============================================================================
// IntoHandlerResult
// ============================================================================

/// Types that function executors may return.
pub trait IntoHandlerResult: Send + 'static {
    fn into_handler_result(self) -> HandlerResult;
}

/// `()` counts as success.
impl IntoHandlerResult for () {
    fn into_handler_result(self) -> HandlerResult {
        Ok(true)
    }
}

impl IntoHandlerResult for bool {
    fn into_handler_result(self) -> HandlerResult {
        Ok(self)
    }
}

impl<T, E> IntoHandlerResult for Result<T, E>
where
    T: IntoHandlerResult,
    E: Into<BoxError> + Send + 'static,
{
    fn into_handler_result(self) -> HandlerResult {
        match self {
            Ok(value) => value.into_handler_result(),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Executors
// ============================================================================

/// An object that executes a command.
#[async_trait]
pub trait CommandExecutor<S>: Send + Sync + 'static {
    /// Runs the command for `sender`. `label` is the name or alias the
    /// sender typed.
    async fn execute(&self, sender: S, args: Arguments, label: String) -> HandlerResult;
}

/// A type-erased function executor.
pub type HandlerFn<S> =
    Arc<dyn Fn(S, Arguments, String) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// A command's executor, resolved once at registration.
pub enum Executor<S> {
    /// A plain async function.
    Function(HandlerFn<S>),
    /// An object implementing [`CommandExecutor`].
    Object(Arc<dyn CommandExecutor<S>>),
}

impl<S> Clone for Executor<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Function(f) => Self::Function(Arc::clone(f)),
            Self::Object(o) => Self::Object(Arc::clone(o)),
        }
    }
}

impl<S> std::fmt::Debug for Executor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function(_) => f.write_str("Executor::Function"),
            Self::Object(_) => f.write_str("Executor::Object"),
        }
    }
}

impl<S: Send + 'static> Executor<S> {
    /// Wraps an async function.
    pub fn function<F, Fut, R>(f: F) -> Self
    where
        F: Fn(S, Arguments, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoHandlerResult,
    {
        Self::Function(Arc::new(move |sender: S, args: Arguments, label: String| {
            f(sender, args, label).map(R::into_handler_result).boxed()
        }))
    }

    /// Wraps an executor object.
    pub fn object<E: CommandExecutor<S>>(executor: E) -> Self {
        Self::Object(Arc::new(executor))
    }

    /// Runs the executor.
    pub fn invoke(
        &self,
        sender: S,
        args: Arguments,
        label: String,
    ) -> BoxFuture<'static, HandlerResult> {
        match self {
            Self::Function(f) => f(sender, args, label),
            Self::Object(executor) => {
                let executor = Arc::clone(executor);
                async move { executor.execute(sender, args, label).await }.boxed()
            }
        }
    }
}

impl<S, E: CommandExecutor<S>> From<Arc<E>> for Executor<S> {
    fn from(executor: Arc<E>) -> Self {
        Self::Object(executor)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counter(AtomicUsize);

    #[async_trait]
    impl CommandExecutor<String> for Counter {
        async fn execute(&self, sender: String, args: Arguments, label: String) -> HandlerResult {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(sender == "alice" && label == "count" && args.is_empty())
        }
    }

    #[tokio::test]
    async fn test_function_executor() {
        let executor =
            Executor::function(|sender: String, args: Arguments, _label: String| async move {
                sender.len() == args.len()
            });
        let ok = executor
            .invoke("ab".into(), Arguments::new(["x", "y"]), "len".into())
            .await;
        assert!(ok.unwrap());
    }

    #[tokio::test]
    async fn test_function_executor_error() {
        let executor = Executor::function(|_: String, _: Arguments, _: String| async move {
            Err::<(), _>("boom")
        });
        let result = executor
            .invoke(String::new(), Arguments::default(), String::new())
            .await;
        assert_eq!(result.unwrap_err().to_string(), "boom");
    }

    #[tokio::test]
    async fn test_object_executor() {
        let counter = Arc::new(Counter(AtomicUsize::new(0)));
        let executor: Executor<String> = Executor::from(Arc::clone(&counter));
        let result = executor
            .invoke("alice".into(), Arguments::default(), "count".into())
            .await;
        assert!(result.unwrap());
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
    }
}
