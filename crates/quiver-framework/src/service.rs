//! Tower integration.
//!
//! [`CommandRegistry`] implements [`tower::Service`] for [`CommandRequest`],
//! so it can be wrapped in tower middleware or driven through
//! [`ServiceExt`](tower::ServiceExt) like any other service. The response is
//! the immediate [`DispatchOutcome`]; the handler itself still runs on a
//! spawned task.

use std::convert::Infallible;
use std::task::{Context, Poll};

use futures::future::{Ready, ready};
use tower::Service;

use crate::registry::{CommandRegistry, DispatchOutcome};
use crate::tokenizer::Invocation;

/// A request to run a command by name.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandRequest<S> {
    pub sender: S,
    pub name: String,
    pub tokens: Vec<String>,
}

impl<S> CommandRequest<S> {
    pub fn new<I, T>(sender: S, name: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            sender,
            name: name.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a request from a tokenized input line.
    pub fn from_invocation(sender: S, invocation: Invocation) -> Self {
        Self {
            sender,
            name: invocation.name,
            tokens: invocation.tokens,
        }
    }
}

impl<S: Clone + Send + Sync + 'static> Service<CommandRequest<S>> for CommandRegistry<S> {
    type Response = DispatchOutcome;
    type Error = Infallible;
    type Future = Ready<Result<DispatchOutcome, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: CommandRequest<S>) -> Self::Future {
        ready(Ok(self.execute_name(request.sender, &request.name, request.tokens)))
    }
}
