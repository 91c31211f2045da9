//! Actions that work on bound state instead of call arguments.
//!
//! A [`BoundAction`] receives an [`ActionState`] that the caller has bound
//! the incoming request and, optionally, the previous response to. The
//! [`bound`] adapter turns such an action into a regular [`ServerAction`]
//! so it can take part in a chain.

use crate::{ActionError, ServerAction};
use async_trait::async_trait;
use micro_message::protocol::{Response, ServerRequest};
use std::fmt;

/// The request and previous response bound to one invocation.
pub struct ActionState<'a, B> {
    request: Option<&'a ServerRequest<B>>,
    previous: Option<Response>,
}

impl<'a, B> ActionState<'a, B> {
    pub fn new() -> Self {
        Self { request: None, previous: None }
    }

    #[must_use]
    pub fn bind_request(mut self, request: &'a ServerRequest<B>) -> Self {
        self.request = Some(request);
        self
    }

    #[must_use]
    pub fn bind_previous_response(mut self, response: Response) -> Self {
        self.previous = Some(response);
        self
    }

    /// The bound request; fails with [`ActionError::InvalidRequest`] when none was bound.
    pub fn request(&self) -> Result<&'a ServerRequest<B>, ActionError> {
        self.request.ok_or(ActionError::InvalidRequest)
    }

    pub fn previous_response(&self) -> Option<&Response> {
        self.previous.as_ref()
    }

    pub fn take_previous_response(&mut self) -> Option<Response> {
        self.previous.take()
    }
}

impl<B> Default for ActionState<'_, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for ActionState<'_, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionState")
            .field("request", &self.request.map(|request| request.uri().to_string()))
            .field("previous", &self.previous.as_ref().map(Response::status))
            .finish()
    }
}

#[async_trait]
pub trait BoundAction<B>: Send + Sync {
    async fn handle(&self, state: ActionState<'_, B>) -> Result<Response, ActionError>;
}

/// Adapts a [`BoundAction`] to [`ServerAction`] by binding the call arguments.
#[derive(Debug)]
pub struct Bound<A> {
    action: A,
}

pub fn bound<A>(action: A) -> Bound<A> {
    Bound { action }
}

#[async_trait]
impl<B, A> ServerAction<B> for Bound<A>
where
    B: Send + Sync,
    A: BoundAction<B>,
{
    async fn call(&self, request: &ServerRequest<B>, previous: Option<Response>) -> Result<Response, ActionError> {
        let mut state = ActionState::new().bind_request(request);
        if let Some(previous) = previous {
            state = state.bind_previous_response(previous);
        }
        self.action.handle(state).await
    }
}
