use crate::ActionError;
use async_trait::async_trait;
use micro_message::protocol::{BoxError, Response, ServerRequest};
use std::fmt;
use std::sync::Arc;

/// One step of a [`ServerActions`](crate::ServerActions) chain.
///
/// Receives the request and the response produced by the step before it,
/// `None` for the first step, and returns the response to hand on.
#[async_trait]
pub trait ServerAction<B>: Send + Sync {
    async fn call(&self, request: &ServerRequest<B>, previous: Option<Response>) -> Result<Response, ActionError>;
}

#[async_trait]
impl<B, A> ServerAction<B> for Arc<A>
where
    B: Send + Sync,
    A: ServerAction<B> + ?Sized,
{
    async fn call(&self, request: &ServerRequest<B>, previous: Option<Response>) -> Result<Response, ActionError> {
        (**self).call(request, previous).await
    }
}

/// a plain synchronous function used as a [`ServerAction`]
pub struct FnAction<F> {
    f: F,
}

pub fn action_fn<B, F>(f: F) -> FnAction<F>
where
    F: Fn(&ServerRequest<B>, Option<Response>) -> Result<Response, BoxError> + Send + Sync,
{
    FnAction { f }
}

#[async_trait]
impl<B, F> ServerAction<B> for FnAction<F>
where
    B: Send + Sync,
    F: Fn(&ServerRequest<B>, Option<Response>) -> Result<Response, BoxError> + Send + Sync,
{
    async fn call(&self, request: &ServerRequest<B>, previous: Option<Response>) -> Result<Response, ActionError> {
        (self.f)(request, previous).map_err(ActionError::from)
    }
}

impl<F> fmt::Debug for FnAction<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").finish_non_exhaustive()
    }
}
