use crate::{ActionError, ServerAction};
use async_trait::async_trait;
use micro_message::protocol::{Response, ServerRequest};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// An ordered chain of [`ServerAction`]s.
///
/// Every action receives the request and the response of the action before
/// it; the response of the last action is the result. The first failure
/// ends the chain and is returned unchanged.
///
/// The chain is meant to be assembled once, then invoked concurrently
/// through a shared reference.
pub struct ServerActions<B> {
    actions: Vec<Arc<dyn ServerAction<B>>>,
}

impl<B> ServerActions<B>
where
    B: Send + Sync,
{
    pub fn new(actions: Vec<Arc<dyn ServerAction<B>>>) -> Self {
        Self { actions }
    }

    pub fn add_first<A: ServerAction<B> + 'static>(&mut self, action: A) -> &mut Self {
        self.actions.insert(0, Arc::new(action));
        self
    }

    pub fn add_last<A: ServerAction<B> + 'static>(&mut self, action: A) -> &mut Self {
        self.actions.push(Arc::new(action));
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Runs every action in order and returns the last response.
    ///
    /// Fails with [`ActionError::EmptyActions`] when the chain has no actions.
    pub async fn invoke(&self, request: &ServerRequest<B>) -> Result<Response, ActionError> {
        self.fold(request, None).await
    }

    async fn fold(&self, request: &ServerRequest<B>, previous: Option<Response>) -> Result<Response, ActionError> {
        let mut actions = self.actions.iter();
        let Some(first) = actions.next() else {
            return Err(ActionError::EmptyActions);
        };

        debug!(actions = self.actions.len(), uri = %request.uri(), "invoking server actions");

        trace!(index = 0, "invoking server action");
        let mut response = first.call(request, previous).await?;
        for (index, action) in actions.enumerate() {
            trace!(index = index + 1, "invoking server action");
            response = action.call(request, Some(response)).await?;
        }
        Ok(response)
    }
}

/// A chain used as a single action: the response it receives seeds the
/// first of its own actions.
#[async_trait]
impl<B> ServerAction<B> for ServerActions<B>
where
    B: Send + Sync,
{
    async fn call(&self, request: &ServerRequest<B>, previous: Option<Response>) -> Result<Response, ActionError> {
        self.fold(request, previous).await
    }
}

impl<B> FromIterator<Arc<dyn ServerAction<B>>> for ServerActions<B> {
    fn from_iter<T: IntoIterator<Item = Arc<dyn ServerAction<B>>>>(iter: T) -> Self {
        Self { actions: iter.into_iter().collect() }
    }
}

impl<B> Default for ServerActions<B> {
    fn default() -> Self {
        Self { actions: vec![] }
    }
}

impl<B> Clone for ServerActions<B> {
    fn clone(&self) -> Self {
        Self { actions: self.actions.clone() }
    }
}

impl<B> fmt::Debug for ServerActions<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerActions").field("len", &self.actions.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_fn;
    use http::{HeaderMap, Method};
    use micro_message::env::ServerParams;
    use micro_message::protocol::{ResponseBody, Uri};

    struct Append(&'static str);

    #[async_trait]
    impl ServerAction<String> for Append {
        async fn call(&self, request: &ServerRequest<String>, previous: Option<Response>) -> Result<Response, ActionError> {
            let base = match previous {
                Some(previous) => String::from_utf8_lossy(&previous.into_body().into_bytes().await?).into_owned(),
                None => request.body().clone(),
            };
            Ok(Response::new(ResponseBody::from(format!("{base}+{}", self.0))))
        }
    }

    fn request() -> ServerRequest<String> {
        ServerRequest::new(
            Method::GET,
            Uri::parse("/").unwrap(),
            HeaderMap::new(),
            "Request".to_string(),
            "1.1",
            ServerParams::new(),
        )
    }

    async fn body_of(response: Response) -> String {
        String::from_utf8_lossy(&response.into_body().into_bytes().await.unwrap()).into_owned()
    }

    #[tokio::test]
    async fn empty_chain_fails() {
        let actions = ServerActions::<String>::default();
        assert!(actions.is_empty());
        let error = actions.invoke(&request()).await.unwrap_err();
        assert!(matches!(error, ActionError::EmptyActions));
    }

    #[tokio::test]
    async fn single_action() {
        let mut actions = ServerActions::default();
        actions.add_last(Append("A"));
        assert_eq!(body_of(actions.invoke(&request()).await.unwrap()).await, "Request+A");
    }

    #[tokio::test]
    async fn nested_chain_continues_from_previous() {
        let mut inner = ServerActions::default();
        inner.add_last(Append("B")).add_last(Append("C"));

        let mut outer = ServerActions::default();
        outer.add_last(Append("A")).add_last(inner).add_last(Append("D"));

        assert_eq!(outer.len(), 3);
        assert_eq!(body_of(outer.invoke(&request()).await.unwrap()).await, "Request+A+B+C+D");
    }

    #[tokio::test]
    async fn clone_shares_actions() {
        let mut actions = ServerActions::default();
        actions.add_last(action_fn(|request: &ServerRequest<String>, _| Ok(Response::new(request.body().clone().into()))));

        let cloned = actions.clone();
        actions.add_last(Append("X"));

        assert_eq!(cloned.len(), 1);
        assert_eq!(body_of(cloned.invoke(&request()).await.unwrap()).await, "Request");
        assert_eq!(body_of(actions.invoke(&request()).await.unwrap()).await, "Request+X");
    }
}
