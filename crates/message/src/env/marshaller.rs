use crate::env::{
    HeaderSource, ServerParams, marshal_headers, marshal_protocol_version, marshal_uri, normalize_server,
};
use crate::protocol::{MarshalError, ServerRequest};
use http::Method;
use std::fmt;
use tracing::debug;

/// Turns a server environment into a [`ServerRequest`].
///
/// Built once at startup and shared across requests; marshalling itself
/// keeps no state.
pub struct RequestMarshaller {
    default_method: Method,
    header_source: Option<Box<dyn HeaderSource>>,
}

impl RequestMarshaller {
    pub fn builder() -> RequestMarshallerBuilder {
        RequestMarshallerBuilder::new()
    }

    pub fn marshal<B>(&self, server: ServerParams, body: B) -> Result<ServerRequest<B>, MarshalError> {
        let server = normalize_server(server, self.header_source.as_deref());
        let headers = marshal_headers(&server);

        let method = self.marshal_method(&server)?;
        let uri = marshal_uri(&server, &headers);
        let version = marshal_protocol_version(&server)?;

        debug!(%method, %uri, version = %version, headers = headers.len(), "marshalled server request");
        Ok(ServerRequest::new(method, uri, headers, body, version, server))
    }

    fn marshal_method(&self, server: &ServerParams) -> Result<Method, MarshalError> {
        match server.get_str("REQUEST_METHOD") {
            Some(method) => Method::from_bytes(method.as_bytes()).map_err(|_| MarshalError::invalid_method(&method)),
            None => Ok(self.default_method.clone()),
        }
    }
}

impl Default for RequestMarshaller {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for RequestMarshaller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestMarshaller")
            .field("default_method", &self.default_method)
            .field("header_source", &self.header_source.is_some())
            .finish()
    }
}

pub struct RequestMarshallerBuilder {
    default_method: Method,
    header_source: Option<Box<dyn HeaderSource>>,
}

impl RequestMarshallerBuilder {
    fn new() -> Self {
        Self { default_method: Method::GET, header_source: None }
    }

    /// Method used when the environment carries no `REQUEST_METHOD`.
    pub fn default_method(mut self, method: Method) -> Self {
        self.default_method = method;
        self
    }

    pub fn header_source(mut self, header_source: impl HeaderSource + 'static) -> Self {
        self.header_source = Some(Box::new(header_source));
        self
    }

    pub fn build(self) -> RequestMarshaller {
        RequestMarshaller { default_method: self.default_method, header_source: self.header_source }
    }
}

impl fmt::Debug for RequestMarshallerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestMarshallerBuilder").field("default_method", &self.default_method).finish_non_exhaustive()
    }
}
