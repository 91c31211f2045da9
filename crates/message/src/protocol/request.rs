//! Server-side request value.
//!
//! [`ServerRequest`] composes the marshalled [`Uri`], method, headers, body,
//! protocol version and the raw server environment. All `with_*` methods
//! consume the request and hand back a new one. The one facet meant to be
//! filled in after construction is the route parameter map, which a router
//! populates through [`ServerRequest::add_route_param`].

use crate::env::{RequestMarshaller, ServerParams, header_line};
use crate::protocol::{MarshalError, QueryParams, Uri};
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::de::DeserializeOwned;

/// Named parameters extracted from the request path by a router.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    inner: QueryParams,
}

impl RouteParams {
    pub fn new() -> Self {
        Self { inner: QueryParams::new() }
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.inner.insert(name, value)
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.inner.remove(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self { inner: iter.into_iter().collect() }
    }
}

#[derive(Debug, Clone)]
pub struct ServerRequest<B> {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: B,
    protocol_version: String,
    server_params: ServerParams,
    parsed_body: Option<QueryParams>,
    route_params: RouteParams,
}

impl<B> ServerRequest<B> {
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: B,
        protocol_version: impl Into<String>,
        server_params: ServerParams,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            protocol_version: protocol_version.into(),
            server_params,
            parsed_body: None,
            route_params: RouteParams::new(),
        }
    }

    /// Marshals a request from a server environment using the default
    /// [`RequestMarshaller`] settings.
    pub fn from_server_params(server: ServerParams, body: B) -> Result<Self, MarshalError> {
        RequestMarshaller::default().marshal(server, body)
    }

    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    #[inline]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// All values of `name` joined with `", "`, see [`header_line`].
    pub fn header_line(&self, name: &str) -> Option<String> {
        header_line(name, &self.headers)
    }

    #[inline]
    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn into_body(self) -> B {
        self.body
    }

    #[inline]
    pub fn protocol_version(&self) -> &str {
        &self.protocol_version
    }

    #[inline]
    pub fn server_params(&self) -> &ServerParams {
        &self.server_params
    }

    /// The decoded query parameters of the request URI.
    #[inline]
    pub fn query_params(&self) -> &QueryParams {
        self.uri.query_params()
    }

    #[inline]
    pub fn parsed_body(&self) -> Option<&QueryParams> {
        self.parsed_body.as_ref()
    }

    #[inline]
    pub fn route_params(&self) -> &RouteParams {
        &self.route_params
    }

    pub fn add_route_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.route_params.insert(name, value);
    }

    /// Sets a route parameter; `None` removes it so lookups fall through to
    /// the query and body parameters.
    #[must_use]
    pub fn with_route_param(mut self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => {
                self.route_params.insert(name, value);
            }
            None => {
                self.route_params.remove(name);
            }
        }
        self
    }

    /// Looks `name` up in route parameters, then query parameters, then the parsed body.
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.route_params
            .get(name)
            .or_else(|| self.uri.query_params().get(name))
            .or_else(|| self.parsed_body.as_ref().and_then(|body| body.get(name)))
    }

    #[must_use]
    pub fn with_method(self, method: Method) -> Self {
        Self { method, ..self }
    }

    #[must_use]
    pub fn with_uri(self, uri: Uri) -> Self {
        Self { uri, ..self }
    }

    /// Replaces every value of `name` with `value`.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    #[must_use]
    pub fn with_added_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn without_header(mut self, name: &HeaderName) -> Self {
        self.headers.remove(name);
        self
    }

    #[must_use]
    pub fn with_protocol_version(self, protocol_version: impl Into<String>) -> Self {
        Self { protocol_version: protocol_version.into(), ..self }
    }

    #[must_use]
    pub fn with_parsed_body(self, parsed_body: Option<QueryParams>) -> Self {
        Self { parsed_body, ..self }
    }

    pub fn with_body<C>(self, body: C) -> ServerRequest<C> {
        self.map_body(|_| body)
    }

    pub fn map_body<C, F>(self, f: F) -> ServerRequest<C>
    where
        F: FnOnce(B) -> C,
    {
        ServerRequest {
            method: self.method,
            uri: self.uri,
            headers: self.headers,
            body: f(self.body),
            protocol_version: self.protocol_version,
            server_params: self.server_params,
            parsed_body: self.parsed_body,
            route_params: self.route_params,
        }
    }

    fn is_form_urlencoded(&self) -> bool {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<mime::Mime>().ok())
            .is_some_and(|content_type| content_type.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
    }
}

impl<B: AsRef<[u8]>> ServerRequest<B> {
    /// Decodes a buffered `application/x-www-form-urlencoded` body.
    ///
    /// Returns `None` for any other content type.
    pub fn form_params(&self) -> Option<QueryParams> {
        if !self.is_form_urlencoded() {
            return None;
        }
        Some(QueryParams::parse(&String::from_utf8_lossy(self.body.as_ref())))
    }

    /// Deserializes the buffered body as form data, regardless of content type.
    pub fn form_as<T: DeserializeOwned>(&self) -> Result<T, serde_urlencoded::de::Error> {
        serde_urlencoded::from_bytes(self.body.as_ref())
    }
}
