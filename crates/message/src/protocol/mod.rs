//! Core HTTP message types.
//!
//! - **URI** ([`uri`]): the immutable [`Uri`] value object and its decoded
//!   [`QueryParams`]
//! - **Request** ([`request`]): [`ServerRequest`], composing a `Uri`, method,
//!   headers, body, protocol version, server environment and route parameters
//! - **Response** ([`body`]): the [`Response`] alias and its [`ResponseBody`]
//! - **Errors** ([`error`]): [`InvalidUri`], [`MarshalError`], [`SendError`]
//!
//! All of these are plain values: build one per request, share it freely
//! between threads, never mutate it behind another reader's back.

pub mod uri;
pub use uri::QueryParams;
pub use uri::Uri;
pub use uri::default_port;

mod request;
pub use request::RouteParams;
pub use request::ServerRequest;

mod body;
pub use body::Response;
pub use body::ResponseBody;
pub use body::is_empty_status;

mod error;
pub use error::BoxError;
pub use error::InvalidUri;
pub use error::MarshalError;
pub use error::SendError;
