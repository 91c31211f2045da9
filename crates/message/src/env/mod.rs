//! Server environment marshalling.
//!
//! CGI-style hosts describe a request through a flat map of variables rather
//! than a parsed request line. This module turns such a map into the pieces
//! of a [`ServerRequest`](crate::protocol::ServerRequest):
//!
//! - [`marshal_headers`]: `HTTP_*` / `CONTENT_*` variables to a header map
//! - [`marshal_uri`]: scheme, host, port, path, query and fragment
//! - [`marshal_protocol_version`]: the `X.Y` version from `SERVER_PROTOCOL`
//! - [`RequestMarshaller`]: runs all of the above and builds the request
//!
//! Everything here is a pure function of its arguments; the environment is
//! always passed in explicitly, for example via [`ServerParams::from_env`].
//!
//! # Example
//!
//! ```
//! use micro_message::env::{RequestMarshaller, ServerParams};
//!
//! let server: ServerParams = [
//!     ("REQUEST_METHOD", "GET"),
//!     ("HTTP_HOST", "example.net"),
//!     ("REQUEST_URI", "/page?id=42"),
//!     ("QUERY_STRING", "id=42"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let request = RequestMarshaller::default().marshal(server, ()).unwrap();
//! assert_eq!(request.uri().to_string(), "http://example.net/page?id=42");
//! assert_eq!(request.get_param("id"), Some("42"));
//! ```

mod header;
mod marshaller;
mod params;
mod uri;
mod version;

pub use header::HeaderSource;
pub use header::header_line;
pub use header::marshal_headers;
pub use header::normalize_server;

pub use marshaller::RequestMarshaller;
pub use marshaller::RequestMarshallerBuilder;

pub use params::ServerParams;
pub use params::ServerValue;

pub use uri::HostAndPort;
pub use uri::marshal_host_and_port;
pub use uri::marshal_request_uri;
pub use uri::marshal_scheme;
pub use uri::marshal_uri;
pub use uri::strip_query_string;

pub use version::DEFAULT_PROTOCOL_VERSION;
pub use version::marshal_protocol_version;
