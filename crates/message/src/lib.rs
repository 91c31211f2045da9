//! Immutable HTTP message types for CGI-style hosting environments.
//!
//! Servers such as Apache, nginx with FastCGI, or IIS describe each request
//! as a flat map of environment variables. This crate rebuilds a normalized
//! request from that map and provides the value types to work with it:
//!
//! - [`protocol::Uri`]: an RFC 3986 URI value with user/password split,
//!   default-port suppression and a decoded query parameter map
//! - [`env`]: marshalling of headers, URI, method and protocol version from
//!   the environment, resolving proxy, rewrite and IIS quirks
//! - [`protocol::ServerRequest`]: the request value handed to application code
//! - [`connection::ResponseWriter`]: sends a response back to the host in
//!   bounded chunks
//!
//! # Example
//!
//! ```no_run
//! use micro_message::connection::{ResponseWriter, StatusLine};
//! use micro_message::env::ServerParams;
//! use micro_message::protocol::{Response, ResponseBody, ServerRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let request = ServerRequest::from_server_params(ServerParams::from_env(), ())?;
//!
//!     let greeting = format!("Hello {}!\n", request.get_param("name").unwrap_or("World"));
//!     let response = Response::new(ResponseBody::from(greeting));
//!
//!     let writer = ResponseWriter::builder().status_line(StatusLine::Cgi).build();
//!     writer.send(&mut tokio::io::stdout(), response).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Handling
//!
//! - [`protocol::InvalidUri`]: a raw URI string could not be split into components
//! - [`protocol::MarshalError`]: the environment carries an unusable method or protocol version
//! - [`protocol::SendError`]: the response could not be written back
//!
//! None of these are transient; they describe malformed input or a closed connection.

pub mod connection;
pub mod env;
pub mod protocol;

mod utils;
