//! Outbound side of the hosting environment.
//!
//! - [`ResponseWriter`]: serializes a response head and copies its body in
//!   bounded chunks to any `AsyncWrite`, such as a socket or CGI stdout.

mod response_writer;

pub use response_writer::DEFAULT_CHUNK_SIZE;
pub use response_writer::ResponseWriter;
pub use response_writer::ResponseWriterBuilder;
pub use response_writer::StatusLine;
