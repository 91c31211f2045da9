use std::io;
use thiserror::Error;

/// Error type used by actions and response bodies for opaque failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid uri: {uri}")]
pub struct InvalidUri {
    uri: String,
}

impl InvalidUri {
    pub fn new<S: ToString>(uri: S) -> Self {
        Self { uri: uri.to_string() }
    }

    /// The raw input that failed to parse.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    #[error("unrecognized protocol version ({version})")]
    UnexpectedProtocolVersion { version: String },

    #[error("invalid http method: {method}")]
    InvalidMethod { method: String },
}

impl MarshalError {
    pub fn unexpected_protocol_version<S: ToString>(version: S) -> Self {
        Self::UnexpectedProtocolVersion { version: version.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("invalid body: {reason}")]
    InvalidBody { reason: String },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_body<S: ToString>(str: S) -> Self {
        Self::InvalidBody { reason: str.to_string() }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_uri_keeps_input() {
        let error = InvalidUri::new("///");
        assert_eq!(error.uri(), "///");
        assert_eq!(error.to_string(), "invalid uri: ///");
    }

    #[test]
    fn protocol_version_message() {
        let error = MarshalError::unexpected_protocol_version("HTTP/0.9");
        assert_eq!(error.to_string(), "unrecognized protocol version (HTTP/0.9)");
    }
}
