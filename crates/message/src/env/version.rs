//! Protocol version from `SERVER_PROTOCOL`.

use crate::env::ServerParams;
use crate::protocol::MarshalError;
use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_PROTOCOL_VERSION: &str = "1.1";

static PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(HTTP/)?(?P<version>[1-9][0-9]*(?:\.[0-9])?)$").expect("protocol regex should be valid"));

/// The `X.Y` protocol version from `SERVER_PROTOCOL`, `1.1` when it is absent.
pub fn marshal_protocol_version(server: &ServerParams) -> Result<String, MarshalError> {
    let Some(protocol) = server.get_str("SERVER_PROTOCOL") else {
        return Ok(DEFAULT_PROTOCOL_VERSION.to_string());
    };

    PROTOCOL
        .captures(&protocol)
        .map(|captures| captures["version"].to_string())
        .ok_or_else(|| MarshalError::unexpected_protocol_version(&protocol))
}
