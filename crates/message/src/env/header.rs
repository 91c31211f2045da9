//! Header extraction from the server environment.

use crate::env::ServerParams;
use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::{trace, warn};

/// Asks the hosting module for the raw request headers.
///
/// Apache drops `Authorization` from the CGI environment; when the host can
/// still report it, [`normalize_server`] copies it back in as `HTTP_AUTHORIZATION`.
pub trait HeaderSource: Send + Sync {
    fn request_headers(&self) -> Vec<(String, String)>;
}

impl<F> HeaderSource for F
where
    F: Fn() -> Vec<(String, String)> + Send + Sync,
{
    fn request_headers(&self) -> Vec<(String, String)> {
        (self)()
    }
}

/// Fills in `HTTP_AUTHORIZATION` from `source` when the environment lacks it.
pub fn normalize_server(mut server: ServerParams, source: Option<&dyn HeaderSource>) -> ServerParams {
    if server.contains_key("HTTP_AUTHORIZATION") {
        return server;
    }
    let Some(source) = source else {
        return server;
    };

    let headers = source.request_headers();
    let authorization = ["Authorization", "authorization"]
        .iter()
        .find_map(|wanted| headers.iter().find(|(name, _)| name == wanted))
        .map(|(_, value)| value.clone());

    if let Some(value) = authorization {
        trace!("restored authorization header from host module");
        server.insert("HTTP_AUTHORIZATION", value);
    }
    server
}

/// Builds the header map from `HTTP_*` and `CONTENT_*` environment entries.
///
/// `REDIRECT_`-prefixed entries, which Apache adds for rewritten requests, are
/// used only when the unprefixed variable is missing. Empty values are skipped,
/// as are `"0"` values and entries that do not form a valid header name or value.
pub fn marshal_headers(server: &ServerParams) -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(server.len());

    for (key, value) in server {
        let key = match key.strip_prefix("REDIRECT_") {
            Some(stripped) if server.contains_key(stripped) => continue,
            Some(stripped) => stripped,
            None => key.as_str(),
        };

        if !value.is_truthy() {
            continue;
        }

        let name = if let Some(rest) = key.strip_prefix("HTTP_") {
            rest.to_ascii_lowercase().replace('_', "-")
        } else if let Some(rest) = key.strip_prefix("CONTENT_") {
            format!("content-{}", rest.to_ascii_lowercase())
        } else {
            continue;
        };

        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            warn!(key, "skip environment entry, not a valid header name");
            continue;
        };

        headers.remove(&name);
        for line in value.values() {
            match HeaderValue::from_str(line) {
                Ok(header_value) => {
                    headers.append(name.clone(), header_value);
                }
                Err(e) => warn!(key, cause = %e, "skip environment value, not a valid header value"),
            }
        }
    }

    headers
}

/// Case-insensitive header lookup; repeated values are joined with `", "`.
///
/// Returns `None` when the header is absent, leaving the default to the caller.
pub fn header_line(name: &str, headers: &HeaderMap) -> Option<String> {
    let name = HeaderName::from_bytes(name.to_ascii_lowercase().as_bytes()).ok()?;
    let values: Vec<_> = headers.get_all(&name).iter().map(|value| String::from_utf8_lossy(value.as_bytes())).collect();
    if values.is_empty() { None } else { Some(values.join(", ")) }
}
