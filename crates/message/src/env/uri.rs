//! Reconstructs the request URI from the server environment.
//!
//! Web servers report the pieces of the request URI in many, sometimes
//! contradictory places: rewrite modules, proxies and IIS each add their own
//! variables. The functions here resolve them with a fixed precedence.

use crate::env::{ServerParams, ServerValue, header_line};
use crate::protocol::Uri;
use http::HeaderMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static HOST_PORT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":([0-9]+)$").expect("host port regex should be valid"));

static BRACKETED_IPV6: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[[0-9a-fA-F:]+\]$").expect("ipv6 host regex should be valid"));

static SCHEME_AND_HOST_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^/:]+://[^/]+").expect("scheme and host regex should be valid"));

/// Host and port as far as the environment can tell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAndPort {
    pub host: String,
    pub port: Option<u16>,
}

/// Builds the full request [`Uri`] from `server` and the already marshalled `headers`.
pub fn marshal_uri(server: &ServerParams, headers: &HeaderMap) -> Uri {
    let mut uri = Uri::default().with_scheme(marshal_scheme(server, headers));

    let HostAndPort { host, port } = marshal_host_and_port(server, headers);
    if !host.is_empty() {
        uri = uri.with_host(&host).with_port(port);
    }

    let request_uri = marshal_request_uri(server);
    let path = strip_query_string(&request_uri);
    let (path, fragment) = path.split_once('#').unwrap_or((path, ""));

    let query = server.get_str("QUERY_STRING").unwrap_or_default();

    uri.with_path(path).with_fragment(fragment).with_query(query.trim_start_matches('?'))
}

/// `https` when `HTTPS` is set to anything but `off`, or when a proxy reports
/// `X-Forwarded-Proto: https`; `http` otherwise.
///
/// Only a single `off` string turns `HTTPS` off. A non-empty list counts as set.
pub fn marshal_scheme(server: &ServerParams, headers: &HeaderMap) -> &'static str {
    let https = server.get("HTTPS").is_some_and(|value| match value {
        ServerValue::Single(flag) => value.is_truthy() && flag != "off",
        ServerValue::List(_) => value.is_truthy(),
    });
    let forwarded = header_line("x-forwarded-proto", headers).is_some_and(|proto| proto == "https");
    if https || forwarded { "https" } else { "http" }
}

/// Resolves host and port from the `Host` header, falling back to
/// `SERVER_NAME` / `SERVER_PORT`.
pub fn marshal_host_and_port(server: &ServerParams, headers: &HeaderMap) -> HostAndPort {
    if let Some(host) = header_line("host", headers).filter(|host| !host.is_empty()) {
        return host_and_port_from_header(&host);
    }

    let Some(server_name) = server.get_str("SERVER_NAME") else {
        return HostAndPort::default();
    };

    let mut accumulator = HostAndPort {
        host: server_name.into_owned(),
        port: server.get_str("SERVER_PORT").and_then(|port| port.trim().parse().ok()),
    };

    if let Some(server_addr) = server.get_str("SERVER_ADDR")
        && BRACKETED_IPV6.is_match(&accumulator.host)
    {
        correct_ipv6_host_and_port(&mut accumulator, &server_addr);
    }

    accumulator
}

/// Splits a `Host` header value into host and trailing `:<digits>` port.
///
/// A bare trailing colon is dropped along with an empty port.
/// Works for reg-names, IPv4 and bracketed IPv6 alike, since the port is
/// always the final colon-separated run of digits.
fn host_and_port_from_header(value: &str) -> HostAndPort {
    match HOST_PORT_SUFFIX.captures(value) {
        Some(captures) => {
            let digits = &captures[1];
            let host = value[..value.len() - digits.len() - 1].to_string();
            match digits.parse() {
                Ok(port) => HostAndPort { host, port: Some(port) },
                Err(_) => HostAndPort { host, port: None },
            }
        }
        None => HostAndPort { host: value.strip_suffix(':').unwrap_or(value).to_string(), port: None },
    }
}

/// Some clients send the bare IPv6 address as the host, so the server splits
/// off its last hextet as a port. Use `SERVER_ADDR` instead, default the port
/// to 80 and drop it again when it is just that last hextet.
fn correct_ipv6_host_and_port(accumulator: &mut HostAndPort, server_addr: &str) {
    accumulator.host = format!("[{server_addr}]");
    let port = accumulator.port.unwrap_or(80);

    let tail = accumulator.host.rsplit(':').next().unwrap_or_default();
    if format!("{port}]") == tail {
        trace!(host = %accumulator.host, port, "last ipv6 hextet taken as port, dropping it");
        accumulator.port = None;
    } else {
        accumulator.port = Some(port);
    }
}

/// Picks the raw request target.
///
/// Precedence: IIS `UNENCODED_URL` after a rewrite, then `HTTP_X_ORIGINAL_URL`,
/// `HTTP_X_REWRITE_URL` and `REQUEST_URI` (with any `scheme://host` prefix
/// removed), and finally `ORIG_PATH_INFO` or `/`.
pub fn marshal_request_uri(server: &ServerParams) -> String {
    let iis_rewritten = server.get_str("IIS_WasUrlRewritten").is_some_and(|value| value == "1");
    if let Some(unencoded) = server.get_str("UNENCODED_URL").filter(|url| iis_rewritten && !url.is_empty()) {
        trace!("request uri from UNENCODED_URL");
        return unencoded.into_owned();
    }

    let request_uri = ["HTTP_X_ORIGINAL_URL", "HTTP_X_REWRITE_URL", "REQUEST_URI"]
        .into_iter()
        .find_map(|key| server.get_str(key).map(|value| (key, value)));

    if let Some((key, request_uri)) = request_uri {
        trace!(source = key, "request uri selected");
        return SCHEME_AND_HOST_PREFIX.replace(&request_uri, "").into_owned();
    }

    match server.get_str("ORIG_PATH_INFO") {
        Some(path_info) if !path_info.is_empty() => path_info.into_owned(),
        _ => "/".to_string(),
    }
}

/// Drops everything from the first `?` on.
pub fn strip_query_string(path: &str) -> &str {
    path.split_once('?').map_or(path, |(path, _)| path)
}
