//! Component splitting for raw URI references.
//!
//! The splitting follows RFC 3986 appendix B: fragment first, then query,
//! then the scheme and the optional `//authority`. Percent-encoding in path,
//! query and fragment is left untouched.

use crate::protocol::InvalidUri;
use crate::utils::ensure;

#[derive(Debug, Default)]
pub(super) struct Components {
    pub(super) scheme: String,
    pub(super) username: String,
    pub(super) password: String,
    pub(super) has_authority: bool,
    pub(super) host: String,
    pub(super) port: Option<u16>,
    pub(super) path: String,
    pub(super) query: String,
    pub(super) fragment: String,
}

pub(super) fn parse(raw: &str) -> Result<Components, InvalidUri> {
    let (rest, fragment) = raw.split_once('#').unwrap_or((raw, ""));
    let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));

    let (scheme, rest) = split_scheme(rest);
    ensure!(!scheme.chars().any(is_forbidden), InvalidUri::new(raw));

    let mut components = Components {
        scheme: scheme.to_ascii_lowercase(),
        query: query.to_string(),
        fragment: fragment.to_string(),
        ..Components::default()
    };

    let path = match rest.strip_prefix("//") {
        Some(hierarchy) => {
            let (authority, path) = match hierarchy.find('/') {
                Some(index) => hierarchy.split_at(index),
                None => (hierarchy, ""),
            };
            // An empty authority needs a scheme: `file:///etc` parses, `///etc` does not.
            ensure!(!authority.is_empty() || !scheme.is_empty(), InvalidUri::new(raw));
            components.has_authority = true;
            if !authority.is_empty() {
                parse_authority(raw, authority, &mut components)?;
            }
            path
        }
        None => rest,
    };

    components.path = path.to_string();
    Ok(components)
}

/// Splits a leading `scheme:` off `input`.
///
/// Anything that is not `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )` before
/// the first colon means there is no scheme, e.g. `/a:b` or `./x:y`.
fn split_scheme(input: &str) -> (&str, &str) {
    let Some((candidate, rest)) = input.split_once(':') else {
        return ("", input);
    };

    let mut chars = candidate.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if valid { (candidate, rest) } else { ("", input) }
}

fn parse_authority(raw: &str, authority: &str, components: &mut Components) -> Result<(), InvalidUri> {
    ensure!(!authority.chars().any(is_forbidden), InvalidUri::new(raw));

    let host_port = match authority.rsplit_once('@') {
        Some((user_info, host_port)) => {
            let (username, password) = user_info.split_once(':').unwrap_or((user_info, ""));
            components.username = username.to_string();
            components.password = password.to_string();
            host_port
        }
        None => authority,
    };

    let (host, port) = if host_port.starts_with('[') {
        let end = host_port.find(']').ok_or_else(|| InvalidUri::new(raw))?;
        let (host, tail) = host_port.split_at(end + 1);
        if tail.is_empty() {
            (host, None)
        } else {
            let port = tail.strip_prefix(':').ok_or_else(|| InvalidUri::new(raw))?;
            (host, Some(port))
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    ensure!(!host.is_empty(), InvalidUri::new(raw));
    components.host = host.to_ascii_lowercase();

    if let Some(port) = port.filter(|port| !port.is_empty()) {
        ensure!(port.bytes().all(|b| b.is_ascii_digit()), InvalidUri::new(raw));
        components.port = Some(port.parse::<u16>().map_err(|_| InvalidUri::new(raw))?);
    }

    Ok(())
}

#[inline]
fn is_forbidden(c: char) -> bool {
    c.is_whitespace() || c.is_control()
}
