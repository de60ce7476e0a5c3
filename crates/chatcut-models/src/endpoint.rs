//! Remote endpoint normalization.
//!
//! Tunnel URLs for the remote processing server are pasted by hand and
//! rotate every session, so they arrive with or without a scheme, with
//! stray whitespace, and with trailing slashes. [`RemoteEndpoint`] is the
//! canonical form every network-facing operation consumes.

use std::fmt;

use serde::{Deserialize, Serialize};

const HTTPS: &str = "https://";
const HTTP: &str = "http://";

/// Host used when the input carries no host at all.
const FALLBACK_HOST: &str = "localhost";

/// A normalized base URL: scheme + host [+ port] + path prefix.
///
/// Always begins with `http://` or `https://` and never ends with `/`.
/// The only way to build one is through [`RemoteEndpoint::normalize`]
/// (directly or via `From`/`Deserialize`), so the invariant holds for
/// every value in circulation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RemoteEndpoint(String);

impl RemoteEndpoint {
    /// Canonicalize arbitrary user input into an endpoint.
    ///
    /// Trims surrounding whitespace, prepends `https://` when no
    /// `http://`/`https://` scheme is present and strips trailing slashes.
    /// Never fails: whether a server actually answers is established by
    /// the first real request.
    pub fn normalize(input: &str) -> Self {
        let trimmed = input.trim();
        let (scheme, rest) = split_scheme(trimmed);
        let rest = rest.trim_end_matches(|c: char| c == '/' || c.is_whitespace());
        let rest = if rest.is_empty() { FALLBACK_HOST } else { rest };
        Self(format!("{scheme}{rest}"))
    }

    /// The endpoint as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the URL of a server route such as `/health`.
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }

    /// Resolve a download reference returned by the server.
    ///
    /// Absolute `http(s)://` URLs are returned unchanged; anything else is
    /// treated as a path relative to this endpoint.
    pub fn resolve(&self, url_or_path: &str) -> String {
        if has_scheme(url_or_path) {
            url_or_path.to_string()
        } else {
            self.join(url_or_path)
        }
    }
}

/// True when `value` starts with `http://` or `https://` (any case).
pub fn has_scheme(value: &str) -> bool {
    starts_with_ignore_case(value, HTTPS) || starts_with_ignore_case(value, HTTP)
}

fn split_scheme(value: &str) -> (&'static str, &str) {
    if starts_with_ignore_case(value, HTTPS) {
        (HTTPS, &value[HTTPS.len()..])
    } else if starts_with_ignore_case(value, HTTP) {
        (HTTP, &value[HTTP.len()..])
    } else {
        (HTTPS, value)
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

impl From<&str> for RemoteEndpoint {
    fn from(value: &str) -> Self {
        Self::normalize(value)
    }
}

impl From<String> for RemoteEndpoint {
    fn from(value: String) -> Self {
        Self::normalize(&value)
    }
}

impl From<RemoteEndpoint> for String {
    fn from(value: RemoteEndpoint) -> Self {
        value.0
    }
}

impl AsRef<str> for RemoteEndpoint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
