//! Canonicalization of request components.
//!
//! Everything here is pure and deterministic: the same inputs always produce
//! the same bytes, independent of locale or environment. All sorting uses
//! plain byte order, never locale-aware comparison, since the output feeds
//! directly into the signature.

use crate::constants::{X_ACS_PREFIX, X_LOG_PREFIX};
use http::HeaderMap;
use std::fmt;

/// A query parameter value.
///
/// Query mappings accept more than strings, so the serialization rule must
/// be total and deterministic for every accepted type: integers and floats
/// render through their standard formatting, booleans as `true`/`false`, and
/// an absent value as the empty string (never the word "undefined").
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A floating point value.
    Float(f64),
    /// A boolean value, rendered as `true` or `false`.
    Bool(bool),
    /// An absent value, rendered as the empty string.
    None,
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Str(v) => write!(f, "{v}"),
            QueryValue::Int(v) => write!(f, "{v}"),
            QueryValue::Float(v) => write!(f, "{v}"),
            QueryValue::Bool(v) => write!(f, "{v}"),
            QueryValue::None => Ok(()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Str(v.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Str(v)
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<f64> for QueryValue {
    fn from(v: f64) -> Self {
        QueryValue::Float(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => QueryValue::None,
        }
    }
}

/// Build the canonicalized resource used in the sign-string.
///
/// Returns `path` verbatim when there are no query parameters; otherwise
/// appends `?` and the `key=value` pairs sorted ascending. Two pairs with
/// the same key are ordered by value, so duplicates still canonicalize
/// deterministically.
///
/// This string is only ever signed. The query string sent on the wire is
/// form-urlencoded separately from the same pairs and need not match it
/// byte for byte.
pub fn canonicalized_resource(path: &str, queries: &[(String, QueryValue)]) -> String {
    if queries.is_empty() {
        return path.to_string();
    }

    let mut pairs = queries
        .iter()
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect::<Vec<(String, String)>>();
    pairs.sort();

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<String>>()
        .join("&");

    format!("{path}?{query}")
}

/// Build the canonicalized header block used in the sign-string.
///
/// Selects the headers whose name starts with `x-log-` or `x-acs-`, sorted
/// ascending, each rendered as `name:trimmed-value` and joined with `\n`.
/// An empty selection yields the empty string; the sign-string still spends
/// a line on it.
///
/// `http::HeaderMap` keeps names lowercase, which makes the prefix match
/// case-insensitive for free and leaves value order as the only tie-break
/// for repeated names; sorting the full `(name, value)` pair keeps that
/// deterministic too.
pub fn canonicalized_headers(headers: &HeaderMap) -> String {
    let mut selected = headers
        .iter()
        .filter(|(k, _)| {
            k.as_str().starts_with(X_LOG_PREFIX) || k.as_str().starts_with(X_ACS_PREFIX)
        })
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                String::from_utf8_lossy(v.as_bytes()).trim().to_string(),
            )
        })
        .collect::<Vec<(String, String)>>();

    selected.sort();

    selected
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<String>>()
        .join("\n")
}
