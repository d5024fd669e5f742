use crate::canonical::QueryValue;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use logsign_core::SendOverrides;

/// One request to issue against the log service.
///
/// A spec is immutable once handed to [`Client::issue`][crate::Client]; the
/// client builds all per-call signing state locally, so concurrent calls
/// never interfere.
#[derive(Debug, Clone, Default)]
pub struct RequestSpec {
    /// HTTP method.
    pub method: Method,
    /// Resource path, must start with `/`.
    pub path: String,
    /// Query parameters, in caller order. The wire query string preserves
    /// this order; the canonicalized resource sorts its own copy.
    pub queries: Vec<(String, QueryValue)>,
    /// Raw request body.
    pub body: Option<Bytes>,
    /// Extra headers, overlaid on the defaults (caller wins on conflict).
    pub headers: HeaderMap,
    /// Project name, prefixed onto the endpoint host when present.
    pub project: Option<String>,
    /// Per-call transport overrides, the highest-priority layer.
    pub send: SendOverrides,
}

impl RequestSpec {
    /// Create a new spec for a method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Default::default()
        }
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.queries.push((key.into(), value.into()));
        self
    }

    /// Set a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the project name.
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set per-call transport overrides.
    pub fn send_overrides(mut self, send: SendOverrides) -> Self {
        self.send = send;
        self
    }
}
