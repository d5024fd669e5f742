use crate::{Error, HttpSend, Result, SendOptions};
use bytes::Bytes;
use std::fmt::Debug;
use std::sync::Arc;

/// Context provides the transport used to deliver signed requests.
///
/// A freshly created context uses a no-op transport that fails every send.
/// Configure a real implementation with [`Context::with_http_send`], for
/// example `ReqwestHttpSend` from `logsign-http-send-reqwest`.
///
/// ## Example
///
/// ```ignore
/// use logsign_core::Context;
/// use logsign_http_send_reqwest::ReqwestHttpSend;
///
/// let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
/// ```
#[derive(Clone)]
pub struct Context {
    http: Arc<dyn HttpSend>,
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context").field("http", &self.http).finish()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Create a new Context with a no-op transport.
    pub fn new() -> Self {
        Self {
            http: Arc::new(NoopHttpSend),
        }
    }

    /// Replace the HTTP transport implementation.
    pub fn with_http_send(mut self, http: impl HttpSend) -> Self {
        self.http = Arc::new(http);
        self
    }

    /// Send http request and return the response.
    #[inline]
    pub async fn http_send(
        &self,
        req: http::Request<Bytes>,
        opts: &SendOptions,
    ) -> Result<http::Response<Bytes>> {
        self.http
            .http_send(req, opts)
            .await
            .map_err(|err| Error::transport_failed(err.to_string()).with_source(err))
    }
}

/// No-op transport that returns an error when called.
#[derive(Debug)]
struct NoopHttpSend;

#[async_trait::async_trait]
impl HttpSend for NoopHttpSend {
    async fn http_send(
        &self,
        _: http::Request<Bytes>,
        _: &SendOptions,
    ) -> anyhow::Result<http::Response<Bytes>> {
        Err(anyhow::anyhow!(
            "no http send implementation configured, please set one via Context::with_http_send"
        ))
    }
}
