use anyhow::Result;
use bytes::Bytes;
use std::fmt::Debug;
use std::time::Duration;

/// Hard-coded defaults applied when neither the client nor the call
/// overrides a transport option.
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
const DEFAULT_RETRY: u32 = 2;

/// HttpSend is used to deliver a fully signed request.
///
/// This trait is the transport boundary of logsign: signing and response
/// interpretation live above it, connection handling lives below it. It is
/// designed for the signer, please don't use it as a general http client.
#[async_trait::async_trait]
pub trait HttpSend: Debug + Send + Sync + 'static {
    /// Send http request and return the response.
    ///
    /// A non-2xx response is still a successful send unless
    /// [`SendOptions::error_for_status`] is set: the caller wants to inspect
    /// the body for an application error envelope.
    async fn http_send(
        &self,
        req: http::Request<Bytes>,
        opts: &SendOptions,
    ) -> Result<http::Response<Bytes>>;
}

/// Fully resolved transport options handed to [`HttpSend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    /// Timeout applied to each delivery attempt.
    pub timeout: Duration,
    /// How many times the transport may retry a failed attempt.
    pub retry: u32,
    /// Raise a transport error on non-2xx status instead of returning the
    /// response.
    pub error_for_status: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: DEFAULT_RETRY,
            error_for_status: false,
        }
    }
}

/// Partial transport options.
///
/// Overrides are layered: built-in defaults, then client-wide overrides,
/// then per-call overrides, the later layer winning field by field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendOverrides {
    /// Override the per-attempt timeout.
    pub timeout: Option<Duration>,
    /// Override the retry count.
    pub retry: Option<u32>,
    /// Override the non-2xx handling.
    pub error_for_status: Option<bool>,
}

impl SendOverrides {
    /// Resolve the override layers into concrete options.
    pub fn resolve(layers: &[SendOverrides]) -> SendOptions {
        let mut opts = SendOptions::default();
        for layer in layers {
            if let Some(v) = layer.timeout {
                opts.timeout = v;
            }
            if let Some(v) = layer.retry {
                opts.retry = v;
            }
            if let Some(v) = layer.error_for_status {
                opts.error_for_status = v;
            }
        }

        opts
    }
}
