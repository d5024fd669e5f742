//! Reqwest based transport for logsign.
//!
//! [`ReqwestHttpSend`] delivers the signed request and honors the resolved
//! [`SendOptions`]: the timeout applies to each delivery attempt, transport
//! failures are retried up to the configured count, and non-2xx responses
//! are returned to the caller unless `error_for_status` is set.

use async_trait::async_trait;
use bytes::Bytes;
use log::debug;
use logsign_core::{HttpSend, SendOptions};
use reqwest::Client;

/// Send http requests with a `reqwest::Client`.
#[derive(Debug, Default)]
pub struct ReqwestHttpSend {
    client: Client,
}

impl ReqwestHttpSend {
    /// Create a new ReqwestHttpSend with a reqwest::Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn send_once(
        &self,
        req: &http::Request<Bytes>,
        opts: &SendOptions,
    ) -> anyhow::Result<http::Response<Bytes>> {
        let resp = self
            .client
            .request(req.method().clone(), req.uri().to_string())
            .headers(req.headers().clone())
            .body(req.body().clone())
            .timeout(opts.timeout)
            .send()
            .await?;

        let resp = if opts.error_for_status {
            resp.error_for_status()?
        } else {
            resp
        };

        let status = resp.status();
        let headers = resp.headers().clone();
        let bs = resp.bytes().await?;

        let mut response = http::Response::new(bs);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

#[async_trait]
impl HttpSend for ReqwestHttpSend {
    async fn http_send(
        &self,
        req: http::Request<Bytes>,
        opts: &SendOptions,
    ) -> anyhow::Result<http::Response<Bytes>> {
        let mut attempt = 0;
        loop {
            match self.send_once(&req, opts).await {
                Ok(resp) => return Ok(resp),
                Err(err) if attempt < opts.retry => {
                    attempt += 1;
                    debug!(
                        "send to {} failed: {err:?}, retrying ({attempt}/{})",
                        req.uri(),
                        opts.retry
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }
}
