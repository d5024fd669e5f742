//! Signed client for Aliyun Simple Log Service (SLS).
//!
//! The service authenticates callers without a handshake: every request
//! carries an `authorization` header computed as HMAC-SHA1 over a canonical
//! byte string built from the request itself. This crate implements that
//! protocol and a thin client on top of it.
//!
//! ## Overview
//!
//! - [`canonicalized_resource`] and [`canonicalized_headers`] build the
//!   deterministic byte strings that get signed.
//! - [`string_to_sign`] and [`authorization`] combine them with the
//!   [`Credential`] into the signature token.
//! - [`Client`] assembles, signs and issues requests through the transport
//!   configured on its [`Context`][logsign_core::Context], and turns a
//!   recognized error envelope in the response into [`Error::Service`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use logsign_core::Context;
//! use logsign_http_send_reqwest::ReqwestHttpSend;
//! use logsign_sls::{Client, Config, GetLogsQuery};
//!
//! # async fn example() -> logsign_sls::Result<()> {
//! let ctx = Context::new().with_http_send(ReqwestHttpSend::default());
//!
//! let client = Client::new(
//!     ctx,
//!     Config {
//!         endpoint: "cn-hangzhou.log.aliyuncs.com".to_string(),
//!         access_key_id: "your-access-key-id".to_string(),
//!         access_key_secret: "your-access-key-secret".to_string(),
//!         ..Default::default()
//!     },
//! )?;
//!
//! let rows = client
//!     .get_logs(
//!         "my-project",
//!         "my-logstore",
//!         &GetLogsQuery {
//!             from: 1_700_000_000,
//!             to: 1_700_003_600,
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Credential rotation
//!
//! The credential is a shared mutable cell: [`Client::update_credential`]
//! rotates the whole triple atomically with respect to calls that start
//! afterwards. A call already in flight keeps the credential it read.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod canonical;
pub use canonical::{canonicalized_headers, canonicalized_resource, QueryValue};

mod credential;
pub use credential::Credential;

mod sign;
pub use sign::{authorization, string_to_sign};

mod request;
pub use request::RequestSpec;

mod error;
pub use error::{Error, Result, UNKNOWN_REQUEST_ID};

mod model;
pub use model::{GetLogsEntry, GetLogsQuery, LogData, LogEntry};

mod client;
pub use client::{ApiBody, Client, Config};
