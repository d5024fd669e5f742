//! Core components for signing and sending Simple Log Service requests.
//!
//! This crate carries the pieces shared by every logsign crate:
//!
//! - [`HttpSend`]: the transport seam. The signing layer never talks to the
//!   network directly; it hands a fully assembled `http::Request` to an
//!   `HttpSend` implementation together with resolved [`SendOptions`].
//! - [`Context`]: a small container holding the transport implementation.
//! - [`Error`]: the error type for everything that is not an application
//!   level rejection by the remote service (those live in the service crate).
//!
//! Utility modules:
//!
//! - [`hash`]: HMAC-SHA1, MD5 and base64 helpers used by the signer.
//! - [`time`]: HTTP-date formatting for the `date` header and sign-string.
//! - [`utils`]: data redaction for credential debug output.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;

mod http;
pub use http::{HttpSend, SendOptions, SendOverrides};

mod error;
pub use error::{Error, ErrorKind, Result};
