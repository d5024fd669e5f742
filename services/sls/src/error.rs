//! Error type and error-envelope detection.

use crate::constants::X_LOG_REQUEST_ID;
use http::HeaderMap;
use serde::Deserialize;
use serde_json::Value;

/// Sentinel request id used when the response carries none.
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

/// The error type for log service operations.
///
/// Two disjoint failure kinds: [`Error::Service`] means the request was
/// delivered and the remote service rejected it at the application level;
/// everything else means the request could not be built, sent or decoded.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The remote service rejected the request.
    #[error("{code}: {message} (request id: {request_id})")]
    Service {
        /// Machine-readable error code from the envelope.
        code: String,
        /// Human-readable message from the envelope.
        message: String,
        /// Request id for diagnostics, [`UNKNOWN_REQUEST_ID`] when absent.
        request_id: String,
    },

    /// The request could not be built or completed at all. The inner kind
    /// distinguishes invalid requests from transport failures.
    #[error(transparent)]
    Request(#[from] logsign_core::Error),

    /// A JSON body could not be encoded or decoded.
    #[error("invalid json body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

// Header and uri construction failures are request-invalid core errors.
impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Error::Request(err.into())
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Error::Request(err.into())
    }
}

impl From<http::uri::InvalidUri> for Error {
    fn from(err: http::uri::InvalidUri) -> Self {
        Error::Request(err.into())
    }
}

#[derive(Deserialize)]
struct FlatEnvelope {
    #[serde(rename = "errorCode")]
    code: String,
    #[serde(rename = "errorMessage")]
    message: String,
}

#[derive(Deserialize)]
struct NestedEnvelope {
    #[serde(rename = "Error")]
    error: NestedError,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct NestedError {
    code: String,
    message: String,
    request_id: Option<String>,
}

/// Check a parsed JSON body for one of the two known error-envelope shapes.
///
/// The flat shape `{"errorCode": ..., "errorMessage": ...}` takes its
/// request id from the `x-log-requestid` response header; the nested shape
/// `{"Error": {"Code": ..., "Message": ..., "RequestId": ...}}` carries its
/// own. Empty code or message strings in the flat shape do not match.
pub(crate) fn detect_envelope(body: &Value, headers: &HeaderMap) -> Option<Error> {
    if let Ok(env) = FlatEnvelope::deserialize(body) {
        if !env.code.is_empty() && !env.message.is_empty() {
            let request_id = headers
                .get(X_LOG_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or(UNKNOWN_REQUEST_ID)
                .to_string();

            return Some(Error::Service {
                code: env.code,
                message: env.message,
                request_id,
            });
        }
    }

    if let Ok(env) = NestedEnvelope::deserialize(body) {
        return Some(Error::Service {
            code: env.error.code,
            message: env.error.message,
            request_id: env
                .error
                .request_id
                .unwrap_or_else(|| UNKNOWN_REQUEST_ID.to_string()),
        });
    }

    None
}
