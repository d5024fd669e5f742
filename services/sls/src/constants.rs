// Header prefixes covered by the signature.
pub const X_LOG_PREFIX: &str = "x-log-";
pub const X_ACS_PREFIX: &str = "x-acs-";

// Headers produced on the wire.
pub const X_LOG_APIVERSION: &str = "x-log-apiversion";
pub const X_LOG_SIGNATUREMETHOD: &str = "x-log-signaturemethod";
pub const X_ACS_SECURITY_TOKEN: &str = "x-acs-security-token";
pub const CONTENT_MD5: &str = "content-md5";

// Response header carrying the request id for diagnostics.
pub const X_LOG_REQUEST_ID: &str = "x-log-requestid";

// Protocol markers.
pub const API_VERSION: &str = "0.6.0";
pub const SIGNATURE_METHOD: &str = "hmac-sha1";
pub const SIGN_SCHEME: &str = "LOG";
