use logsign_core::utils::Redact;
use std::fmt::{Debug, Formatter};

/// Credential that holds the access key pair for the log service.
#[derive(Default, Clone)]
pub struct Credential {
    /// Access key id for the log service.
    pub access_key_id: String,
    /// Access key secret for the log service.
    pub access_key_secret: String,
    /// Short-lived STS security token, sent as a dedicated header when
    /// present.
    pub security_token: Option<String>,
}

impl Credential {
    /// Create a new credential from an access key pair.
    pub fn new(access_key_id: &str, access_key_secret: &str) -> Self {
        Self {
            access_key_id: access_key_id.to_string(),
            access_key_secret: access_key_secret.to_string(),
            security_token: None,
        }
    }

    /// Set the security token.
    pub fn with_security_token(mut self, token: &str) -> Self {
        self.security_token = Some(token.to_string());
        self
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("access_key_secret", &Redact::from(&self.access_key_secret))
            .field("security_token", &Redact::from(&self.security_token))
            .finish()
    }
}
