//! Sign-string construction and the authorization token.

use crate::canonical::canonicalized_headers;
use crate::constants::{CONTENT_MD5, SIGN_SCHEME};
use crate::credential::Credential;
use http::header::{HeaderName, CONTENT_TYPE, DATE};
use http::{HeaderMap, Method};
use log::debug;
use logsign_core::hash::base64_hmac_sha1;
use logsign_core::Result;
use std::fmt::Write;

/// Construct the string to sign.
///
/// # Format
///
/// ```text
///   VERB + "\n"
/// + Content-MD5 + "\n"
/// + Content-Type + "\n"
/// + Date + "\n"
/// + CanonicalizedHeaders + "\n"
/// + CanonicalizedResource
/// ```
///
/// Every slot is written even when its value is absent: an empty slot
/// contributes an empty line, so the string always contains exactly five
/// newlines. The headers passed in must be the exact set that will be
/// transmitted, minus `authorization` itself, which is the output of this
/// step and cannot canonicalize itself.
pub fn string_to_sign(method: &Method, headers: &HeaderMap, resource: &str) -> Result<String> {
    #[inline]
    fn get_or_default<'a>(h: &'a HeaderMap, key: &HeaderName) -> Result<&'a str> {
        match h.get(key) {
            Some(v) => Ok(v.to_str()?),
            None => Ok(""),
        }
    }

    let mut s = String::new();
    writeln!(&mut s, "{}", method.as_str())?;
    writeln!(&mut s, "{}", get_or_default(headers, &CONTENT_MD5.parse()?)?)?;
    writeln!(&mut s, "{}", get_or_default(headers, &CONTENT_TYPE)?)?;
    writeln!(&mut s, "{}", get_or_default(headers, &DATE)?)?;
    writeln!(&mut s, "{}", canonicalized_headers(headers))?;
    write!(&mut s, "{resource}")?;

    debug!("string to sign: {}", &s);
    Ok(s)
}

/// Compute the authorization token for a sign-string.
///
/// ```text
/// LOG <access_key_id>:<base64(hmac-sha1(access_key_secret, string_to_sign))>
/// ```
pub fn authorization(cred: &Credential, string_to_sign: &str) -> String {
    let signature = base64_hmac_sha1(
        cred.access_key_secret.as_bytes(),
        string_to_sign.as_bytes(),
    );

    format!("{SIGN_SCHEME} {}:{}", cred.access_key_id, signature)
}
