use crate::canonical::{canonicalized_resource, QueryValue};
use crate::constants::*;
use crate::credential::Credential;
use crate::error::{detect_envelope, Result};
use crate::model::{GetLogsEntry, GetLogsQuery, LogData};
use crate::request::RequestSpec;
use crate::sign::{authorization, string_to_sign};
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, DATE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use log::debug;
use logsign_core::hash::hex_md5_uppercase;
use logsign_core::time::{format_http_date, now};
use logsign_core::{Context, Error as CoreError, SendOverrides};
use serde_json::Value;
use std::sync::{Arc, RwLock};

/// Configuration for a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Endpoint host of the log service region, e.g.
    /// `cn-hangzhou.log.aliyuncs.com`.
    pub endpoint: String,
    /// Access key id.
    pub access_key_id: String,
    /// Access key secret.
    pub access_key_secret: String,
    /// STS security token.
    pub security_token: Option<String>,
    /// Client-wide transport overrides, applied to every call unless the
    /// call overrides them again.
    pub send: SendOverrides,
}

/// Body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// The response declared JSON content and parsed cleanly.
    Json(Value),
    /// Anything else, passed through as text without interpretation.
    Text(String),
}

/// Signed client for the log service.
///
/// The client owns the credential cell. [`Client::update_credential`]
/// rotates all three fields at once; every [`Client::issue`] call reads the
/// cell exactly once before building its sign-string, so a rotation is
/// either fully visible to a call or not at all, never mixed into it.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    endpoint: String,
    credential: Arc<RwLock<Credential>>,
    send: SendOverrides,
}

impl Client {
    /// Create a new client from a context and configuration.
    pub fn new(ctx: Context, config: Config) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(CoreError::config_invalid("endpoint is required").into());
        }

        let mut credential = Credential::new(&config.access_key_id, &config.access_key_secret);
        credential.security_token = config.security_token;

        Ok(Self {
            ctx,
            endpoint: config.endpoint,
            credential: Arc::new(RwLock::new(credential)),
            send: config.send,
        })
    }

    /// Rotate the credential.
    ///
    /// All three fields are overwritten under one lock, so a call that
    /// starts after this returns sees the new triple in full. A call that
    /// already read the credential keeps signing with the old one.
    pub fn update_credential(
        &self,
        access_key_id: &str,
        access_key_secret: &str,
        security_token: Option<&str>,
    ) {
        let mut cred = self.credential.write().expect("lock poisoned");
        cred.access_key_id = access_key_id.to_string();
        cred.access_key_secret = access_key_secret.to_string();
        cred.security_token = security_token.map(|v| v.to_string());
    }

    /// Sign and issue one request.
    ///
    /// Builds the default header set, injects content hash and security
    /// token headers, signs the assembled request and hands it to the
    /// transport. The response is returned as parsed JSON or raw text;
    /// a recognized error envelope becomes [`Error::Service`].
    ///
    /// [`Error::Service`]: crate::Error::Service
    pub async fn issue(&self, mut spec: RequestSpec) -> Result<ApiBody> {
        if !spec.path.starts_with('/') {
            return Err(CoreError::request_invalid(format!(
                "path must start with '/', got {:?}",
                spec.path
            ))
            .into());
        }

        // Read the credential once, before anything is signed. A rotation
        // landing after this point has no effect on this call.
        let cred = self.credential.read().expect("lock poisoned").clone();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(DATE, format_http_date(now()).parse()?);
        headers.insert(X_LOG_APIVERSION, HeaderValue::from_static(API_VERSION));
        headers.insert(
            X_LOG_SIGNATUREMETHOD,
            HeaderValue::from_static(SIGNATURE_METHOD),
        );

        // Overlay caller headers, caller wins on conflict.
        let mut prev: Option<HeaderName> = None;
        for (name, value) in std::mem::take(&mut spec.headers) {
            match name {
                Some(name) => {
                    headers.insert(name.clone(), value);
                    prev = Some(name);
                }
                None => {
                    if let Some(name) = &prev {
                        headers.append(name.clone(), value);
                    }
                }
            }
        }

        if let Some(token) = &cred.security_token {
            headers.insert(X_ACS_SECURITY_TOKEN, token.parse()?);
        }

        if let Some(body) = &spec.body {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
            headers.insert(
                CONTENT_MD5.parse::<HeaderName>()?,
                hex_md5_uppercase(body).parse()?,
            );
        }

        // The signature covers the exact header set assembled so far; the
        // authorization header is injected afterwards since it is the output
        // of this step.
        let resource = canonicalized_resource(&spec.path, &spec.queries);
        let string_to_sign = string_to_sign(&spec.method, &headers, &resource)?;
        let mut auth: HeaderValue = authorization(&cred, &string_to_sign).parse()?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let url = self.build_url(&spec);
        debug!("issuing {} {}", spec.method, url);

        let mut req = http::Request::new(spec.body.unwrap_or_default());
        *req.method_mut() = spec.method;
        *req.uri_mut() = url.parse()?;
        *req.headers_mut() = headers;

        let opts = SendOverrides::resolve(&[self.send, spec.send]);
        let resp = self.ctx.http_send(req, &opts).await?;

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.starts_with("application/json") {
            let text = String::from_utf8_lossy(resp.body()).to_string();
            return Ok(ApiBody::Text(text));
        }

        let body: Value = serde_json::from_slice(resp.body())?;
        if let Some(err) = detect_envelope(&body, resp.headers()) {
            return Err(err);
        }

        Ok(ApiBody::Json(body))
    }

    /// Ingest a batch of log records into a logstore.
    pub async fn put_logs(&self, project: &str, logstore: &str, data: &LogData) -> Result<()> {
        let body = serde_json::to_vec(&data.to_body())?;

        let spec = RequestSpec::new(Method::POST, format!("/logstores/{logstore}"))
            .project(project)
            .body(Bytes::from(body));
        self.issue(spec).await?;

        Ok(())
    }

    /// Fetch log rows from a logstore within a time range.
    pub async fn get_logs(
        &self,
        project: &str,
        logstore: &str,
        query: &GetLogsQuery,
    ) -> Result<Vec<GetLogsEntry>> {
        let value = self
            .query_logstore(project, logstore, "log", query)
            .await?;

        Ok(serde_json::from_value(value)?)
    }

    /// Fetch the histogram of matching logs within a time range.
    pub async fn get_histograms(
        &self,
        project: &str,
        logstore: &str,
        query: &GetLogsQuery,
    ) -> Result<Value> {
        self.query_logstore(project, logstore, "histogram", query)
            .await
    }

    async fn query_logstore(
        &self,
        project: &str,
        logstore: &str,
        kind: &str,
        query: &GetLogsQuery,
    ) -> Result<Value> {
        let mut spec = RequestSpec::new(Method::GET, format!("/logstores/{logstore}"))
            .project(project)
            .query("type", kind);
        spec.queries.extend(query.to_queries());

        match self.issue(spec).await? {
            ApiBody::Json(value) => Ok(value),
            ApiBody::Text(_) => {
                Err(CoreError::unexpected("expected a json response from log query").into())
            }
        }
    }

    fn build_url(&self, spec: &RequestSpec) -> String {
        let project = spec
            .project
            .as_deref()
            .map(|p| format!("{p}."))
            .unwrap_or_default();

        format!(
            "http://{project}{}{}{}",
            self.endpoint,
            spec.path,
            wire_query(&spec.queries)
        )
    }
}

/// Form-urlencode the query pairs for the wire.
///
/// This serialization is independent of the canonicalized resource: it
/// preserves caller order and percent-escapes values, while the canonical
/// form sorts and leaves values unescaped. Both come from the same pairs.
fn wire_query(queries: &[(String, QueryValue)]) -> String {
    if queries.is_empty() {
        return String::new();
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (k, v) in queries {
        serializer.append_pair(k, &v.to_string());
    }

    format!("?{}", serializer.finish())
}
