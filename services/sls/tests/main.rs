use async_trait::async_trait;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use logsign_core::{Context, HttpSend, SendOptions, SendOverrides};
use logsign_sls::{
    authorization, string_to_sign, ApiBody, Client, Config, Credential, Error, GetLogsQuery,
    LogData, LogEntry, RequestSpec,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Transport stub that records every delivery and answers with a canned
/// response.
#[derive(Debug, Clone)]
struct MockHttpSend {
    status: u16,
    headers: Vec<(&'static str, &'static str)>,
    body: &'static str,
    sent: Arc<Mutex<Vec<(http::Request<Bytes>, SendOptions)>>>,
}

impl MockHttpSend {
    fn new(status: u16, headers: &[(&'static str, &'static str)], body: &'static str) -> Self {
        Self {
            status,
            headers: headers.to_vec(),
            body,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn sent(&self) -> Arc<Mutex<Vec<(http::Request<Bytes>, SendOptions)>>> {
        self.sent.clone()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(
        &self,
        req: http::Request<Bytes>,
        opts: &SendOptions,
    ) -> anyhow::Result<http::Response<Bytes>> {
        self.sent.lock().unwrap().push((req, *opts));

        let mut resp = http::Response::new(Bytes::from_static(self.body.as_bytes()));
        *resp.status_mut() = http::StatusCode::from_u16(self.status)?;
        for (name, value) in &self.headers {
            resp.headers_mut().insert(
                name.parse::<http::HeaderName>()?,
                http::HeaderValue::from_static(value),
            );
        }
        Ok(resp)
    }
}

/// Transport stub that fails every delivery.
#[derive(Debug)]
struct FailingHttpSend;

#[async_trait]
impl HttpSend for FailingHttpSend {
    async fn http_send(
        &self,
        _: http::Request<Bytes>,
        _: &SendOptions,
    ) -> anyhow::Result<http::Response<Bytes>> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

fn mock_client(transport: impl HttpSend, security_token: Option<&str>) -> Client {
    let _ = env_logger::builder().is_test(true).try_init();

    let ctx = Context::new().with_http_send(transport);
    Client::new(
        ctx,
        Config {
            endpoint: "cn-hangzhou.log.aliyuncs.com".to_string(),
            access_key_id: "mock_access_key_id".to_string(),
            access_key_secret: "mock_access_key_secret".to_string(),
            security_token: security_token.map(|v| v.to_string()),
            send: SendOverrides::default(),
        },
    )
    .expect("client must build")
}

#[tokio::test]
async fn test_put_logs_assembles_signed_request() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(200, &[], "");
    let sent = mock.sent();
    let client = mock_client(mock, Some("mock_security_token"));

    let mut content = Map::new();
    content.insert("level".to_string(), Value::from("info"));
    let data = LogData {
        logs: vec![LogEntry::new(content)],
        ..Default::default()
    };

    client.put_logs("my-project", "app", &data).await?;

    let sent = sent.lock().unwrap();
    let (req, _) = &sent[0];

    assert_eq!(req.method(), Method::POST);
    assert_eq!(
        req.uri().to_string(),
        "http://my-project.cn-hangzhou.log.aliyuncs.com/logstores/app"
    );
    assert_eq!(
        req.body(),
        &Bytes::from_static(br#"{"__logs__":[{"level":"info"}]}"#)
    );

    let headers = req.headers();
    assert_eq!(headers[CONTENT_TYPE], "application/json");
    assert_eq!(headers["x-log-apiversion"], "0.6.0");
    assert_eq!(headers["x-log-signaturemethod"], "hmac-sha1");
    assert_eq!(headers["x-acs-security-token"], "mock_security_token");
    assert_eq!(headers["content-length"], "31");
    assert_eq!(headers["content-md5"], "868C6C52B73DA62100506722A9A20216");
    assert!(headers.contains_key("date"));

    // Recompute the token over the transmitted header set: the signature
    // must cover exactly what went on the wire.
    let cred = Credential::new("mock_access_key_id", "mock_access_key_secret");
    let expected = authorization(
        &cred,
        &string_to_sign(&Method::POST, headers, "/logstores/app")?,
    );
    assert_eq!(headers[AUTHORIZATION], expected.as_str());

    Ok(())
}

#[tokio::test]
async fn test_get_logs_builds_url_and_decodes_rows() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(
        200,
        &[("content-type", "application/json")],
        r#"[{"__topic__":"app","__source__":"10.0.0.1","__time__":"1700000000","__time_ns_part__":"0","level":"warn"}]"#,
    );
    let sent = mock.sent();
    let client = mock_client(mock, None);

    let rows = client
        .get_logs(
            "my-project",
            "app",
            &GetLogsQuery {
                from: 100,
                to: 200,
                line: Some(1),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].topic, "app");
    assert_eq!(rows[0].fields.get("level"), Some(&Value::from("warn")));

    let sent = sent.lock().unwrap();
    let (req, _) = &sent[0];
    assert_eq!(req.method(), Method::GET);
    assert_eq!(
        req.uri().to_string(),
        "http://my-project.cn-hangzhou.log.aliyuncs.com/logstores/app?type=log&from=100&to=200&line=1"
    );
    assert!(!req.headers().contains_key("content-md5"));

    Ok(())
}

#[tokio::test]
async fn test_flat_error_envelope_is_raised() {
    let mock = MockHttpSend::new(
        401,
        &[
            ("content-type", "application/json"),
            ("x-log-requestid", "abc123"),
        ],
        r#"{"errorCode":"Unauthorized","errorMessage":"bad signature"}"#,
    );
    let client = mock_client(mock, None);

    let res = client
        .issue(RequestSpec::new(Method::GET, "/logstores/app"))
        .await;

    match res {
        Err(Error::Service {
            code,
            message,
            request_id,
        }) => {
            assert_eq!(code, "Unauthorized");
            assert_eq!(message, "bad signature");
            assert_eq!(request_id, "abc123");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_nested_error_envelope_uses_body_request_id() {
    let mock = MockHttpSend::new(
        400,
        &[
            ("content-type", "application/json"),
            ("x-log-requestid", "from-header"),
        ],
        r#"{"Error":{"Code":"InvalidParameter","Message":"bad topic","RequestId":"xyz"}}"#,
    );
    let client = mock_client(mock, None);

    let res = client
        .issue(RequestSpec::new(Method::GET, "/logstores/app"))
        .await;

    match res {
        Err(Error::Service {
            code, request_id, ..
        }) => {
            assert_eq!(code, "InvalidParameter");
            assert_eq!(request_id, "xyz");
        }
        other => panic!("expected service error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_response_passes_through() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(200, &[("content-type", "text/plain")], "ok");
    let client = mock_client(mock, None);

    let body = client
        .issue(RequestSpec::new(Method::GET, "/logstores/app"))
        .await?;
    assert_eq!(body, ApiBody::Text("ok".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_plain_json_response_is_returned() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(
        200,
        &[("content-type", "application/json")],
        r#"{"count":2,"progress":"Complete"}"#,
    );
    let client = mock_client(mock, None);

    let body = client
        .issue(RequestSpec::new(Method::GET, "/logstores/app"))
        .await?;
    assert_eq!(
        body,
        ApiBody::Json(json!({"count": 2, "progress": "Complete"}))
    );

    Ok(())
}

#[tokio::test]
async fn test_credential_rotation_is_visible_to_later_calls() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(200, &[("content-type", "text/plain")], "ok");
    let sent = mock.sent();
    let client = mock_client(mock, None);

    client
        .issue(RequestSpec::new(Method::GET, "/logstores/app"))
        .await?;

    client.update_credential("rotated_id", "rotated_secret", Some("rotated_token"));

    client
        .issue(RequestSpec::new(Method::GET, "/logstores/app"))
        .await?;

    let sent = sent.lock().unwrap();
    let (first, _) = &sent[0];
    let (second, _) = &sent[1];

    assert!(!first.headers().contains_key("x-acs-security-token"));
    assert_eq!(second.headers()["x-acs-security-token"], "rotated_token");

    let rotated = Credential::new("rotated_id", "rotated_secret");
    let stale = Credential::new("mock_access_key_id", "mock_access_key_secret");
    let sign_string = string_to_sign(&Method::GET, second.headers(), "/logstores/app")?;
    assert_eq!(
        second.headers()[AUTHORIZATION],
        authorization(&rotated, &sign_string).as_str()
    );
    assert_ne!(
        second.headers()[AUTHORIZATION],
        authorization(&stale, &sign_string).as_str()
    );

    Ok(())
}

#[tokio::test]
async fn test_send_options_layering() -> anyhow::Result<()> {
    let mock = MockHttpSend::new(200, &[("content-type", "text/plain")], "ok");
    let sent = mock.sent();

    let _ = env_logger::builder().is_test(true).try_init();
    let ctx = Context::new().with_http_send(mock);
    let client = Client::new(
        ctx,
        Config {
            endpoint: "cn-hangzhou.log.aliyuncs.com".to_string(),
            access_key_id: "mock_access_key_id".to_string(),
            access_key_secret: "mock_access_key_secret".to_string(),
            security_token: None,
            send: SendOverrides {
                retry: Some(0),
                ..Default::default()
            },
        },
    )?;

    let spec = RequestSpec::new(Method::GET, "/logstores/app").send_overrides(SendOverrides {
        timeout: Some(Duration::from_secs(9)),
        ..Default::default()
    });
    client.issue(spec).await?;

    let sent = sent.lock().unwrap();
    let (_, opts) = &sent[0];
    assert_eq!(
        *opts,
        SendOptions {
            timeout: Duration::from_secs(9),
            retry: 0,
            error_for_status: false,
        }
    );

    Ok(())
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let client = mock_client(FailingHttpSend, None);

    let res = client
        .issue(RequestSpec::new(Method::GET, "/logstores/app"))
        .await;

    match res {
        Err(Error::Request(err)) => {
            assert_eq!(err.kind(), logsign_core::ErrorKind::TransportFailed);
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_path_must_start_with_slash() {
    let client = mock_client(MockHttpSend::new(200, &[], ""), None);

    let res = client
        .issue(RequestSpec::new(Method::GET, "logstores/app"))
        .await;

    match res {
        Err(Error::Request(err)) => {
            assert_eq!(err.kind(), logsign_core::ErrorKind::RequestInvalid);
        }
        other => panic!("expected invalid request, got {other:?}"),
    }
}
