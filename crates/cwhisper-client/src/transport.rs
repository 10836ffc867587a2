//! Service transport
//!
//! [`ServiceTransport`] is the seam between the façade and whatever actually
//! talks to the service. [`HttpTransport`] speaks the AWS JSON 1.0 protocol
//! over reqwest: one `POST` per attempt with the operation named in
//! `X-Amz-Target`, SigV4 signing for legacy handles, and a bounded retry loop
//! driven by the handle's [`RetryPolicy`](crate::handle::RetryPolicy).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::auth::Credentials;
use crate::error::{ClientError, ServiceError};
use crate::handle::{ClientHandle, Signing};
use crate::operation::Operation;
use crate::sigv4::{self, SignableRequest, SigningScope};

const TARGET_PREFIX: &str = "AWSCodeWhispererService";
const JSON_CONTENT_TYPE: &str = "application/x-amz-json-1.0";
const SIGNING_SERVICE: &str = "codewhisperer";
const REQUEST_ID_HEADER: &str = "x-amzn-requestid";
const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_BACKOFF: Duration = Duration::from_millis(100);
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// A successful reply: the decoded JSON body plus the service request id.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub body: Value,
    pub request_id: Option<String>,
}

#[async_trait]
pub trait ServiceTransport: Send + Sync {
    /// Invoke `operation` as described by `handle`, retrying per its policy.
    async fn send(
        &self,
        handle: &ClientHandle,
        operation: Operation,
        payload: Value,
    ) -> Result<ServiceResponse, ServiceError>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    http: reqwest::Client,
    base_backoff: Duration,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self::with_client(http))
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            base_backoff: DEFAULT_BACKOFF,
        }
    }

    /// Override the base delay between attempts (doubles per retry, capped at 2s).
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.base_backoff = base;
        self
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(MAX_BACKOFF)
    }

    async fn send_once(
        &self,
        handle: &ClientHandle,
        operation: Operation,
        url: &Url,
        body: &[u8],
        credentials: Option<&Credentials>,
    ) -> Result<ServiceResponse, ServiceError> {
        let mut headers: Vec<(String, String)> = vec![
            ("content-type".to_string(), JSON_CONTENT_TYPE.to_string()),
            (
                "x-amz-target".to_string(),
                format!("{TARGET_PREFIX}.{}", operation.name()),
            ),
        ];
        headers.extend(handle.headers.iter().cloned());

        if let Some(credentials) = credentials {
            let signature = sigv4::sign(
                &SignableRequest {
                    method: "POST",
                    url,
                    headers: &headers,
                    body,
                },
                &SigningScope {
                    credentials,
                    region: &handle.region,
                    service: SIGNING_SERVICE,
                    time: chrono::Utc::now(),
                },
            );
            headers.extend(signature);
        }

        let mut request = self.http.post(url.clone()).body(body.to_vec());
        for (name, value) in &headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let resp = request.send().await?;
        let status = resp.status();
        let request_id = header_value(&resp, REQUEST_ID_HEADER);
        let error_type = header_value(&resp, ERROR_TYPE_HEADER);
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(decode_error(status.as_u16(), error_type, &bytes, request_id));
        }

        let body = if bytes.is_empty() {
            Value::Object(Default::default())
        } else {
            serde_json::from_slice(&bytes).map_err(|e| {
                ServiceError::new("SerializationException", format!("invalid response body: {e}"))
                    .with_request_id(request_id.clone())
            })?
        };

        Ok(ServiceResponse { body, request_id })
    }
}

#[async_trait]
impl ServiceTransport for HttpTransport {
    async fn send(
        &self,
        handle: &ClientHandle,
        operation: Operation,
        payload: Value,
    ) -> Result<ServiceResponse, ServiceError> {
        let url = Url::parse(&handle.endpoint).map_err(|e| {
            ServiceError::new("InvalidEndpoint", format!("{}: {e}", handle.endpoint))
        })?;
        let body = serde_json::to_vec(&payload)
            .map_err(|e| ServiceError::new("SerializationException", e.to_string()))?;

        let mut attempt = 0;
        loop {
            let credentials = match &handle.signing {
                Signing::SigV4(signing) => Some(signing.credentials_for_attempt(attempt).await),
                Signing::Unsigned => None,
            };
            match self
                .send_once(handle, operation, &url, &body, credentials.as_ref())
                .await
            {
                Ok(resp) => {
                    debug!(%operation, request_id = ?resp.request_id, attempt, "request succeeded");
                    return Ok(resp);
                }
                Err(mut err) => {
                    handle.retry.on_retry(&mut err).await;
                    if !err.retryable || attempt >= handle.retry.max_retries {
                        debug!(%operation, code = %err.code, attempt, "request failed");
                        return Err(err);
                    }
                    let delay = self.backoff(attempt);
                    debug!(%operation, code = %err.code, attempt, ?delay, "retrying request");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

fn header_value(resp: &reqwest::Response, name: &str) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Build a [`ServiceError`] from a non-2xx JSON protocol response.
fn decode_error(
    status: u16,
    error_type: Option<String>,
    body: &[u8],
    request_id: Option<String>,
) -> ServiceError {
    let json: Option<Value> = serde_json::from_slice(body).ok();
    let field = |name: &str| {
        json.as_ref()
            .and_then(|j| j.get(name))
            .and_then(|v| v.as_str())
            .map(String::from)
    };

    let code = error_type
        .or_else(|| field("__type"))
        .or_else(|| field("code"))
        .map(|raw| sanitize_error_code(&raw))
        .unwrap_or_else(|| "UnknownError".to_string());

    let message = field("message")
        .or_else(|| field("Message"))
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    ServiceError::new(code, message)
        .with_status(status)
        .with_request_id(request_id)
}

/// `com.amazon.x#AccessDeniedException` / `AccessDeniedException:http://…` → `AccessDeniedException`
fn sanitize_error_code(raw: &str) -> String {
    let without_namespace = raw.rsplit('#').next().unwrap_or(raw);
    without_namespace
        .split(':')
        .next()
        .unwrap_or(without_namespace)
        .trim()
        .to_string()
}
