use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::json;

use cwhisper_client::auth::{AuthProvider, Credentials, EnvAuth};
use cwhisper_client::error::ACCESS_DENIED;
use cwhisper_client::handle::{
    ApiFlavor, ClientHandle, RetryHook, RetryPolicy, SigV4Signing, Signing,
};
use cwhisper_client::operation::Operation;
use cwhisper_client::settings::FileSettings;
use cwhisper_client::transport::{HttpTransport, ServiceTransport};
use cwhisper_client::{CodeWhispererClient, CredentialProviderError};
use cwhisper_core::config::Settings;
use cwhisper_core::common::ProgrammingLanguage;
use cwhisper_core::recommendation::{FileContext, ListRecommendationsRequest};
use cwhisper_core::scan::{CodeScanStatus, GetCodeScanRequest};

fn transport() -> HttpTransport {
    HttpTransport::with_client(reqwest::Client::new()).with_backoff(Duration::ZERO)
}

fn handle(server: &MockServer, signing: Signing, retry: RetryPolicy) -> ClientHandle {
    ClientHandle {
        flavor: ApiFlavor::Legacy,
        region: "us-east-1".into(),
        endpoint: server.url("/"),
        signing,
        headers: Vec::new(),
        retry,
    }
}

fn sigv4(auth: Arc<dyn AuthProvider>) -> Signing {
    Signing::SigV4(SigV4Signing::new(Credentials::new("AKID", "secret"), auth))
}

#[derive(Default)]
struct CountingAuth {
    reauths: AtomicUsize,
}

#[async_trait]
impl AuthProvider for CountingAuth {
    fn is_bearer_token_auth(&self) -> bool {
        false
    }
    async fn credentials(&self) -> Result<Credentials, CredentialProviderError> {
        Ok(Credentials::new("AKID", "secret"))
    }
    async fn bearer_token(&self) -> Result<String, CredentialProviderError> {
        Err(CredentialProviderError::missing_token("iam only"))
    }
    fn active_profile_arn(&self) -> Option<String> {
        None
    }
    fn is_valid_enterprise_sso_in_use(&self) -> bool {
        false
    }
    async fn reauthenticate(&self) -> Result<(), CredentialProviderError> {
        self.reauths.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn test_json_protocol_request_shape() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/")
                .header("content-type", "application/x-amz-json-1.0")
                .header("x-amz-target", "AWSCodeWhispererService.GetCodeScan")
                .header("x-custom", "1")
                .json_body(json!({"jobId": "job-1"}));
            then.status(200)
                .header("x-amzn-requestid", "rid-42")
                .json_body(json!({"status": "Completed"}));
        })
        .await;

    let handle = handle(&server, Signing::Unsigned, RetryPolicy::new(0)).with_header("x-custom", "1");
    let resp = transport()
        .send(&handle, Operation::GetCodeScan, json!({"jobId": "job-1"}))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resp.body["status"], "Completed");
    assert_eq!(resp.request_id.as_deref(), Some("rid-42"));
}

#[tokio::test]
async fn test_sigv4_headers_attached() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .header_exists("authorization")
                .header_exists("x-amz-date");
            then.status(200).body("");
        })
        .await;

    let handle = handle(
        &server,
        sigv4(Arc::new(CountingAuth::default())),
        RetryPolicy::new(0),
    );
    let resp = transport()
        .send(&handle, Operation::ListRecommendations, json!({}))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resp.body, json!({}));
}

#[tokio::test]
async fn test_server_errors_retried_up_to_limit() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(500)
                .json_body(json!({"__type": "InternalServerException", "message": "boom"}));
        })
        .await;

    let handle = handle(&server, Signing::Unsigned, RetryPolicy::new(2));
    let err = transport()
        .send(&handle, Operation::GetCodeScan, json!({}))
        .await
        .unwrap_err();

    assert_eq!(mock.hits_async().await, 3);
    assert_eq!(err.code, "InternalServerException");
    assert_eq!(err.status, Some(500));
}

#[tokio::test]
async fn test_client_errors_not_retried() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(400)
                .header("x-amzn-errortype", "ValidationException:http://internal/")
                .json_body(json!({"message": "bad input"}));
        })
        .await;

    let handle = handle(&server, Signing::Unsigned, RetryPolicy::new(3));
    let err = transport()
        .send(&handle, Operation::GetCodeScan, json!({}))
        .await
        .unwrap_err();

    assert_eq!(mock.hits_async().await, 1);
    assert_eq!(err.code, "ValidationException");
    assert_eq!(err.message, "bad input");
}

#[tokio::test]
async fn test_expired_credentials_reauthenticate_and_retry() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(403).json_body(json!({
                "__type": format!("com.amazon.coral#{ACCESS_DENIED}"),
                "message": "The security token included in the request is expired",
            }));
        })
        .await;

    let auth = Arc::new(CountingAuth::default());
    let retry = RetryPolicy::new(1).with_hook(RetryHook::ReauthenticateOnExpiry(auth.clone()));
    let handle = handle(&server, sigv4(auth.clone()), retry);
    let err = transport()
        .send(&handle, Operation::ListRecommendations, json!({}))
        .await
        .unwrap_err();

    assert_eq!(mock.hits_async().await, 2);
    assert_eq!(auth.reauths.load(Ordering::SeqCst), 2);
    assert_eq!(err.code, ACCESS_DENIED);
    assert!(err.retryable);
}

/// Signs with `OLDKEY` until re-authenticated, `NEWKEY` afterwards.
#[derive(Default)]
struct RotatingAuth {
    rotated: AtomicBool,
    reauths: AtomicUsize,
}

#[async_trait]
impl AuthProvider for RotatingAuth {
    fn is_bearer_token_auth(&self) -> bool {
        false
    }
    async fn credentials(&self) -> Result<Credentials, CredentialProviderError> {
        let key = if self.rotated.load(Ordering::SeqCst) {
            "NEWKEY"
        } else {
            "OLDKEY"
        };
        Ok(Credentials::new(key, "secret"))
    }
    async fn bearer_token(&self) -> Result<String, CredentialProviderError> {
        Err(CredentialProviderError::missing_token("iam only"))
    }
    fn active_profile_arn(&self) -> Option<String> {
        None
    }
    fn is_valid_enterprise_sso_in_use(&self) -> bool {
        false
    }
    async fn reauthenticate(&self) -> Result<(), CredentialProviderError> {
        self.reauths.fetch_add(1, Ordering::SeqCst);
        self.rotated.store(true, Ordering::SeqCst);
        Ok(())
    }
}

fn signed_with(req: &HttpMockRequest, access_key: &str) -> bool {
    let credential = format!("Credential={access_key}/");
    req.headers.iter().flatten().any(|(name, value)| {
        name.eq_ignore_ascii_case("authorization") && value.contains(&credential)
    })
}

fn signed_with_old_key(req: &HttpMockRequest) -> bool {
    signed_with(req, "OLDKEY")
}

fn signed_with_new_key(req: &HttpMockRequest) -> bool {
    signed_with(req, "NEWKEY")
}

#[tokio::test]
async fn test_legacy_call_recovers_after_credentials_rotate() {
    let server = MockServer::start_async().await;
    let expired = server
        .mock_async(|when, then| {
            when.method(POST).matches(signed_with_old_key);
            then.status(403).json_body(json!({
                "__type": format!("com.amazon.coral#{ACCESS_DENIED}"),
                "message": "The security token included in the request is expired",
            }));
        })
        .await;
    let accepted = server
        .mock_async(|when, then| {
            when.method(POST)
                .header("x-amz-target", "AWSCodeWhispererService.ListRecommendations")
                .matches(signed_with_new_key);
            then.status(200).json_body(json!({
                "recommendations": [{"content": "}"}],
            }));
        })
        .await;

    let settings = Settings {
        endpoint: Some(server.url("/")),
        ..Settings::default()
    };
    let auth = Arc::new(RotatingAuth::default());
    let client = CodeWhispererClient::new(
        auth.clone(),
        Arc::new(FileSettings::new(settings)),
        Arc::new(transport()),
    );

    let resp = client
        .list_recommendations(&ListRecommendationsRequest::new(FileContext {
            filename: "main.rs".into(),
            programming_language: ProgrammingLanguage::new("rust"),
            left_file_content: "fn main() {\n".into(),
            right_file_content: String::new(),
        }))
        .await
        .unwrap();

    assert_eq!(resp.recommendations[0].content, "}");
    assert_eq!(expired.hits_async().await, 1);
    assert_eq!(accepted.hits_async().await, 1);
    assert_eq!(auth.reauths.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_facade_end_to_end_with_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .header("authorization", "Bearer tok-e2e")
                .header("x-amz-target", "AWSCodeWhispererService.GetCodeAnalysis")
                .json_body(json!({"jobId": "job-9"}));
            then.status(200).json_body(json!({"status": "Pending"}));
        })
        .await;

    let settings = Settings {
        endpoint: Some(server.url("/")),
        ..Settings::default()
    };
    let auth = EnvAuth::from_lookup(|key| (key == "CWHISPER_BEARER_TOKEN").then(|| "tok-e2e".to_string()));
    let client = CodeWhispererClient::new(
        Arc::new(auth),
        Arc::new(FileSettings::new(settings)),
        Arc::new(transport()),
    );

    let resp = client
        .get_code_scan(&GetCodeScanRequest {
            job_id: "job-9".into(),
            profile_arn: None,
        })
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resp.status, CodeScanStatus::Pending);
}
