//! Code-assistant service client façade
//!
//! Every call decides, fresh, whether to talk to the bearer-token (user) API
//! or the IAM-signed (legacy) API, builds a handle for that one call, invokes
//! the matching remote operation and hands back the result unchanged.
//! Operations only the user API offers always go there.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use cwhisper_core::codefix::{
    GetCodeFixJobRequest, GetCodeFixJobResponse, StartCodeFixJobRequest, StartCodeFixJobResponse,
};
use cwhisper_core::recommendation::{
    GenerateRecommendationsRequest, GenerateRecommendationsResponse,
    ListAvailableCustomizationsRequest, ListAvailableCustomizationsResponse,
    ListRecommendationsRequest, ListRecommendationsResponse,
};
use cwhisper_core::scan::{
    CreateCodeScanRequest, CreateCodeScanResponse, CreateUploadUrlRequest, CreateUploadUrlResponse,
    GetCodeScanRequest, GetCodeScanResponse, ListCodeAnalysisFindingsRequest,
    ListCodeScanFindingsRequest, ListCodeScanFindingsResponse,
};
use cwhisper_core::telemetry::{
    ListFeatureEvaluationsRequest, ListFeatureEvaluationsResponse, OptOutPreference,
    SendTelemetryEventRequest, SendTelemetryEventResponse, UserContext,
};
use cwhisper_core::testgen::{
    GetTestGenerationRequest, GetTestGenerationResponse, StartTestGenerationRequest,
    StartTestGenerationResponse,
};
use cwhisper_core::transform::{
    GetTransformationPlanRequest, GetTransformationPlanResponse, GetTransformationRequest,
    GetTransformationResponse, ResumeTransformationRequest, ResumeTransformationResponse,
    StartTransformationRequest, StartTransformationResponse, StopTransformationRequest,
    StopTransformationResponse,
};

use crate::auth::AuthProvider;
use crate::error::ClientError;
use crate::handle::{ApiFlavor, ClientHandle, RetryHook, RetryPolicy, SigV4Signing, Signing};
use crate::operation::Operation;
use crate::settings::SettingsProvider;
use crate::transport::{ServiceResponse, ServiceTransport};

/// Header telling the service whether the user opted out of content sharing
pub const OPT_OUT_HEADER: &str = "x-amzn-codewhisperer-optout";

/// Retries for calls that don't choose their own count
pub const SDK_DEFAULT_MAX_RETRIES: u32 = 3;

/// Recommendations are interactive; a slow retry is worse than no answer
pub const RECOMMENDATION_MAX_RETRIES: u32 = 1;

/// Façade over the code-assistant service.
///
/// Holds no connection state of its own: auth, settings and transport are
/// consulted on every call, so a login or settings change applies to the next
/// request without rebuilding the client.
pub struct CodeWhispererClient {
    auth: Arc<dyn AuthProvider>,
    settings: Arc<dyn SettingsProvider>,
    transport: Arc<dyn ServiceTransport>,
}

impl CodeWhispererClient {
    /// Create a client over the given auth, settings and transport.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        settings: Arc<dyn SettingsProvider>,
        transport: Arc<dyn ServiceTransport>,
    ) -> Self {
        Self {
            auth,
            settings,
            transport,
        }
    }

    /// Whether the next call would go to the bearer-token API.
    pub fn is_bearer_token_auth(&self) -> bool {
        self.auth.is_bearer_token_auth()
    }

    /// Profile the caller is acting under, if any.
    pub fn active_profile_arn(&self) -> Option<String> {
        self.auth.active_profile_arn()
    }

    /// Handle for the IAM-signed API, re-authenticating on expired credentials.
    async fn legacy_handle(&self, max_retries: u32) -> Result<ClientHandle, ClientError> {
        let service = self.settings.service_config();
        let credentials = self.auth.credentials().await?;
        Ok(ClientHandle {
            flavor: ApiFlavor::Legacy,
            region: service.region,
            endpoint: service.endpoint,
            signing: Signing::SigV4(SigV4Signing::new(credentials, self.auth.clone())),
            headers: Vec::new(),
            retry: RetryPolicy::new(max_retries)
                .with_hook(RetryHook::ReauthenticateOnExpiry(self.auth.clone())),
        })
    }

    /// Handle for the bearer-token API.
    async fn user_handle(&self, max_retries: u32) -> Result<ClientHandle, ClientError> {
        let service = self.settings.service_config();
        let token = self.auth.bearer_token().await?;
        Ok(ClientHandle {
            flavor: ApiFlavor::User,
            region: service.region,
            endpoint: service.endpoint,
            signing: Signing::Unsigned,
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {token}")),
                ("Connection".to_string(), "keep-alive".to_string()),
            ],
            retry: RetryPolicy::new(max_retries),
        })
    }

    fn with_opt_out(&self, handle: ClientHandle) -> ClientHandle {
        let opted_out = self.settings.is_opt_out_enabled();
        handle.with_header(OPT_OUT_HEADER, opted_out.to_string())
    }

    async fn send<Req: Serialize>(
        &self,
        handle: &ClientHandle,
        operation: Operation,
        request: &Req,
    ) -> Result<ServiceResponse, ClientError> {
        let payload = serde_json::to_value(request)?;
        debug!(%operation, flavor = ?handle.flavor, "invoking service operation");
        Ok(self.transport.send(handle, operation, payload).await?)
    }

    async fn invoke<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        handle: &ClientHandle,
        operation: Operation,
        request: &Req,
    ) -> Result<Resp, ClientError> {
        let response = self.send(handle, operation, request).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    async fn invoke_user<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        operation: Operation,
        request: &Req,
    ) -> Result<Resp, ClientError> {
        let handle = self.user_handle(SDK_DEFAULT_MAX_RETRIES).await?;
        self.invoke(&handle, operation, request).await
    }

    /// Batch recommendation generation. Always goes to the legacy API.
    pub async fn generate_recommendations(
        &self,
        request: &GenerateRecommendationsRequest,
    ) -> Result<GenerateRecommendationsResponse, ClientError> {
        let handle = self.legacy_handle(SDK_DEFAULT_MAX_RETRIES).await?;
        self.invoke(&handle, Operation::GenerateRecommendations, request)
            .await
    }

    /// Inline recommendations; `GenerateCompletions` under bearer auth, `ListRecommendations` otherwise.
    pub async fn list_recommendations(
        &self,
        request: &ListRecommendationsRequest,
    ) -> Result<ListRecommendationsResponse, ClientError> {
        if self.auth.is_bearer_token_auth() {
            let handle = self
                .with_opt_out(self.user_handle(RECOMMENDATION_MAX_RETRIES).await?);
            self.invoke(&handle, Operation::GenerateCompletions, request)
                .await
        } else {
            let handle = self
                .with_opt_out(self.legacy_handle(RECOMMENDATION_MAX_RETRIES).await?);
            self.invoke(&handle, Operation::ListRecommendations, request)
                .await
        }
    }

    /// Start a security scan; `StartCodeAnalysis` under bearer auth, `CreateCodeScan` otherwise.
    pub async fn create_code_scan(
        &self,
        request: &CreateCodeScanRequest,
    ) -> Result<CreateCodeScanResponse, ClientError> {
        if self.auth.is_bearer_token_auth() {
            self.invoke_user(Operation::StartCodeAnalysis, request).await
        } else {
            let handle = self.legacy_handle(SDK_DEFAULT_MAX_RETRIES).await?;
            self.invoke(&handle, Operation::CreateCodeScan, request).await
        }
    }

    /// Presigned upload URL for scan artifacts; `CreateUploadUrl` under bearer auth,
    /// `CreateCodeScanUploadUrl` otherwise.
    pub async fn create_upload_url(
        &self,
        request: &CreateUploadUrlRequest,
    ) -> Result<CreateUploadUrlResponse, ClientError> {
        if self.auth.is_bearer_token_auth() {
            self.invoke_user(Operation::CreateUploadUrl, request).await
        } else {
            let handle = self.legacy_handle(SDK_DEFAULT_MAX_RETRIES).await?;
            self.invoke(&handle, Operation::CreateCodeScanUploadUrl, request)
                .await
        }
    }

    /// Status of a scan job; `GetCodeAnalysis` under bearer auth, `GetCodeScan` otherwise.
    pub async fn get_code_scan(
        &self,
        request: &GetCodeScanRequest,
    ) -> Result<GetCodeScanResponse, ClientError> {
        if self.auth.is_bearer_token_auth() {
            self.invoke_user(Operation::GetCodeAnalysis, request).await
        } else {
            let handle = self.legacy_handle(SDK_DEFAULT_MAX_RETRIES).await?;
            self.invoke(&handle, Operation::GetCodeScan, request).await
        }
    }

    /// List scan findings. Under bearer auth the request is remapped to the
    /// analysis shape, pinned to the analysis findings schema and tagged with
    /// `profile_arn`; the legacy API gets the request as given.
    pub async fn list_code_scan_findings(
        &self,
        request: &ListCodeScanFindingsRequest,
        profile_arn: Option<String>,
    ) -> Result<ListCodeScanFindingsResponse, ClientError> {
        if self.auth.is_bearer_token_auth() {
            let remapped = ListCodeAnalysisFindingsRequest::from_scan_request(request, profile_arn);
            self.invoke_user(Operation::ListCodeAnalysisFindings, &remapped)
                .await
        } else {
            let handle = self.legacy_handle(SDK_DEFAULT_MAX_RETRIES).await?;
            self.invoke(&handle, Operation::ListCodeScanFindings, request)
                .await
        }
    }

    /// Send one telemetry event.
    ///
    /// Nothing is sent (and `Ok(None)` returned) unless an enterprise SSO
    /// connection is active or telemetry is enabled. Sent events carry the
    /// opt-out preference, user context and active profile.
    pub async fn send_telemetry_event(
        &self,
        request: SendTelemetryEventRequest,
    ) -> Result<Option<SendTelemetryEventResponse>, ClientError> {
        if !self.auth.is_valid_enterprise_sso_in_use() && !self.settings.telemetry_enabled() {
            debug!("telemetry disabled, dropping event");
            return Ok(None);
        }

        let request = SendTelemetryEventRequest {
            opt_out_preference: Some(OptOutPreference::from_opt_out(
                self.settings.is_opt_out_enabled(),
            )),
            user_context: Some(self.user_context()),
            profile_arn: self.auth.active_profile_arn(),
            ..request
        };

        let handle = self.user_handle(SDK_DEFAULT_MAX_RETRIES).await?;
        let response = self
            .send(&handle, Operation::SendTelemetryEvent, &request)
            .await?;
        debug!(request_id = ?response.request_id, "sendTelemetryEvent");

        let mut decoded: SendTelemetryEventResponse = serde_json::from_value(response.body)?;
        decoded.request_id = response.request_id;
        Ok(Some(decoded))
    }

    fn user_context(&self) -> UserContext {
        UserContext::new(&self.settings.ide(), self.settings.client_id())
    }

    /// Customizations the caller may use. User API only.
    pub async fn list_available_customizations(
        &self,
        request: &ListAvailableCustomizationsRequest,
    ) -> Result<ListAvailableCustomizationsResponse, ClientError> {
        self.invoke_user(Operation::ListAvailableCustomizations, request)
            .await
    }

    /// Feature flag evaluations for this client. User API only.
    pub async fn list_feature_evaluations(
        &self,
    ) -> Result<ListFeatureEvaluationsResponse, ClientError> {
        let request = ListFeatureEvaluationsRequest {
            user_context: self.user_context(),
            profile_arn: self.auth.active_profile_arn(),
        };
        self.invoke_user(Operation::ListFeatureEvaluations, &request)
            .await
    }

    /// Start a code transformation job. User API only.
    pub async fn start_transformation(
        &self,
        request: &StartTransformationRequest,
    ) -> Result<StartTransformationResponse, ClientError> {
        self.invoke_user(Operation::StartTransformation, request).await
    }

    /// Ask a running transformation job to stop. User API only.
    pub async fn stop_transformation(
        &self,
        request: &StopTransformationRequest,
    ) -> Result<StopTransformationResponse, ClientError> {
        self.invoke_user(Operation::StopTransformation, request).await
    }

    /// Resume a transformation job waiting on a user action. User API only.
    pub async fn resume_transformation(
        &self,
        request: &ResumeTransformationRequest,
    ) -> Result<ResumeTransformationResponse, ClientError> {
        self.invoke_user(Operation::ResumeTransformation, request)
            .await
    }

    /// Details of a transformation job. User API only.
    pub async fn get_transformation(
        &self,
        request: &GetTransformationRequest,
    ) -> Result<GetTransformationResponse, ClientError> {
        self.invoke_user(Operation::GetTransformation, request).await
    }

    /// Steps planned for a transformation job. User API only.
    pub async fn get_transformation_plan(
        &self,
        request: &GetTransformationPlanRequest,
    ) -> Result<GetTransformationPlanResponse, ClientError> {
        self.invoke_user(Operation::GetTransformationPlan, request)
            .await
    }

    /// Start a code fix job for a finding. User API only.
    pub async fn start_code_fix_job(
        &self,
        request: &StartCodeFixJobRequest,
    ) -> Result<StartCodeFixJobResponse, ClientError> {
        self.invoke_user(Operation::StartCodeFixJob, request).await
    }

    /// Status and suggestion of a code fix job. User API only.
    pub async fn get_code_fix_job(
        &self,
        request: &GetCodeFixJobRequest,
    ) -> Result<GetCodeFixJobResponse, ClientError> {
        self.invoke_user(Operation::GetCodeFixJob, request).await
    }

    /// Start a unit test generation job. User API only.
    pub async fn start_test_generation(
        &self,
        request: &StartTestGenerationRequest,
    ) -> Result<StartTestGenerationResponse, ClientError> {
        self.invoke_user(Operation::StartTestGeneration, request)
            .await
    }

    /// Status of a test generation job. User API only.
    pub async fn get_test_generation(
        &self,
        request: &GetTestGenerationRequest,
    ) -> Result<GetTestGenerationResponse, ClientError> {
        self.invoke_user(Operation::GetTestGeneration, request).await
    }
}
