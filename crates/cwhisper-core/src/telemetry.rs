//! Telemetry events and the common fields decorating them

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::ProgrammingLanguage;

/// Product name reported in the user context
pub const PRODUCT: &str = "CodeWhisperer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OptOutPreference {
    OptIn,
    OptOut,
}

impl OptOutPreference {
    pub fn from_opt_out(opted_out: bool) -> Self {
        if opted_out { Self::OptOut } else { Self::OptIn }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperatingSystem {
    Mac,
    Windows,
    Linux,
}

impl OperatingSystem {
    /// The OS this process runs on; anything that is not macOS or Windows reports as Linux.
    pub fn current() -> Self {
        Self::from_target(std::env::consts::OS)
    }

    fn from_target(os: &str) -> Self {
        match os {
            "macos" => Self::Mac,
            "windows" => Self::Windows,
            _ => Self::Linux,
        }
    }
}

/// The editor (or tool) the client is running in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeIdentity {
    pub category: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub ide_category: String,
    pub operating_system: OperatingSystem,
    pub product: String,
    pub client_id: String,
    pub ide_version: String,
}

impl UserContext {
    pub fn new(ide: &IdeIdentity, client_id: impl Into<String>) -> Self {
        Self {
            ide_category: ide.category.clone(),
            operating_system: OperatingSystem::current(),
            product: PRODUCT.to_string(),
            client_id: client_id.into(),
            ide_version: ide.version.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTriggerDecisionEvent {
    pub session_id: String,
    pub request_id: String,
    pub programming_language: ProgrammingLanguage,
    pub completion_type: String,
    pub suggestion_state: String,
    pub recommendation_latency_milliseconds: f64,
    /// Epoch seconds
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion_reference_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCoverageEvent {
    pub programming_language: ProgrammingLanguage,
    pub accepted_character_count: u64,
    pub total_character_count: u64,
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserModificationEvent {
    pub session_id: String,
    pub request_id: String,
    pub programming_language: ProgrammingLanguage,
    pub modification_percentage: f64,
    pub timestamp: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeScanEvent {
    pub programming_language: ProgrammingLanguage,
    pub code_scan_job_id: String,
    pub timestamp: f64,
}

/// Exactly one event kind per request, keyed by its name on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TelemetryEvent {
    UserTriggerDecisionEvent(UserTriggerDecisionEvent),
    CodeCoverageEvent(CodeCoverageEvent),
    UserModificationEvent(UserModificationEvent),
    CodeScanEvent(CodeScanEvent),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTelemetryEventRequest {
    pub telemetry_event: TelemetryEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_out_preference: Option<OptOutPreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_context: Option<UserContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

impl SendTelemetryEventRequest {
    pub fn new(telemetry_event: TelemetryEvent) -> Self {
        Self {
            telemetry_event,
            client_token: None,
            opt_out_preference: None,
            user_context: None,
            profile_arn: None,
        }
    }
}

/// The service returns an empty body; only the request id is of interest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendTelemetryEventResponse {
    #[serde(skip)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFeatureEvaluationsRequest {
    pub user_context: UserContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureEvaluation {
    pub feature: String,
    pub variation: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFeatureEvaluationsResponse {
    #[serde(default)]
    pub feature_evaluations: Vec<FeatureEvaluation>,
}
