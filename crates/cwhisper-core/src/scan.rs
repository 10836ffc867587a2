//! Code scan (security analysis) requests and responses
//!
//! The legacy API speaks of "code scans", the user API of "code analysis";
//! the payloads are the same apart from the findings listing, which the user
//! API takes as [`ListCodeAnalysisFindingsRequest`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::ProgrammingLanguage;

/// Findings schema the legacy API returns by default
pub const CODE_SCAN_FINDINGS_SCHEMA: &str = "codescan/findings/1.0";

/// Findings schema requested from the user API
pub const CODE_ANALYSIS_FINDINGS_SCHEMA: &str = "codeanalysis/findings/1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArtifactType {
    SourceCode,
    BuiltJars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CodeScanScope {
    Full,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeScanStatus {
    Completed,
    Pending,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCodeScanRequest {
    /// Upload id per artifact type
    pub artifacts: BTreeMap<ArtifactType, String>,
    pub programming_language: ProgrammingLanguage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<CodeScanScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_scan_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCodeScanResponse {
    pub job_id: String,
    pub status: CodeScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadIntent {
    Transformation,
    TaskAssistPlanning,
    AutomaticFileSecurityScan,
    FullProjectSecurityScan,
    UnitTestsGeneration,
    CodeFixGeneration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadUrlRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<ArtifactType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_intent: Option<UploadIntent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadUrlResponse {
    pub upload_id: String,
    pub upload_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kms_key_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCodeScanRequest {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCodeScanResponse {
    pub status: CodeScanStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Findings listing as the legacy API takes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCodeScanFindingsRequest {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    pub code_scan_findings_schema: String,
}

impl ListCodeScanFindingsRequest {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            next_token: None,
            code_scan_findings_schema: CODE_SCAN_FINDINGS_SCHEMA.to_string(),
        }
    }
}

/// Findings listing as the user API takes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCodeAnalysisFindingsRequest {
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    pub code_analysis_findings_schema: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

impl ListCodeAnalysisFindingsRequest {
    /// Remap a legacy findings request, pinning the analysis findings schema.
    pub fn from_scan_request(request: &ListCodeScanFindingsRequest, profile_arn: Option<String>) -> Self {
        Self {
            job_id: request.job_id.clone(),
            next_token: request.next_token.clone(),
            code_analysis_findings_schema: CODE_ANALYSIS_FINDINGS_SCHEMA.to_string(),
            profile_arn,
        }
    }
}

/// Findings page; `findings` holds the JSON document the service returns as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCodeScanFindingsResponse {
    #[serde(rename = "codeScanFindings", alias = "codeAnalysisFindings")]
    pub findings: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
