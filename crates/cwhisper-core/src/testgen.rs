//! Unit test generation job requests and responses

use serde::{Deserialize, Serialize};

use crate::common::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TestGenerationJobStatus {
    InProgress,
    Failed,
    Completed,
}

/// A file (and optionally line ranges in it) to generate tests for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCode {
    pub relative_target_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_line_range_list: Option<Vec<Range>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTestGenerationRequest {
    pub upload_id: String,
    pub target_code_list: Vec<TargetCode>,
    pub user_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_generation_job_group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestGenerationJob {
    pub test_generation_job_id: String,
    pub test_generation_job_group_name: String,
    pub status: TestGenerationJobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_status_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTestGenerationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_generation_job: Option<TestGenerationJob>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTestGenerationRequest {
    pub test_generation_job_group_name: String,
    pub test_generation_job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTestGenerationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_generation_job: Option<TestGenerationJob>,
}
