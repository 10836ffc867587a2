//! Code transformation job requests and responses
//!
//! Times are epoch seconds as the service sends them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformationStatus {
    Created,
    Accepted,
    Rejected,
    Started,
    Preparing,
    Prepared,
    Planning,
    Planned,
    Transforming,
    Transformed,
    Failed,
    Completed,
    PartiallyCompleted,
    Stopping,
    Stopped,
    Paused,
    Resumed,
    #[serde(other)]
    Unknown,
}

impl TransformationStatus {
    /// No further progress will be made on the job.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::Failed | Self::Completed | Self::PartiallyCompleted | Self::Stopped
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeEnvironment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationProjectState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_env: Option<RuntimeEnvironment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<TransformationProjectState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<TransformationProjectState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    pub upload_id: String,
    pub programming_language: crate::common::ProgrammingLanguage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTransformationRequest {
    pub workspace_state: WorkspaceState,
    pub transformation_spec: TransformationSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTransformationResponse {
    pub transformation_job_id: String,
}

/// Identifies a job for stop / get / plan lookups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationJobRequest {
    pub transformation_job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

impl TransformationJobRequest {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            transformation_job_id: job_id.into(),
            profile_arn: None,
        }
    }
}

pub type StopTransformationRequest = TransformationJobRequest;
pub type GetTransformationRequest = TransformationJobRequest;
pub type GetTransformationPlanRequest = TransformationJobRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTransformationResponse {
    pub transformation_status: TransformationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransformationUserActionStatus {
    Completed,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeTransformationRequest {
    pub transformation_job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_action_status: Option<TransformationUserActionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeTransformationResponse {
    pub transformation_status: TransformationStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationJob {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformation_spec: Option<TransformationSpec>,
    pub status: TransformationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_execution_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_execution_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransformationResponse {
    pub transformation_job: TransformationJob,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationProgressUpdate {
    pub name: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationStep {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_updates: Option<Vec<TransformationProgressUpdate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationPlan {
    #[serde(default)]
    pub transformation_steps: Vec<TransformationStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTransformationPlanResponse {
    pub transformation_plan: TransformationPlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_decodes_known_and_unknown() {
        let known: TransformationStatus = serde_json::from_str(r#""PARTIALLY_COMPLETED""#).unwrap();
        let unknown: TransformationStatus = serde_json::from_str(r#""SOMETHING_NEW""#).unwrap();
        assert_eq!(known, TransformationStatus::PartiallyCompleted);
        assert_eq!(unknown, TransformationStatus::Unknown);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(TransformationStatus::Completed.is_terminal());
        assert!(TransformationStatus::Stopped.is_terminal());
        assert!(!TransformationStatus::Transforming.is_terminal());
        assert!(!TransformationStatus::Unknown.is_terminal());
    }

    #[test]
    fn test_get_transformation_response_decodes() {
        let json = r#"{
            "transformationJob": {
                "jobId": "job-9",
                "status": "TRANSFORMING",
                "creationTime": 1718000000.25,
                "transformationSpec": {"source": {"language": "JAVA_8"}, "target": {"language": "JAVA_17"}}
            }
        }"#;
        let resp: GetTransformationResponse = serde_json::from_str(json).unwrap();
        let job = resp.transformation_job;
        assert_eq!(job.job_id.as_deref(), Some("job-9"));
        assert_eq!(job.status, TransformationStatus::Transforming);
        assert_eq!(job.creation_time, Some(1718000000.25));
        let spec = job.transformation_spec.unwrap();
        assert_eq!(spec.target.unwrap().language.as_deref(), Some("JAVA_17"));
    }

    #[test]
    fn test_plan_decodes_steps() {
        let json = r#"{"transformationPlan": {"transformationSteps": [
            {"id": "1", "name": "Update dependencies", "description": "bump", "status": "COMPLETED"},
            {"id": "2", "name": "Build", "progressUpdates": [{"name": "compile", "status": "IN_PROGRESS"}]}
        ]}}"#;
        let resp: GetTransformationPlanResponse = serde_json::from_str(json).unwrap();
        let steps = resp.transformation_plan.transformation_steps;
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[1].description, "");
        assert_eq!(steps[1].progress_updates.as_ref().unwrap()[0].name, "compile");
    }
}
