//! Remote operations of the code-assistant service

use std::fmt;

/// Every operation either API flavor exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // legacy (IAM) API
    GenerateRecommendations,
    ListRecommendations,
    CreateCodeScan,
    CreateCodeScanUploadUrl,
    GetCodeScan,
    ListCodeScanFindings,

    // user (bearer) API
    GenerateCompletions,
    StartCodeAnalysis,
    CreateUploadUrl,
    GetCodeAnalysis,
    ListCodeAnalysisFindings,
    SendTelemetryEvent,
    ListAvailableCustomizations,
    ListFeatureEvaluations,
    StartTransformation,
    StopTransformation,
    ResumeTransformation,
    GetTransformation,
    GetTransformationPlan,
    StartCodeFixJob,
    GetCodeFixJob,
    StartTestGeneration,
    GetTestGeneration,
}

impl Operation {
    /// Name used in the `X-Amz-Target` header.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GenerateRecommendations => "GenerateRecommendations",
            Self::ListRecommendations => "ListRecommendations",
            Self::CreateCodeScan => "CreateCodeScan",
            Self::CreateCodeScanUploadUrl => "CreateCodeScanUploadUrl",
            Self::GetCodeScan => "GetCodeScan",
            Self::ListCodeScanFindings => "ListCodeScanFindings",
            Self::GenerateCompletions => "GenerateCompletions",
            Self::StartCodeAnalysis => "StartCodeAnalysis",
            Self::CreateUploadUrl => "CreateUploadUrl",
            Self::GetCodeAnalysis => "GetCodeAnalysis",
            Self::ListCodeAnalysisFindings => "ListCodeAnalysisFindings",
            Self::SendTelemetryEvent => "SendTelemetryEvent",
            Self::ListAvailableCustomizations => "ListAvailableCustomizations",
            Self::ListFeatureEvaluations => "ListFeatureEvaluations",
            Self::StartTransformation => "StartTransformation",
            Self::StopTransformation => "StopTransformation",
            Self::ResumeTransformation => "ResumeTransformation",
            Self::GetTransformation => "GetTransformation",
            Self::GetTransformationPlan => "GetTransformationPlan",
            Self::StartCodeFixJob => "StartCodeFixJob",
            Self::GetCodeFixJob => "GetCodeFixJob",
            Self::StartTestGeneration => "StartTestGeneration",
            Self::GetTestGeneration => "GetTestGeneration",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
