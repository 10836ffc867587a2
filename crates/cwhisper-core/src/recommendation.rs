//! Inline recommendation requests and responses
//!
//! The legacy API answers `ListRecommendations` with `recommendations`; the
//! user API answers the same request shape from `GenerateCompletions` with
//! `completions`. Both decode into [`ListRecommendationsResponse`].

use serde::{Deserialize, Serialize};

use crate::common::{ProgrammingLanguage, Reference, ReferenceTrackerConfiguration};

/// The code around the cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileContext {
    pub filename: String,
    pub programming_language: ProgrammingLanguage,
    pub left_file_content: String,
    pub right_file_content: String,
}

/// Extra context from other files in the workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementalContext {
    pub file_path: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<Vec<Reference>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRecommendationsRequest {
    pub file_context: FileContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRecommendationsResponse {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecommendationsRequest {
    pub file_context: FileContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_tracker_configuration: Option<ReferenceTrackerConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplemental_contexts: Option<Vec<SupplementalContext>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

impl ListRecommendationsRequest {
    pub fn new(file_context: FileContext) -> Self {
        Self {
            file_context,
            max_results: None,
            next_token: None,
            reference_tracker_configuration: None,
            supplemental_contexts: None,
            customization_arn: None,
            profile_arn: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRecommendationsResponse {
    #[serde(default, alias = "completions")]
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    pub arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAvailableCustomizationsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_arn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAvailableCustomizationsResponse {
    #[serde(default)]
    pub customizations: Vec<Customization>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}
