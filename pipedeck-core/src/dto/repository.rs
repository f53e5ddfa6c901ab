//! Repository DTOs

use serde::{Deserialize, Serialize};

use crate::domain::repository::Repository;

/// Request to register a repository
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRepository {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Validated repository creation input
#[derive(Debug, Clone)]
pub struct NewRepository {
    pub name: String,
    pub owner: String,
    pub url: String,
    pub branch: String,
    pub token: Option<String>,
    pub is_active: bool,
}

/// Repository listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    #[serde(flatten)]
    pub repository: Repository,
    pub pipeline_count: i64,
}
