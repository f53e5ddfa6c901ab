//! Source repository domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A source code repository pipelines can be attached to
///
/// Unique on (owner, name). The access token is stored but never sent back
/// over the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: Uuid,
    pub name: String,
    pub owner: String,
    pub url: String,
    pub branch: String,
    #[serde(skip_serializing, default)]
    pub token: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Repository {
    /// `owner/name`, the way repositories are referred to in listings
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_not_serialized() {
        let now = chrono::Utc::now();
        let repo = Repository {
            id: Uuid::new_v4(),
            name: "pipeline-demo-app".to_string(),
            owner: "demo-org".to_string(),
            url: "https://github.com/demo-org/pipeline-demo-app".to_string(),
            branch: "main".to_string(),
            token: Some("ghp_secret".to_string()),
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&repo).unwrap();
        assert!(json.get("token").is_none());
        assert_eq!(json["isActive"], true);
        assert_eq!(repo.full_name(), "demo-org/pipeline-demo-app");
    }
}
