//! Repository-related API endpoints

use pipedeck_core::domain::repository::Repository;
use pipedeck_core::dto::repository::{CreateRepository, RepositorySummary};

use crate::PipedeckClient;
use crate::error::Result;

impl PipedeckClient {
    /// Register a source repository
    pub async fn create_repository(&self, req: CreateRepository) -> Result<Repository> {
        let response = self
            .client
            .post(self.url("/repositories"))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List registered repositories
    pub async fn list_repositories(&self) -> Result<Vec<RepositorySummary>> {
        let response = self.client.get(self.url("/repositories")).send().await?;
        self.handle_response(response).await
    }
}
