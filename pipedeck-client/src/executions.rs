//! Execution-related API endpoints

use pipedeck_core::dto::execution::{CreateExecution, ExecutionDetails};
use uuid::Uuid;

use crate::PipedeckClient;
use crate::error::Result;

impl PipedeckClient {
    /// Trigger an execution; the server answers with the QUEUED record
    pub async fn trigger_execution(&self, req: CreateExecution) -> Result<ExecutionDetails> {
        let response = self
            .client
            .post(self.url("/pipeline-executions"))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List the most recent executions across all pipelines
    pub async fn list_executions(&self) -> Result<Vec<ExecutionDetails>> {
        let response = self
            .client
            .get(self.url("/pipeline-executions"))
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get an execution by ID
    pub async fn get_execution(&self, execution_id: Uuid) -> Result<ExecutionDetails> {
        let url = self.url(&format!("/pipeline-executions/{}", execution_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
