//! Pipeline-related API endpoints

use pipedeck_core::domain::execution::PipelineExecution;
use pipedeck_core::domain::feedback::PipelineFeedback;
use pipedeck_core::dto::pipeline::{
    CreatePipeline, PipelineDetails, PipelineExport, PipelineSummary,
};
use uuid::Uuid;

use crate::PipedeckClient;
use crate::error::Result;

impl PipedeckClient {
    /// Create a new pipeline
    pub async fn create_pipeline(&self, req: CreatePipeline) -> Result<PipelineDetails> {
        let response = self
            .client
            .post(self.url("/pipelines"))
            .json(&req)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// List all pipelines, newest first
    pub async fn list_pipelines(&self) -> Result<Vec<PipelineSummary>> {
        let response = self.client.get(self.url("/pipelines")).send().await?;
        self.handle_response(response).await
    }

    /// Get a pipeline by ID
    pub async fn get_pipeline(&self, pipeline_id: Uuid) -> Result<PipelineDetails> {
        let url = self.url(&format!("/pipelines/{}", pipeline_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List the executions of a pipeline
    pub async fn list_pipeline_executions(
        &self,
        pipeline_id: Uuid,
    ) -> Result<Vec<PipelineExecution>> {
        let url = self.url(&format!("/pipelines/{}/executions", pipeline_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// List the feedback left on a pipeline
    pub async fn list_pipeline_feedback(&self, pipeline_id: Uuid) -> Result<Vec<PipelineFeedback>> {
        let url = self.url(&format!("/pipelines/{}/feedback", pipeline_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Render a pipeline config into files
    pub async fn export_pipeline(&self, pipeline_id: Uuid) -> Result<PipelineExport> {
        let url = self.url(&format!("/pipelines/{}/export", pipeline_id));
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
