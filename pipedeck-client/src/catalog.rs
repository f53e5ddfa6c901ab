//! Read-only catalog endpoints

use pipedeck_core::domain::agent::Agent;
use pipedeck_core::domain::template::RefactorTemplate;
use pipedeck_core::dto::agent::MonitoringSample;
use pipedeck_core::dto::dashboard::DashboardStats;

use crate::PipedeckClient;
use crate::error::Result;

impl PipedeckClient {
    /// List refactor templates
    pub async fn list_templates(&self) -> Result<Vec<RefactorTemplate>> {
        let response = self
            .client
            .get(self.url("/refactor-templates"))
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// List agents
    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        let response = self.client.get(self.url("/agents")).send().await?;
        self.handle_response(response).await
    }

    /// Latest agent monitoring samples; the server caps `limit` at 100
    pub async fn list_monitoring(&self, limit: Option<u32>) -> Result<Vec<MonitoringSample>> {
        let path = match limit {
            Some(limit) => format!("/agent-monitoring?limit={}", limit),
            None => "/agent-monitoring".to_string(),
        };
        let response = self.client.get(self.url(&path)).send().await?;
        self.handle_response(response).await
    }

    /// Dashboard counters
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let response = self.client.get(self.url("/dashboard/stats")).send().await?;
        self.handle_response(response).await
    }

    /// Task agent board payload
    pub async fn task_agents(&self) -> Result<serde_json::Value> {
        let response = self.client.get(self.url("/task-agents")).send().await?;
        self.handle_response(response).await
    }

    /// DMIAC metrics payload
    pub async fn dmiac_metrics(&self) -> Result<serde_json::Value> {
        let response = self.client.get(self.url("/dmiac-metrics")).send().await?;
        self.handle_response(response).await
    }
}
