//! Pipedeck HTTP Client
//!
//! A small, type-safe HTTP client for the Pipedeck server API, used by the
//! `pipedeck` CLI.
//!
//! # Example
//!
//! ```no_run
//! use pipedeck_client::PipedeckClient;
//! use pipedeck_core::domain::execution::TriggerType;
//! use pipedeck_core::domain::pipeline::PipelineType;
//! use pipedeck_core::dto::execution::CreateExecution;
//! use pipedeck_core::dto::pipeline::CreatePipeline;
//!
//! # async fn example() -> pipedeck_client::Result<()> {
//! let client = PipedeckClient::new("http://localhost:8080");
//!
//! let pipeline = client
//!     .create_pipeline(CreatePipeline::new("nightly", PipelineType::CiCd))
//!     .await?;
//! let execution = client
//!     .trigger_execution(CreateExecution::new(pipeline.pipeline.id, TriggerType::Manual))
//!     .await?;
//!
//! println!("Queued execution {}", execution.execution.id);
//! # Ok(())
//! # }
//! ```

pub mod error;
mod catalog;
mod executions;
mod pipelines;
mod repos;

// Re-export commonly used types
pub use error::{ClientError, Result};

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Pipedeck server API
///
/// Methods are grouped by resource:
/// - Pipelines (create, list, get, executions, feedback, export)
/// - Executions (trigger, list, get)
/// - Repositories (register, list)
/// - Catalog (templates, agents, monitoring, dashboard, fixtures)
#[derive(Debug, Clone)]
pub struct PipedeckClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl PipedeckClient {
    /// Create a new client
    ///
    /// # Example
    /// ```
    /// use pipedeck_client::PipedeckClient;
    ///
    /// let client = PipedeckClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check that the server is up
    pub async fn health(&self) -> Result<()> {
        let response = self.client.get(self.url("/health")).send().await?;
        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("{} {}", status.as_u16(), response.url());

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::from_body(status.as_u16(), &body));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not needed
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::from_body(status.as_u16(), &body));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = PipedeckClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/pipelines"), "http://localhost:8080/pipelines");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = PipedeckClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_request_error() {
        let client = PipedeckClient::new("http://127.0.0.1:1");
        let err = client.health().await.unwrap_err();
        assert!(matches!(err, ClientError::RequestFailed(_)));
    }
}
