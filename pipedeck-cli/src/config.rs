//! Configuration module
//!
//! Handles CLI configuration.

use pipedeck_client::PipedeckClient;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the Pipedeck server
    pub server_url: String,
}

impl Config {
    /// Client bound to the configured server
    pub fn client(&self) -> PipedeckClient {
        PipedeckClient::new(&self.server_url)
    }
}
