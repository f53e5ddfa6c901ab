//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod catalog;
mod execution;
mod pipeline;
mod repo;

pub use catalog::{AgentCommands, TemplateCommands};
pub use execution::ExecutionCommands;
pub use pipeline::PipelineCommands;
pub use repo::RepoCommands;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Pipeline management
    Pipeline {
        #[command(subcommand)]
        command: PipelineCommands,
    },
    /// Trigger and inspect executions
    Execution {
        #[command(subcommand)]
        command: ExecutionCommands,
    },
    /// Source repositories
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },
    /// Refactor templates
    Template {
        #[command(subcommand)]
        command: TemplateCommands,
    },
    /// Deployed agents and their monitoring samples
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
    /// Show dashboard counters
    Dashboard,
    /// Check that the server is reachable
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = config.client();

    match command {
        Commands::Pipeline { command } => pipeline::handle_pipeline_command(command, &client).await,
        Commands::Execution { command } => {
            execution::handle_execution_command(command, &client).await
        }
        Commands::Repo { command } => repo::handle_repo_command(command, &client).await,
        Commands::Template { command } => catalog::handle_template_command(command, &client).await,
        Commands::Agent { command } => catalog::handle_agent_command(command, &client).await,
        Commands::Dashboard => catalog::show_dashboard(&client).await,
        Commands::Health => {
            client
                .health()
                .await
                .with_context(|| format!("Server at {} is not healthy", client.base_url()))?;
            println!("{} {}", "✓".green(), client.base_url());
            Ok(())
        }
    }
}
