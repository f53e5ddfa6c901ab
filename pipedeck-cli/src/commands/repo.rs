//! Repository command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use pipedeck_client::PipedeckClient;
use pipedeck_core::dto::repository::CreateRepository;

/// Repository subcommands
#[derive(Subcommand)]
pub enum RepoCommands {
    /// List repositories with their pipeline counts
    List,
    /// Register a repository
    Create {
        /// Repository name
        #[arg(short, long)]
        name: String,

        /// Owning user or organisation
        #[arg(short, long)]
        owner: String,

        /// Clone URL
        #[arg(short, long)]
        url: String,

        /// Default branch (server default: main)
        #[arg(short, long)]
        branch: Option<String>,

        /// Access token, stored but never shown again
        #[arg(long, env = "PIPEDECK_REPO_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

/// Handle repository commands
pub async fn handle_repo_command(command: RepoCommands, client: &PipedeckClient) -> Result<()> {
    match command {
        RepoCommands::List => list_repositories(client).await,
        RepoCommands::Create {
            name,
            owner,
            url,
            branch,
            token,
        } => {
            let req = CreateRepository {
                name: Some(name),
                owner: Some(owner),
                url: Some(url),
                branch,
                token,
                is_active: None,
            };
            create_repository(client, req).await
        }
    }
}

async fn list_repositories(client: &PipedeckClient) -> Result<()> {
    let repos = client.list_repositories().await?;

    if repos.is_empty() {
        println!("{}", "No repositories found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} repository(ies):", repos.len()).bold()
    );
    println!();

    for summary in &repos {
        let repo = &summary.repository;
        println!(
            "  {} {}/{} {}",
            "▸".cyan(),
            repo.owner,
            repo.name.bold(),
            format!("({})", repo.branch).dimmed()
        );
        println!("    ID:        {}", repo.id.to_string().dimmed());
        println!("    URL:       {}", repo.url);
        println!("    Pipelines: {}", summary.pipeline_count);
        if !repo.is_active {
            println!("    {}", "inactive".red());
        }
        println!();
    }

    Ok(())
}

async fn create_repository(client: &PipedeckClient, req: CreateRepository) -> Result<()> {
    let repo = match client.create_repository(req).await {
        Ok(repo) => repo,
        Err(e) if e.is_conflict() => {
            println!("{}", "✗ Repository already registered".red().bold());
            return Err(e.into());
        }
        Err(e) => return Err(e).context("Failed to create repository"),
    };

    println!("{}", "✓ Repository created".green().bold());
    println!("  ID:     {}", repo.id.to_string().cyan());
    println!("  Name:   {}/{}", repo.owner, repo.name);
    println!("  Branch: {}", repo.branch);

    Ok(())
}
