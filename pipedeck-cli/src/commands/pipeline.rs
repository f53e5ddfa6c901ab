//! Pipeline command handlers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use pipedeck_client::PipedeckClient;
use pipedeck_core::domain::pipeline::PipelineType;
use pipedeck_core::dto::pipeline::{CreatePipeline, PipelineDetails};
use uuid::Uuid;

use super::execution::print_execution_summary;
use crate::id_resolver::resolve_pipeline_id;
use crate::types::IdOrPrefix;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// List all pipelines
    List,
    /// Get pipeline details
    Get {
        /// Pipeline ID or unambiguous prefix
        id: IdOrPrefix,
    },
    /// Create a new pipeline
    Create {
        /// Pipeline name
        #[arg(short, long)]
        name: String,

        /// CI_CD, DMIAC, REFACTOR or COMBINED
        #[arg(short = 't', long = "type")]
        pipeline_type: PipelineType,

        /// Description
        #[arg(short, long)]
        description: Option<String>,

        /// Path to a JSON file holding the pipeline config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Repository to attach the pipeline to
        #[arg(short, long)]
        repository: Option<Uuid>,

        /// Mark the pipeline as a template
        #[arg(long)]
        template: bool,
    },
    /// Render a pipeline's exportable files
    Export {
        /// Pipeline ID or unambiguous prefix
        id: IdOrPrefix,

        /// Write the files under this directory instead of printing them
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// List executions of a pipeline
    Executions {
        /// Pipeline ID or unambiguous prefix
        id: IdOrPrefix,
    },
    /// List feedback left on a pipeline
    Feedback {
        /// Pipeline ID or unambiguous prefix
        id: IdOrPrefix,
    },
}

/// Handle pipeline commands
pub async fn handle_pipeline_command(
    command: PipelineCommands,
    client: &PipedeckClient,
) -> Result<()> {
    match command {
        PipelineCommands::List => list_pipelines(client).await,
        PipelineCommands::Get { id } => get_pipeline(client, &id).await,
        PipelineCommands::Create {
            name,
            pipeline_type,
            description,
            config,
            repository,
            template,
        } => {
            let mut req = CreatePipeline::new(name, pipeline_type);
            req.description = description;
            req.repository_id = repository;
            req.is_template = template.then_some(true);
            if let Some(path) = config {
                req.config = Some(read_config(&path)?);
            }
            create_pipeline(client, req).await
        }
        PipelineCommands::Export { id, out } => export_pipeline(client, &id, out).await,
        PipelineCommands::Executions { id } => list_executions(client, &id).await,
        PipelineCommands::Feedback { id } => list_feedback(client, &id).await,
    }
}

fn read_config(path: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Config file is not valid JSON: {}", path.display()))
}

async fn list_pipelines(client: &PipedeckClient) -> Result<()> {
    let pipelines = client.list_pipelines().await?;

    if pipelines.is_empty() {
        println!("{}", "No pipelines found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} pipeline(s):", pipelines.len()).bold()
    );
    println!();

    for summary in &pipelines {
        let pipeline = &summary.pipeline;
        println!(
            "  {} {} {}",
            "▸".cyan(),
            pipeline.name.bold(),
            format!("[{}]", pipeline.pipeline_type).dimmed()
        );
        println!("    ID:         {}", pipeline.id.to_string().dimmed());
        if let Some(repo) = &summary.repository {
            println!("    Repository: {}/{}", repo.owner, repo.name);
        }
        println!("    Executions: {}", summary.execution_count);
        if !pipeline.is_active {
            println!("    {}", "inactive".red());
        }
        println!();
    }

    Ok(())
}

async fn get_pipeline(client: &PipedeckClient, id: &IdOrPrefix) -> Result<()> {
    let uuid = resolve_pipeline_id(client, id).await?;
    let details = client.get_pipeline(uuid).await?;

    print_pipeline_details(&details);

    Ok(())
}

async fn create_pipeline(client: &PipedeckClient, req: CreatePipeline) -> Result<()> {
    let details = client
        .create_pipeline(req)
        .await
        .context("Failed to create pipeline")?;

    println!("{}", "✓ Pipeline created".green().bold());
    println!("  ID:   {}", details.pipeline.id.to_string().cyan());
    println!("  Name: {}", details.pipeline.name);
    println!("  Type: {}", details.pipeline.pipeline_type);

    Ok(())
}

async fn export_pipeline(
    client: &PipedeckClient,
    id: &IdOrPrefix,
    out: Option<PathBuf>,
) -> Result<()> {
    let uuid = resolve_pipeline_id(client, id).await?;
    let export = client.export_pipeline(uuid).await?;

    let Some(dir) = out else {
        for file in &export.files {
            println!("{}", format!("# {}", file.path).bold());
            println!("{}", file.content);
        }
        return Ok(());
    };

    for file in &export.files {
        let target = dir.join(&file.path);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&target, &file.content)
            .with_context(|| format!("Failed to write file: {}", target.display()))?;
        println!("  {} {}", "✓".green(), target.display());
    }

    Ok(())
}

async fn list_executions(client: &PipedeckClient, id: &IdOrPrefix) -> Result<()> {
    let uuid = resolve_pipeline_id(client, id).await?;
    let executions = client.list_pipeline_executions(uuid).await?;

    if executions.is_empty() {
        println!("{}", "No executions found for this pipeline.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} execution(s):", executions.len()).bold()
    );
    println!();
    for execution in &executions {
        print_execution_summary(execution, None);
    }

    Ok(())
}

async fn list_feedback(client: &PipedeckClient, id: &IdOrPrefix) -> Result<()> {
    let uuid = resolve_pipeline_id(client, id).await?;
    let feedback = client.list_pipeline_feedback(uuid).await?;

    if feedback.is_empty() {
        println!("{}", "No feedback for this pipeline.".yellow());
        return Ok(());
    }

    for entry in &feedback {
        println!(
            "  {} {} {} {}",
            "▸".cyan(),
            stars(entry.rating).yellow(),
            entry.category.to_string().dimmed(),
            entry.user_id
        );
        if let Some(comment) = &entry.comment {
            println!("    {}", comment);
        }
    }

    Ok(())
}

fn print_pipeline_details(details: &PipelineDetails) {
    let pipeline = &details.pipeline;

    println!("{}", "Pipeline Details".bold().underline());
    println!();
    println!("  {}  {}", "ID:".bold(), pipeline.id);
    println!("  {}  {}", "Name:".bold(), pipeline.name);
    println!("  {}  {}", "Type:".bold(), pipeline.pipeline_type);
    if let Some(description) = &pipeline.description {
        println!("  {}  {}", "Description:".bold(), description);
    }
    if let Some(repo) = &details.repository {
        println!("  {}  {}/{}", "Repository:".bold(), repo.owner, repo.name);
    }
    println!(
        "  {}  {}",
        "Active:".bold(),
        if pipeline.is_active { "yes".green() } else { "no".red() }
    );
    if pipeline.is_template {
        println!("  {}", "template".cyan());
    }
    println!(
        "  {}  {}",
        "Updated:".bold(),
        pipeline.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if let Some(ascii) = &pipeline.ascii_visualization {
        println!();
        println!("{}", ascii);
    }
}

fn stars(rating: i16) -> String {
    let filled = rating.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
        assert_eq!(stars(-1), "☆☆☆☆☆");
    }

    #[test]
    fn test_read_config_rejects_invalid_json() {
        let path = std::env::temp_dir().join(format!("pipedeck-config-{}.json", Uuid::new_v4()));
        std::fs::write(&path, "{ nope").unwrap();
        assert!(read_config(&path).is_err());

        std::fs::write(&path, r#"{"phases":[]}"#).unwrap();
        let value = read_config(&path).unwrap();
        assert!(value["phases"].is_array());

        std::fs::remove_file(&path).unwrap();
    }
}
