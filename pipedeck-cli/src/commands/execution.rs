//! Execution command handlers
//!
//! Triggering executions, listing them, and following one until it finishes.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use pipedeck_client::PipedeckClient;
use pipedeck_core::domain::execution::{ExecutionStatus, PipelineExecution, TriggerType};
use pipedeck_core::dto::execution::{CreateExecution, ExecutionDetails};

use crate::id_resolver::{resolve_execution_id, resolve_pipeline_id};
use crate::types::IdOrPrefix;

/// Execution subcommands
#[derive(Subcommand)]
pub enum ExecutionCommands {
    /// List the most recent executions
    List,
    /// Get execution details
    Get {
        /// Execution ID or unambiguous prefix
        id: IdOrPrefix,
    },
    /// Trigger a pipeline
    Trigger {
        /// Pipeline ID or unambiguous prefix
        pipeline_id: IdOrPrefix,

        /// MANUAL, WEBHOOK, SCHEDULED or AUTO
        #[arg(long, default_value = "MANUAL")]
        trigger: TriggerType,

        /// Poll the execution until it reaches a terminal status
        #[arg(short, long)]
        watch: bool,

        /// Seconds between polls while watching
        #[arg(long, default_value_t = 1)]
        interval: u64,
    },
}

/// Handle execution commands
pub async fn handle_execution_command(
    command: ExecutionCommands,
    client: &PipedeckClient,
) -> Result<()> {
    match command {
        ExecutionCommands::List => list_executions(client).await,
        ExecutionCommands::Get { id } => get_execution(client, &id).await,
        ExecutionCommands::Trigger {
            pipeline_id,
            trigger,
            watch,
            interval,
        } => trigger_execution(client, &pipeline_id, trigger, watch, interval).await,
    }
}

async fn list_executions(client: &PipedeckClient) -> Result<()> {
    let executions = client.list_executions().await?;

    if executions.is_empty() {
        println!("{}", "No executions found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} execution(s):", executions.len()).bold()
        );
        println!();
        for details in &executions {
            print_execution_summary(&details.execution, Some(&details.pipeline.name));
        }
    }

    Ok(())
}

async fn get_execution(client: &PipedeckClient, id: &IdOrPrefix) -> Result<()> {
    let uuid = resolve_execution_id(client, id).await?;
    let details = client.get_execution(uuid).await?;

    print_execution_details(&details);

    Ok(())
}

async fn trigger_execution(
    client: &PipedeckClient,
    pipeline_id: &IdOrPrefix,
    trigger: TriggerType,
    watch: bool,
    interval: u64,
) -> Result<()> {
    let pipeline_uuid = resolve_pipeline_id(client, pipeline_id).await?;

    let details = client
        .trigger_execution(CreateExecution::new(pipeline_uuid, trigger))
        .await
        .context("Failed to trigger execution")?;

    println!("{}", "✓ Execution queued".green().bold());
    println!("  ID:       {}", details.execution.id.to_string().cyan());
    println!("  Pipeline: {}", details.pipeline.name);
    println!("  Trigger:  {}", details.execution.trigger_type);

    if !watch {
        return Ok(());
    }

    println!();
    let mut last = details.execution.status;
    println!("  {} {}", "→".dimmed(), colorize_status(last));

    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let current = client.get_execution(details.execution.id).await?;

        if current.execution.status != last {
            last = current.execution.status;
            println!("  {} {}", "→".dimmed(), colorize_status(last));
        }

        if last.is_terminal() {
            println!();
            print_execution_details(&current);
            return Ok(());
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Print a one-entry summary of an execution
pub(crate) fn print_execution_summary(execution: &PipelineExecution, pipeline_name: Option<&str>) {
    println!(
        "  {} Execution {}",
        "▸".cyan(),
        execution.id.to_string().dimmed()
    );
    if let Some(name) = pipeline_name {
        println!("    Pipeline: {}", name);
    }
    println!("    Status:   {}", colorize_status(execution.status));
    println!("    Trigger:  {}", execution.trigger_type);
    println!(
        "    Started:  {}",
        execution.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
}

fn print_execution_details(details: &ExecutionDetails) {
    let execution = &details.execution;

    println!("{}", "Execution Details".bold().underline());
    println!();
    println!("  {}  {}", "ID:".bold(), execution.id);
    println!(
        "  {}  {} ({}, {})",
        "Pipeline:".bold(),
        details.pipeline.name,
        details.pipeline.pipeline_type,
        details.pipeline.id.to_string().dimmed()
    );
    println!("  {}  {}", "Status:".bold(), colorize_status(execution.status));
    println!("  {}  {}", "Trigger:".bold(), execution.trigger_type);
    println!(
        "  {}  {}",
        "Started:".bold(),
        execution.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if let Some(completed) = execution.completed_at {
        let elapsed = completed - execution.started_at;
        println!(
            "  {}  {} ({}s)",
            "Completed:".bold(),
            completed.format("%Y-%m-%d %H:%M:%S UTC"),
            elapsed.num_seconds()
        );
    }
    if let Some(error) = &execution.error_msg {
        println!("  {}  {}", "Error:".bold(), error.red());
    }

    println!();
    println!("{}", "Logs".bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", execution.logs);
    println!("{}", "─".repeat(60).dimmed());

    if execution.output.as_object().is_some_and(|o| !o.is_empty()) {
        println!("{}", "Output".bold());
        println!(
            "{}",
            serde_json::to_string_pretty(&execution.output).unwrap_or_default()
        );
    }
}

/// Colorize execution status for display
pub(crate) fn colorize_status(status: ExecutionStatus) -> ColoredString {
    match status {
        ExecutionStatus::Queued => status.as_str().yellow(),
        ExecutionStatus::Running => status.as_str().blue(),
        ExecutionStatus::Success => status.as_str().green(),
        ExecutionStatus::Failed => status.as_str().red(),
        ExecutionStatus::Cancelled => status.as_str().dimmed(),
    }
}
