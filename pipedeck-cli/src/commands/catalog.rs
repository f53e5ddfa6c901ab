//! Read-only catalog commands: templates, agents and the dashboard

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use pipedeck_client::PipedeckClient;
use pipedeck_core::domain::agent::AgentStatus;

/// Template subcommands
#[derive(Subcommand)]
pub enum TemplateCommands {
    /// List refactor templates, built-ins first
    List,
}

/// Agent subcommands
#[derive(Subcommand)]
pub enum AgentCommands {
    /// List deployed agents
    List,
    /// Show the latest monitoring samples
    Monitoring {
        /// Only print this many samples
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Show the task agent board
    Tasks,
}

/// Handle template commands
pub async fn handle_template_command(
    command: TemplateCommands,
    client: &PipedeckClient,
) -> Result<()> {
    match command {
        TemplateCommands::List => {
            let templates = client.list_templates().await?;
            if templates.is_empty() {
                println!("{}", "No templates found.".yellow());
                return Ok(());
            }

            for template in &templates {
                let badge = if template.is_built_in {
                    "built-in".cyan()
                } else {
                    "custom".normal()
                };
                println!(
                    "  {} {} {} {}",
                    "▸".cyan(),
                    template.name.bold(),
                    format!("[{}]", template.category).dimmed(),
                    badge
                );
                if let Some(description) = &template.description {
                    println!("    {}", description);
                }
                println!("    Used {} time(s)", template.usage_count);
            }
            Ok(())
        }
    }
}

/// Handle agent commands
pub async fn handle_agent_command(command: AgentCommands, client: &PipedeckClient) -> Result<()> {
    match command {
        AgentCommands::List => {
            let agents = client.list_agents().await?;
            if agents.is_empty() {
                println!("{}", "No agents found.".yellow());
                return Ok(());
            }

            for agent in &agents {
                println!(
                    "  {} {} {} {}",
                    "▸".cyan(),
                    agent.name.bold(),
                    format!("[{}]", agent.agent_type).dimmed(),
                    colorize_agent_status(agent.status)
                );
                if let Some(version) = &agent.version {
                    println!("    Version:   {}", version);
                }
                if let Some(last_seen) = agent.last_seen {
                    println!(
                        "    Last seen: {}",
                        last_seen.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                }
            }
            Ok(())
        }
        AgentCommands::Monitoring { limit } => {
            let samples = client.list_monitoring(Some(limit)).await?;
            if samples.is_empty() {
                println!("{}", "No monitoring samples found.".yellow());
                return Ok(());
            }

            for entry in &samples {
                let sample = &entry.sample;
                println!(
                    "  {} {} {:<12} cpu {:>5} mem {:>5} errors {}",
                    sample.timestamp.format("%H:%M:%S").to_string().dimmed(),
                    entry.agent.name.bold(),
                    sample.status,
                    percent(sample.cpu_usage),
                    percent(sample.memory_usage),
                    sample.error_count
                );
            }
            Ok(())
        }
        AgentCommands::Tasks => {
            let board = client.task_agents().await?;
            println!("{}", serde_json::to_string_pretty(&board)?);
            Ok(())
        }
    }
}

/// Print the dashboard counters
pub async fn show_dashboard(client: &PipedeckClient) -> Result<()> {
    let stats = client.dashboard_stats().await?;

    println!("{}", "Dashboard".bold().underline());
    println!();
    println!("  {}  {}", "Repositories:".bold(), stats.repositories);
    println!("  {}  {}", "Pipelines:".bold(), stats.pipelines);
    println!(
        "  {}  {}",
        "Active executions:".bold(),
        stats.active_executions
    );
    println!("  {}  {}", "Agents:".bold(), stats.agents);

    let rate = format!("{}%", stats.success_rate);
    let rate = match stats.success_rate {
        90.. => rate.green(),
        70..=89 => rate.yellow(),
        _ => rate.red(),
    };
    println!("  {}  {}", "Success rate:".bold(), rate);

    Ok(())
}

fn colorize_agent_status(status: AgentStatus) -> ColoredString {
    match status {
        AgentStatus::Active => status.as_str().green(),
        AgentStatus::Inactive => status.as_str().dimmed(),
        AgentStatus::Error => status.as_str().red(),
        AgentStatus::Maintenance => status.as_str().yellow(),
    }
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}%", v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent() {
        assert_eq!(percent(Some(42.25)), "42.2%");
        assert_eq!(percent(None), "-");
    }
}
