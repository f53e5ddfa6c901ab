//! Pipedeck CLI
//!
//! Command-line interface for the Pipedeck server.

mod commands;
mod config;
mod id_resolver;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;

#[derive(Parser)]
#[command(name = "pipedeck")]
#[command(about = "Pipedeck pipeline dashboard CLI", long_about = None)]
struct Cli {
    /// Server URL
    #[arg(long, env = "PIPEDECK_SERVER_URL", default_value = "http://localhost:8080")]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_trigger_with_watch() {
        let cli = Cli::try_parse_from([
            "pipedeck",
            "--server-url",
            "http://deck:9000",
            "execution",
            "trigger",
            "3f2a",
            "--trigger",
            "WEBHOOK",
            "--watch",
        ])
        .unwrap();
        assert_eq!(cli.server_url, "http://deck:9000");
        assert!(matches!(
            cli.command,
            Commands::Execution {
                command: commands::ExecutionCommands::Trigger { watch: true, .. }
            }
        ));
    }

    #[test]
    fn test_parse_pipeline_create_requires_type() {
        assert!(Cli::try_parse_from(["pipedeck", "pipeline", "create", "--name", "x"]).is_err());
        assert!(
            Cli::try_parse_from([
                "pipedeck", "pipeline", "create", "--name", "x", "--type", "DMIAC"
            ])
            .is_ok()
        );
    }
}
