mod calendar;
mod commands;
mod config;
mod models;
mod store;
mod web;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Gym manager: REST backend for users, activities, training plans and the weekly calendar.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log at debug level
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the REST API
    Serve {
        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,

        /// Listen address, overrides [server].addr (e.g. "0.0.0.0:3009")
        #[arg(short = 'a', long)]
        addr: Option<String>,
    },

    /// Print the weekly class calendar from the configured store
    Calendar {
        /// Path to config file
        #[arg(short = 'c', long, default_value = "config.toml")]
        config: PathBuf,

        /// Print the same JSON the API returns
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match &cli.command {
        Command::Serve { config, addr } => {
            let cfg = config::load_config(config)?;
            let addr = addr.clone().unwrap_or_else(|| cfg.server.addr.clone());
            web::serve(cfg, &addr).await?;
        }
        Command::Calendar { config, json } => {
            commands::run_calendar(config, *json)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_serve_with_addr() {
        let cli = Cli::try_parse_from(["gym-manager", "serve", "-a", "127.0.0.1:4000"]).unwrap();
        match cli.command {
            Command::Serve { config, addr } => {
                assert_eq!(config, PathBuf::from("config.toml"));
                assert_eq!(addr.as_deref(), Some("127.0.0.1:4000"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_calendar_json() {
        let cli =
            Cli::try_parse_from(["gym-manager", "-v", "calendar", "--json", "-c", "gym.toml"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Calendar { json: true, ref config } if config == &PathBuf::from("gym.toml")
        ));
    }
}
