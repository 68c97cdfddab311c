//! upvote: record votes and reputation in a local LMDB data directory and
//! tally them.
//!
//! Every invocation prints one JSON object on stdout. Logs go to stderr.

mod commands;
mod config;
mod response;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use upvote_store_lmdb::{check_data_dir, LmdbEnvironment};
use upvote_types::Timestamp;
use upvote_utils::{init_logging, LogFormat};

use crate::commands::{Action, Tables};
use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "upvote", about = "Voting and reputation bookkeeping")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "UPVOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Data directory for the LMDB tables.
    #[arg(long, env = "UPVOTE_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log filter: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "UPVOTE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output: "human" or "json".
    #[arg(long, env = "UPVOTE_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Record a vote by USER on ITEM.
    Vote {
        user: String,
        item: String,
        /// Vote value, usually 1 or -1.
        #[arg(allow_hyphen_values = true)]
        vote: i64,
    },
    /// Record a reputation change for USER.
    Reputation {
        user: String,
        #[arg(allow_hyphen_values = true)]
        value: i64,
    },
    /// Sum every recorded vote per item.
    Tally {
        /// Count only each user's most recent vote per item.
        #[arg(long)]
        latest: bool,
    },
    /// Fold new reputation changes into the standings and print them.
    Standings,
    /// Count rows in every table and report read errors.
    Check,
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        match command {
            Command::Vote { user, item, vote } => Action::Vote { user, item, vote },
            Command::Reputation { user, value } => Action::Reputation { user, value },
            Command::Tally { latest } => Action::Tally { latest },
            Command::Standings => Action::Standings,
            Command::Check => Action::Check,
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<CliConfig> {
    let mut config = match &cli.config {
        Some(path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_logging(config.log_format, &config.log_level)?;

    check_data_dir(&config.data_dir).map_err(anyhow::Error::msg)?;
    let action = Action::from(cli.command);
    tracing::info!(data_dir = %config.data_dir.display(), ?action, "running command");

    let response = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)
            .with_context(|| format!("opening {}", config.data_dir.display()))?;
        let tables = Tables::open(env)?;
        Ok(tables.execute(action, Timestamp::now())?)
    })
    .await??;

    println!("{}", serde_json::to_string(&response)?);
    if response.is_failure() {
        tracing::warn!("command failed");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
