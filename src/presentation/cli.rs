//! CLI Argument Parsing
//!
//! This module defines the CLI interface using clap.
//!
//! Hosts come from `--config <FILE>` when given, otherwise from the
//! `DIT_NODE<n>` / `DIT_NODE<n>_TASK<m>` environment variables (a `.env` file
//! is loaded first when present).

use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, Config};
use crate::error::DitResult;

/// dit - declarative remote deployment over SSH
#[derive(Parser, Debug)]
#[command(name = "dit")]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "Without --config, hosts are read from DIT_NODE1..n and their tasks from DIT_NODE<n>_TASK1..m."
)]
pub struct Cli {
    /// TOML file listing hosts and their tasks
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Environment file to load (default: .env in the working directory, if present)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Precheck every task of every host, then stop without connecting
    #[arg(long)]
    pub check: bool,

    /// Number of hosts deployed at the same time
    #[arg(short, long, value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Output format for CI
    #[arg(long)]
    pub json: bool,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "dit=info",
            1 => "dit=debug",
            _ => "dit=trace",
        }
    }

    /// Read hosts and settings; CLI flags win over `DIT_JOBS` and the file
    pub fn load_config(&self) -> DitResult<Config> {
        let loaded = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::from_env()?,
        };
        Ok(self.apply_overrides(config::with_env_overrides(loaded)))
    }

    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(jobs) = self.jobs {
            config.deploy.jobs = jobs;
        }
        if self.check {
            config.deploy.check_only = true;
        }
        config
    }
}

fn parse_jobs(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(jobs) => Ok(jobs),
        Err(err) => Err(err.to_string()),
    }
}
