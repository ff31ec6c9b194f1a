//! dit CLI - declarative remote deployment over SSH
//!
//! Usage: dit [--config <FILE>] [--env-file <FILE>] [--check] [--jobs <N>] [--json] [-v...]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use dit::config;
use dit::presentation::{create_deploy_use_case, Cli};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(cli: &Cli) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.json {
        println!(
            "{} version v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
    }

    let env_file = config::load_dotenv(cli.env_file.as_deref())?;
    if let Some(path) = &env_file {
        if !cli.json {
            println!("Environment variables from {} loaded", path.display());
        }
    }

    let config = cli.load_config()?;
    tracing::info!(
        hosts = config.hosts.len(),
        jobs = config.deploy.jobs,
        check_only = config.deploy.check_only,
        "configuration loaded"
    );

    let use_case = create_deploy_use_case(cli.json);
    let result = use_case.execute(&config.hosts, &config.deploy_options())?;
    tracing::debug!(?result, "run finished");

    if !cli.json {
        println!("done");
    }
    Ok(())
}
