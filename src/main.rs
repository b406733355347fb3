use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use provkit::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Diagnostics go to stderr; stdout carries the operator-facing progress.
    let filter =
        EnvFilter::try_from_env("PROVKIT_LOG").unwrap_or_else(|_| EnvFilter::new("provkit=warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let targets_file = provkit::resolve::targets_file(cli.targets.as_deref());

    match cli.command {
        Commands::Install {
            target,
            refresh,
            work_dir,
        } => provkit::install::run(
            &target,
            targets_file.as_deref(),
            work_dir.as_deref(),
            refresh,
        ),
        Commands::List { json } => provkit::list::run(targets_file.as_deref(), json),
        Commands::Show { target, json } => {
            provkit::list::show(&target, targets_file.as_deref(), json)
        }
        Commands::Clean { target, work_dir } => {
            provkit::clean::run(&target, targets_file.as_deref(), work_dir.as_deref())
        }
        Commands::Help { filter } => provkit::help::run(filter.as_deref()),
    }
}
