use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "provkit",
    version,
    about = "Fetch, extract and provision Gmail MCP server and bridge tools from GitHub archives",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Extra targets file (overrides PROVKIT_TARGETS and the user config)
    #[arg(long, global = true, value_name = "PATH")]
    pub targets: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download, extract and set up a target
    Install {
        /// Target name (see `provkit list`)
        target: String,

        /// Delete the cached archive first to force a fresh download
        #[arg(long)]
        refresh: bool,

        /// Directory to download and extract into (default: current directory)
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,
    },

    /// List known targets
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a target's full definition
    Show {
        /// Target name
        target: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove a target's cached archive and extracted directories
    Clean {
        /// Target name
        target: String,

        /// Directory the target was installed into (default: current directory)
        #[arg(long, value_name = "DIR")]
        work_dir: Option<PathBuf>,
    },

    /// Show command reference
    Help {
        /// Filter commands by name
        filter: Option<String>,
    },
}
