use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ssmctl")]
#[command(version)]
#[command(about = "Manage AWS SSM State Manager associations declaratively", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print records as JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an association from a definition file
    Create {
        /// Path to a TOML association definition
        file: PathBuf,

        /// Seconds to wait for the association to reach Success
        /// (overrides the definition file)
        #[arg(long)]
        wait: Option<u64>,
    },

    /// Show an association
    Show {
        /// Association id
        association_id: String,
    },

    /// Update an association from a definition file
    ///
    /// The service assigns a new association version; all fields present
    /// in the definition are applied wholesale.
    Update {
        /// Association id
        association_id: String,

        /// Path to a TOML association definition
        file: PathBuf,
    },

    /// Delete an association (succeeds if it is already gone)
    Delete {
        /// Association id
        association_id: String,
    },

    /// Wait for an association to reach Success
    Wait {
        /// Association id
        association_id: String,

        /// Seconds to wait before giving up
        #[arg(long, default_value_t = 300)]
        timeout: u64,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
