mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    // Completions don't need AWS credentials; handle them before connecting
    if let Command::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "ssmctl", &mut io::stdout());
        return Ok(());
    }

    let client = ssmkit::Client::connect().await?;

    match cli.command {
        Command::Create { file, wait } => {
            commands::association::create(&client, &file, wait, cli.json).await
        }
        Command::Show { association_id } => {
            commands::association::show(&client, &association_id, cli.json).await
        }
        Command::Update {
            association_id,
            file,
        } => commands::association::update(&client, &association_id, &file, cli.json).await,
        Command::Delete { association_id } => {
            commands::association::delete(&client, &association_id).await
        }
        Command::Wait {
            association_id,
            timeout,
        } => commands::association::wait(&client, &association_id, timeout, cli.json).await,
        // Handled above, before the client connects
        Command::Completions { .. } => Ok(()),
    }
}
