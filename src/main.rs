//
//  sourcecraft-cli
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sourcecraft_cli::cli::{Cli, Commands};
use sourcecraft_cli::exit_codes;

/// Log filter variable, e.g. `SRC_DEBUG=debug`.
const LOG_ENV: &str = "SRC_DEBUG";

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let global = &cli.global;
    match &cli.command {
        Commands::Auth(cmd) => cmd.run(global).await,
        Commands::Config(cmd) => cmd.run(global).await,
        Commands::Repo(cmd) => cmd.run(global).await,
        Commands::Pr(cmd) => cmd.run(global).await,
        Commands::Issue(cmd) => cmd.run(global).await,
        Commands::Milestone(cmd) => cmd.run(global).await,
        Commands::Access(cmd) => cmd.run(global).await,
        Commands::Workflow(cmd) => cmd.run(global).await,
        Commands::Completion(cmd) => cmd.run(),
        Commands::Version => {
            println!("{} version {}", sourcecraft_cli::APP_NAME, sourcecraft_cli::VERSION);
            Ok(())
        }
    }
}
