//
//  sourcecraft-cli
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Command Line Interface
//!
//! The `clap` command tree. Each submodule owns one top-level command and
//! its subcommands; the helpers at the bottom of this file (configuration,
//! client construction, repository resolution) are shared by all of them.

mod access;
mod auth;
mod completion;
mod config;
mod issue;
mod milestone;
mod pr;
mod repo;
mod workflow;

pub use access::AccessCommand;
pub use auth::AuthCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use issue::IssueCommand;
pub use milestone::MilestoneCommand;
pub use pr::PrCommand;
pub use repo::RepoCommand;
pub use workflow::WorkflowCommand;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::{ClientConfig, SourceCraftClient};
use crate::auth::{KeyringStore, TokenResolver};
use crate::config::Config;
use crate::context::{ContextResolver, RepoContext};
use crate::output::OutputWriter;

#[derive(Parser, Debug)]
#[command(
    name = "src",
    version,
    about = "Work with SourceCraft from the command line",
    long_about = "src is a CLI for the SourceCraft platform.\n\n\
                  It brings repositories, pull requests, issues, milestones and CI/CD workflows to your terminal.",
    propagate_version = true,
    after_help = "Use 'src <command> --help' for more information about a command.\n\
                  Set SRC_DEBUG=debug to see every API request."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Repository to operate on, as ORG/REPO
    #[arg(long, short = 'R', global = true, env = "SOURCECRAFT_REPO")]
    pub repo: Option<String>,

    /// Output JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Never prompt; fail or use defaults instead
    #[arg(long, global = true, env = "SOURCECRAFT_NO_PROMPT")]
    pub no_prompt: bool,

    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate with a personal access token
    Auth(AuthCommand),

    /// Read and write configuration
    Config(ConfigCommand),

    /// Manage repositories
    #[command(visible_alias = "r")]
    Repo(RepoCommand),

    /// Manage pull requests
    Pr(PrCommand),

    /// Manage issues
    Issue(IssueCommand),

    /// Manage milestones
    Milestone(MilestoneCommand),

    /// Manage repository access
    Access(AccessCommand),

    /// Run and inspect CI/CD workflows
    #[command(visible_alias = "ci")]
    Workflow(WorkflowCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Print the version
    Version,
}

impl GlobalOptions {
    pub fn load_config(&self) -> Result<Config> {
        Config::load(self.config.as_deref())
    }

    pub fn output(&self) -> OutputWriter {
        OutputWriter::from_json_flag(self.json)
    }
}

/// Everything a command needs to talk to the API.
pub(crate) struct Session {
    pub config: Config,
    pub client: SourceCraftClient,
}

impl Session {
    /// Loads configuration, resolves the token and builds the client.
    pub fn open(global: &GlobalOptions) -> Result<Self> {
        let mut config = global.load_config()?;
        let store = KeyringStore::new();
        let token = TokenResolver::new(&store).resolve(&mut config)?;

        let client_config = ClientConfig::new(token.token).with_base_url(config.api_base_url());
        let client = SourceCraftClient::new(client_config)
            .context("Failed to create API client")?;

        Ok(Self { config, client })
    }

    pub fn resolver(&self) -> ContextResolver {
        ContextResolver::new(&self.config)
    }

    /// Repository from `--repo` or the current checkout.
    pub fn repo(&self, global: &GlobalOptions) -> Result<RepoContext> {
        self.resolver().resolve(global)
    }
}
