//
//  sourcecraft-cli
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # SourceCraft CLI Library
//!
//! The library behind the `src` binary, a command-line client for the
//! SourceCraft platform.
//!
//! ## Overview
//!
//! Every command goes through one HTTP transport core
//! ([`api::SourceCraftClient`]) that authenticates with a personal access
//! token, retries network failures and rate limiting with exponential
//! backoff, and turns error responses into a structured [`api::ApiError`].
//! Thin resource callers on top of it cover repositories, pull requests,
//! issues, milestones, repository roles and CI/CD runs.
//!
//! ## Module Structure
//!
//! - [`api`]: transport core, retry state machine and resource callers
//! - [`auth`]: token resolution and keyring storage
//! - [`cli`]: clap command tree
//! - [`config`]: TOML configuration file
//! - [`context`]: `org/repo` resolution and local git queries
//! - [`output`]: tables and JSON output
//! - [`interactive`]: terminal prompts
//! - [`util`]: time, string and size helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use sourcecraft_cli::api::{ClientConfig, SourceCraftClient};
//!
//! # async fn demo() -> Result<(), sourcecraft_cli::api::ApiError> {
//! let client = SourceCraftClient::new(ClientConfig::new("my-token"))?;
//! let page = client.list_repositories("acme").await?;
//! for repo in page {
//!     println!("{}", repo.slug.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// HTTP transport core and SourceCraft resource callers.
///
/// The client handles authentication, retries, error mapping and decoding.
/// Lists return only their first page.
pub mod api;

/// Personal access token resolution and secure storage.
pub mod auth;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/src/config.toml`
/// - macOS: `~/Library/Application Support/src/config.toml`
/// - Windows: `%APPDATA%\src\config\config.toml`
pub mod config;

/// Repository context detection from flags and git remotes.
pub mod context;

/// Output formatting (tables and JSON).
pub mod output;

/// Interactive terminal prompts.
pub mod interactive;

/// Utility functions and helpers.
pub mod util;

pub use cli::Cli;

pub use config::Config;

pub use context::RepoContext;

/// Name of the binary, also used for the configuration directory.
pub const APP_NAME: &str = "src";

/// Current version, from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// Scripts can tell authentication problems, missing resources and rate
/// limiting apart from other failures.
///
/// ```rust,no_run
/// use sourcecraft_cli::exit_codes;
/// use std::process;
///
/// process::exit(exit_codes::AUTH_ERROR);
/// ```
pub mod exit_codes {
    use crate::api::ApiError;

    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// General error. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// The token is missing, invalid or expired.
    pub const AUTH_ERROR: i32 = 4;

    /// The resource does not exist or the token cannot see it.
    pub const NOT_FOUND: i32 = 8;

    /// The server kept answering 429 until retries ran out.
    pub const RATE_LIMIT: i32 = 32;

    /// Exit code for an error returned by a command.
    ///
    /// The first [`ApiError`] in the cause chain decides; anything else is
    /// [`ERROR`].
    pub fn for_error(error: &anyhow::Error) -> i32 {
        let api_error = error
            .chain()
            .find_map(|cause| cause.downcast_ref::<ApiError>());

        match api_error {
            Some(ApiError::RateLimited { .. }) => RATE_LIMIT,
            Some(e) if e.is_unauthorized() => AUTH_ERROR,
            Some(e) if e.is_not_found() => NOT_FOUND,
            _ => ERROR,
        }
    }

}
