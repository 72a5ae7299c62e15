//
//  sourcecraft-cli
//  auth/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Personal Access Token Resolution
//!
//! SourceCraft authenticates every request with a personal access token (PAT)
//! sent as a bearer token. [`TokenResolver::resolve`] looks for it in order:
//!
//! 1. the `SOURCECRAFT_TOKEN` environment variable
//! 2. the system keyring
//! 3. a legacy `token` entry in the config file, which is moved into the
//!    keyring and removed from the file
//!
//! ## Example
//!
//! ```rust,no_run
//! use sourcecraft_cli::auth::{KeyringStore, TokenResolver};
//! use sourcecraft_cli::config::Config;
//!
//! fn token() -> anyhow::Result<String> {
//!     let store = KeyringStore::new();
//!     let mut config = Config::load(None)?;
//!     let resolved = TokenResolver::new(&store).resolve(&mut config)?;
//!     Ok(resolved.token)
//! }
//! ```

use std::fmt;

use anyhow::{bail, Context, Result};

use super::keyring::{SecretStore, TOKEN_KEY};
use crate::config::Config;

/// Environment variable holding a token that bypasses the keyring.
pub const TOKEN_ENV: &str = "SOURCECRAFT_TOKEN";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Environment,
    Keyring,
    LegacyConfig,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenSource::Environment => write!(f, "{} environment variable", TOKEN_ENV),
            TokenSource::Keyring => write!(f, "system keyring"),
            TokenSource::LegacyConfig => write!(f, "config file (legacy)"),
        }
    }
}

#[derive(Clone)]
pub struct ResolvedToken {
    pub token: String,
    pub source: TokenSource,
}

impl fmt::Debug for ResolvedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedToken")
            .field("token", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

pub struct TokenResolver<'a> {
    store: &'a dyn SecretStore,
    env_token: Option<String>,
}

impl<'a> TokenResolver<'a> {
    pub fn new(store: &'a dyn SecretStore) -> Self {
        Self {
            store,
            env_token: std::env::var(TOKEN_ENV).ok(),
        }
    }

    /// Overrides the value read from the environment.
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        self.env_token = token;
        self
    }

    fn env_token(&self) -> Option<String> {
        self.env_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Finds the token, migrating a legacy config token into the keyring.
    pub fn resolve(&self, config: &mut Config) -> Result<ResolvedToken> {
        if let Some(token) = self.env_token() {
            tracing::debug!("Using token from {}", TOKEN_ENV);
            return Ok(ResolvedToken {
                token,
                source: TokenSource::Environment,
            });
        }

        if let Some(token) = self
            .store
            .get(TOKEN_KEY)
            .context("Error reading OS keyring")?
        {
            return Ok(ResolvedToken {
                token,
                source: TokenSource::Keyring,
            });
        }

        if let Some(token) = config.token.clone().filter(|t| !t.is_empty()) {
            eprintln!("Token detected in the config file, migrating it to the OS keyring...");
            self.store
                .store(TOKEN_KEY, &token)
                .context("Failed to migrate token to the OS keyring")?;

            config.token = None;
            if let Err(e) = config.save() {
                eprintln!(
                    "warning: failed to remove the token from the config file after migration: {:#}",
                    e
                );
            }
            eprintln!("Migration complete. The token is now stored in the OS keyring.");

            return Ok(ResolvedToken {
                token,
                source: TokenSource::LegacyConfig,
            });
        }

        bail!(
            "Token not found. Run 'src auth login' or set the {} environment variable.",
            TOKEN_ENV
        )
    }

    /// Reports where a token would come from without migrating anything.
    pub fn source(&self, config: &Config) -> Result<Option<TokenSource>> {
        if self.env_token().is_some() {
            return Ok(Some(TokenSource::Environment));
        }
        if self
            .store
            .get(TOKEN_KEY)
            .context("Error reading OS keyring")?
            .is_some()
        {
            return Ok(Some(TokenSource::Keyring));
        }
        if config.token.as_deref().is_some_and(|t| !t.is_empty()) {
            return Ok(Some(TokenSource::LegacyConfig));
        }
        Ok(None)
    }
}

/// Reads a token from the first line of stdin.
pub fn read_token_from_stdin() -> Result<String> {
    use std::io::{self, BufRead};

    let stdin = io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;

    Ok(line.trim().to_string())
}

/// A usable token is non-empty and contains no whitespace.
pub fn validate_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}
