//
//  sourcecraft-cli
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands.
//!
//! SourceCraft uses personal access tokens. `login` stores one in the system
//! keyring, `logout` removes it and `status` reports where the active token
//! comes from.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::auth::{
    read_token_from_stdin, validate_token, KeyringStore, SecretStore, TokenResolver, TOKEN_ENV,
    TOKEN_KEY,
};
use crate::interactive::{can_prompt, prompt_password};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Store a personal access token in the system keyring
    Login(LoginArgs),

    /// Remove the stored token
    Logout,

    /// Show where the active token comes from
    Status(StatusArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Read the token from standard input
    #[arg(long)]
    pub with_token: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Display a masked version of the token
    #[arg(long, short = 't')]
    pub show_token: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global),
            AuthSubcommand::Logout => logout(global),
            AuthSubcommand::Status(args) => status(args, global),
        }
    }
}

fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let token = if args.with_token {
        read_token_from_stdin()?
    } else if can_prompt(global.no_prompt) {
        println!("Create a personal access token in your SourceCraft profile settings.");
        prompt_password("Paste your token")?.trim().to_string()
    } else {
        bail!("No terminal available. Use --with-token and pipe the token on stdin.");
    };

    if token.is_empty() {
        bail!("Token cannot be empty");
    }
    if !validate_token(&token) {
        bail!("Token must not contain whitespace");
    }

    let store = KeyringStore::new();
    store
        .store(TOKEN_KEY, &token)
        .context("Failed to store token in the OS keyring")?;

    clear_legacy_token(global)?;

    println!(
        "{} Token saved to the OS keyring",
        style("✓").green()
    );
    if std::env::var(TOKEN_ENV).is_ok_and(|v| !v.trim().is_empty()) {
        println!(
            "{} {} is set and takes precedence over the stored token",
            style("!").yellow(),
            TOKEN_ENV
        );
    }
    Ok(())
}

fn logout(global: &GlobalOptions) -> Result<()> {
    let store = KeyringStore::new();
    store
        .delete(TOKEN_KEY)
        .context("Failed to remove token from the OS keyring")?;

    clear_legacy_token(global)?;

    println!("{} Logged out", style("✓").green());
    Ok(())
}

fn status(args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
    let config = global.load_config()?;
    let store = KeyringStore::new();
    let resolver = TokenResolver::new(&store);

    match resolver.source(&config)? {
        None => {
            println!("Not logged in");
            println!();
            println!("Run 'src auth login' or set {} to authenticate", TOKEN_ENV);
        }
        Some(source) => {
            println!("{} Token found in the {}", style("✓").green(), source);
            if args.show_token {
                let mut config = config;
                let resolved = resolver.resolve(&mut config)?;
                println!("  Token: {}", mask_token(&resolved.token));
            }
        }
    }

    let api_url = global.load_config()?.api_base_url();
    println!("  API: {}", api_url);
    Ok(())
}

/// Drops a legacy plaintext token from the config file, if any.
fn clear_legacy_token(global: &GlobalOptions) -> Result<()> {
    let mut config = global.load_config()?;
    if config.token.take().is_some() {
        config.save()?;
        println!("Removed the legacy token from the config file");
    }
    Ok(())
}

/// Keeps the first and last four characters.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}
