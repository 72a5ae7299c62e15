//
//  sourcecraft-cli
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use crate::config::{Config, KNOWN_KEYS};

use super::GlobalOptions;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List all configuration values
    #[command(visible_alias = "ls")]
    List,

    /// Print the configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// One of: organization, api_url, token
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// One of: organization, api_url
    pub key: String,

    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::List => self.list(global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        let value = display_value(&config, &args.key)?;

        if global.json {
            let result = serde_json::json!({
                "key": args.key,
                "value": value,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if let Some(v) = value {
            println!("{}", v);
        }

        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let mut config = global.load_config()?;
        config.set(&args.key, args.value.clone())?;
        config.save()?;

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "key": args.key,
                "value": args.value,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Set {} = {}",
                style("✓").green(),
                style(&args.key).cyan(),
                args.value
            );
        }

        Ok(())
    }

    fn list(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;

        if global.json {
            let mut map = serde_json::Map::new();
            for key in KNOWN_KEYS {
                let value = display_value(&config, key)?;
                map.insert(key.to_string(), serde_json::json!(value));
            }
            println!("{}", serde_json::to_string_pretty(&map)?);
            return Ok(());
        }

        for key in KNOWN_KEYS {
            if let Some(value) = display_value(&config, key)? {
                println!("{}={}", key, value);
            }
        }
        Ok(())
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        match config.path() {
            Some(path) => println!("{}", path.display()),
            None => println!("{}", Config::config_path()?.display()),
        }
        Ok(())
    }
}

/// Value as shown to the user; the legacy token is never printed.
fn display_value(config: &Config, key: &str) -> Result<Option<String>> {
    let value = config.get(key)?;
    if key == "token" {
        return Ok(value.map(|_| "<hidden>".to_string()));
    }
    Ok(value)
}
