//
//  sourcecraft-cli
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loading, saving and key access for the CLI configuration file.
//!
//! ## Configuration File Location
//!
//! Unless `--config` points elsewhere, the file lives in the platform config
//! directory:
//!
//! - **Linux**: `~/.config/src/config.toml`
//! - **macOS**: `~/Library/Application Support/src/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\src\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! organization = "acme"
//! api_url = "https://api.sourcecraft.tech"
//! ```
//!
//! A `token` key may exist in files written by older versions. It is moved
//! into the system keyring the first time a token is resolved.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "SOURCECRAFT_API_URL";

/// Every key the file understands.
pub const KNOWN_KEYS: &[&str] = &["organization", "api_url", "token"];

/// Keys writable with `config set`.
pub const SETTABLE_KEYS: &[&str] = &["organization", "api_url"];

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Default organization slug for bare repository names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Legacy plaintext token, migrated to the keyring on first use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    /// Loads the configuration from `path`, or from the default location.
    ///
    /// A missing file yields an empty configuration bound to that path.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };

        config.path = Some(path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = match &self.path {
            Some(p) => p.clone(),
            None => Self::config_path()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Path this configuration was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "organization" => Ok(self.organization.clone()),
            "api_url" => Ok(self.api_url.clone()),
            "token" => Ok(self.token.clone()),
            _ => bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key,
                KNOWN_KEYS.join(", ")
            ),
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<()> {
        match key {
            "organization" => self.organization = Some(value),
            "api_url" => {
                url::Url::parse(&value)
                    .with_context(|| format!("Invalid value for api_url: '{}'", value))?;
                self.api_url = Some(value);
            }
            "token" => bail!(
                "The token is not stored in the config file. Use 'src auth login' instead."
            ),
            _ => bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                key,
                SETTABLE_KEYS.join(", ")
            ),
        }
        Ok(())
    }

    /// Resolves the API base URL: environment, then file, then default.
    pub fn api_base_url(&self) -> String {
        self.api_base_url_with(std::env::var(API_URL_ENV).ok())
    }

    fn api_base_url_with(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.api_url.clone().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }
}
