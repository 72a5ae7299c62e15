//
//  sourcecraft-cli
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Credential Storage Module
//!
//! Stores the personal access token in the system's native keyring:
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! The token lives under service `sourcecraft-cli`, user `api_token`.
//! Storage is reached through the [`SecretStore`] trait so token resolution
//! can run against an in-memory store in tests.

use anyhow::Result;
use keyring::Entry;

pub const SERVICE_NAME: &str = "sourcecraft-cli";

pub const TOKEN_KEY: &str = "api_token";

/// A place to keep secrets by key.
pub trait SecretStore {
    fn store(&self, key: &str, secret: &str) -> Result<()>;

    /// `Ok(None)` when there is no entry; other failures are errors.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Deleting a missing entry succeeds.
    fn delete(&self, key: &str) -> Result<()>;
}

pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }
}

impl SecretStore for KeyringStore {
    fn store(&self, key: &str, secret: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        entry.set_password(secret)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
