//
//  sourcecraft-cli
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Personal access token storage and resolution.
//!
//! - [`keyring`]: the [`SecretStore`] trait and its system keyring backend
//! - [`token`]: [`TokenResolver`], which finds the token in the environment,
//!   the keyring or a legacy config entry

mod keyring;
mod token;

pub use keyring::*;
pub use token::*;
