//
//  sourcecraft-cli
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the HTTP client for the SourceCraft REST API at
//! `https://api.sourcecraft.tech`.
//!
//! ## Architecture
//!
//! - [`client`]: transport core with authentication and request execution
//! - [`retry`]: retry policy, outcome classification and the retry state machine
//! - [`resources`]: typed callers for repositories, pull requests, issues,
//!   milestones, access roles and CI/CD
//! - [`common`]: shared types (errors, list pages, user references)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sourcecraft_cli::api::{ClientConfig, SourceCraftClient};
//!
//! let client = SourceCraftClient::new(ClientConfig::new("your-token"))
//!     .expect("Failed to create client");
//! ```
//!
//! ## Error Handling
//!
//! All calls return [`ApiError`]. Use [`ApiError::status`] and
//! [`ApiError::is_not_found`] rather than inspecting messages.

pub mod client;

pub mod common;

pub mod resources;

pub mod retry;

pub use client::{ClientConfig, SourceCraftClient, DEFAULT_BASE_URL};

pub use common::{ApiError, Page};

pub use retry::{RetryPolicy, Sleeper, TokioSleeper};
