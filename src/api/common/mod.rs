//
//  sourcecraft-cli
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for SourceCraft
//!
//! This module provides the shared types used across every resource caller:
//! the structured [`ApiError`], the error-message rules applied to non-2xx
//! responses, the first-page list envelope ([`Page`]) and the lightweight
//! [`UserRef`] embedded in most resources.
//!
//! # Example
//!
//! ```rust
//! use sourcecraft_cli::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(e) if e.is_not_found() => println!("Nothing there"),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Every status-bearing variant exposes the numeric code through
//!   [`ApiError::status`]; callers never inspect message text.
//! - Response snippets are truncated by characters, never in the middle of a
//!   UTF-8 sequence.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Boxed transport error carried by network failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Maximum characters of a non-JSON error body kept in an error message.
pub const ERROR_SNIPPET_LEN: usize = 500;

/// Maximum characters of a 2xx body kept when it could not be used.
pub const BODY_SNIPPET_LEN: usize = 150;

/// Errors produced by the SourceCraft transport core and resource callers.
///
/// # Taxonomy
///
/// - **Transient**: [`ApiError::Network`] and [`ApiError::RateLimited`] are
///   returned only after the retry budget is spent.
/// - **Terminal**: [`ApiError::Http`] and [`ApiError::NotFound`] are returned
///   immediately and never retried.
/// - **Protocol violation**: [`ApiError::UnexpectedContentType`] and
///   [`ApiError::Decode`] mean the server answered with something unusable.
/// - **Local**: [`ApiError::Serialize`], [`ApiError::InvalidUrl`] and
///   [`ApiError::Client`] fail before any request is sent.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request body could not be serialized to JSON.
    #[error("failed to serialize request body")]
    Serialize(#[source] serde_json::Error),

    /// The base URL and path did not form a valid URL.
    #[error("invalid request URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Every attempt failed at the network level.
    #[error("request execution failed after {attempts} attempts")]
    Network {
        attempts: u32,
        #[source]
        source: BoxError,
    },

    /// The server kept answering 429 until the retry budget ran out.
    #[error("API request failed due to rate limiting (429) after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// A non-2xx status other than 429.
    #[error("{summary}")]
    Http {
        status: u16,
        summary: String,
        message: Option<String>,
        request_id: Option<String>,
        path: String,
    },

    /// A single-resource lookup answered 404.
    #[error("{resource} not found or you don't have permission")]
    NotFound {
        resource: String,
        request_id: Option<String>,
    },

    /// A 2xx response whose content type is not JSON.
    #[error(
        "API returned non-JSON response (Content-Type: {content_type}) despite 2xx status. Path: {path}. Body start: {snippet}"
    )]
    UnexpectedContentType {
        content_type: String,
        path: String,
        snippet: String,
    },

    /// The response body could not be read.
    #[error("API response read error (path: {path})")]
    Body {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// A JSON response did not match the expected shape.
    #[error("failed to decode JSON from {method} {path}. Response start: {snippet}")]
    Decode {
        method: String,
        path: String,
        #[source]
        source: serde_json::Error,
        snippet: String,
    },

    /// The retry loop ended without a classification.
    #[error("internal error: retry loop ended after {attempts} attempts without a result")]
    RetryExhausted { attempts: u32 },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Builds the terminal error for a non-2xx, non-429 response.
    ///
    /// The summary starts with a status-specific prefix (401, 404 and 405 get
    /// a clarifying hint) and is followed by either the server's `message`
    /// and `request_id`, or a truncated snippet when the body is not JSON.
    pub fn from_status(status: u16, body: &[u8], path: &str) -> Self {
        let status_text = status_line(status);
        let mut summary = match status {
            401 => format!(
                "API error: {} (invalid or expired token, path: {})",
                status_text, path
            ),
            404 => format!("API error: {} (incorrect path: {})", status_text, path),
            405 => format!(
                "API error: {} (wrong HTTP method for path: {})",
                status_text, path
            ),
            _ => format!("API returned error: {} (path: {})", status_text, path),
        };

        let mut message = None;
        let mut request_id = None;

        if !body.is_empty() {
            match serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(body) {
                Ok(object) => {
                    message = object
                        .get("message")
                        .and_then(|m| m.as_str())
                        .map(str::to_string);
                    request_id = object
                        .get("request_id")
                        .and_then(|r| r.as_str())
                        .map(str::to_string);
                }
                Err(_) => {
                    summary = format!(
                        "{}. Response Body: {}",
                        summary,
                        snippet(body, ERROR_SNIPPET_LEN)
                    );
                }
            }
        }

        if let Some(msg) = &message {
            summary = match &request_id {
                Some(id) => format!("{}. Message: {} (Request ID: {})", summary, msg, id),
                None => format!("{}. Message: {}", summary, msg),
            };
        }

        ApiError::Http {
            status,
            summary,
            message,
            request_id,
            path: path.to_string(),
        }
    }

    /// Numeric HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            ApiError::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the failure was one the retry policy treats as temporary.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ApiError::Network { .. } | ApiError::RateLimited { .. }
        )
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            ApiError::Http { request_id, .. } | ApiError::NotFound { request_id, .. } => {
                request_id.as_deref()
            }
            _ => None,
        }
    }

    /// Replaces a 404 with a friendly "not found" error naming the resource.
    pub fn or_not_found(self, resource: impl FnOnce() -> String) -> Self {
        if !self.is_not_found() {
            return self;
        }
        let request_id = self.request_id().map(str::to_string);
        ApiError::NotFound {
            resource: resource(),
            request_id,
        }
    }
}

/// Renders `404 Not Found` style status text.
fn status_line(status: u16) -> String {
    match StatusCode::from_u16(status) {
        Ok(code) => code.to_string(),
        Err(_) => status.to_string(),
    }
}

/// Lossy UTF-8 view of `body`, cut to `max` characters with a trailing `...`.
pub fn snippet(body: &[u8], max: usize) -> String {
    let text = String::from_utf8_lossy(body);
    if text.chars().count() <= max {
        return text.into_owned();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push_str("...");
    cut
}

/// User reference embedded in repositories, pull requests and issues.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserRef {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,
}

impl UserRef {
    /// Best human-readable label: the slug, then the id.
    pub fn display_name(&self) -> &str {
        self.slug
            .as_deref()
            .or(self.id.as_deref())
            .unwrap_or("-")
    }
}
