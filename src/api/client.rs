//
//  sourcecraft-cli
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client Wrapper for the SourceCraft API
//!
//! This module provides the core HTTP client for interacting with the
//! SourceCraft REST API. Every call goes through [`SourceCraftClient::execute`],
//! which serializes the body once, attaches the bearer token and runs the
//! request under the retry policy described in [`super::retry`].
//!
//! ## Features
//!
//! - Bearer authentication header injection
//! - JSON serialization/deserialization
//! - Retries for network failures and 429 responses
//! - Structured errors with the numeric HTTP status
//! - Raw binary downloads for CI artifacts
//! - Custom User-Agent header

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::common::{snippet, ApiError, Envelope, Page, BODY_SNIPPET_LEN};
use super::retry::{self, Attempt, ResponseParts, RetryPolicy, Sleeper, TokioSleeper};

/// Default SourceCraft API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.sourcecraft.tech";

/// Per-attempt request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Immutable connection settings for a [`SourceCraftClient`].
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
    pub policy: RetryPolicy,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
            timeout: REQUEST_TIMEOUT,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("policy", &self.policy)
            .finish()
    }
}

/// SourceCraft API client.
///
/// Built once per process and passed by reference. The underlying
/// `reqwest::Client` keeps its connection pool for the lifetime of the value.
///
/// # Example
///
/// ```rust,no_run
/// use sourcecraft_cli::api::{ClientConfig, SourceCraftClient};
///
/// # async fn demo() -> Result<(), sourcecraft_cli::api::ApiError> {
/// let client = SourceCraftClient::new(ClientConfig::new("my-token"))?;
/// let repos = client.list_repositories("acme").await?;
/// println!("{} repositories", repos.len());
/// # Ok(())
/// # }
/// ```
pub struct SourceCraftClient {
    http: Client,
    base_url: String,
    token: String,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for SourceCraftClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceCraftClient")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("policy", &self.policy)
            .finish()
    }
}

impl SourceCraftClient {
    /// Creates a client from `config` using the tokio timer between retries.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
            policy: config.policy,
            sleeper: Arc::new(TokioSleeper),
        })
    }

    /// Replaces the sleeper used between attempts.
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        Url::parse(&raw).map_err(|source| ApiError::InvalidUrl { url: raw, source })
    }

    /// Performs one logical call and returns the raw 2xx JSON body.
    ///
    /// # Parameters
    ///
    /// * `method` - HTTP method
    /// * `path` - API path; a missing leading `/` is added
    /// * `body` - optional request body, serialized to JSON once before the
    ///   first attempt
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Serialize`] without making a request when the body
    /// cannot be serialized. See [`super::retry`] for the rest of the policy.
    pub async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let path = normalize_path(path);
        let payload = match body {
            Some(body) => Some(serde_json::to_vec(body).map_err(ApiError::Serialize)?),
            None => None,
        };
        let url = self.url_for(&path)?;

        tracing::debug!("{} {}", method, path);

        retry::run(&self.policy, self.sleeper.as_ref(), &path, |_| {
            let mut request = self
                .http
                .request(method.clone(), url.clone())
                .bearer_auth(&self.token)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json");
            if let Some(bytes) = &payload {
                request = request.body(bytes.clone());
            }
            async move { perform(request).await }
        })
        .await
    }

    /// Downloads a binary payload in a single attempt.
    ///
    /// Only the bearer token is sent. Any 2xx body is returned byte-for-byte
    /// whatever its content type; non-2xx statuses follow the same message
    /// rules as [`execute`](Self::execute).
    pub async fn download(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let path = normalize_path(path);
        let url = self.url_for(&path)?;

        tracing::debug!("GET {} (binary)", path);

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::Network {
                attempts: 1,
                source: Box::new(e),
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.bytes().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body, &path));
        }

        let body = response.bytes().await.map_err(|source| ApiError::Body {
            path: path.clone(),
            source,
        })?;
        Ok(body.to_vec())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute::<()>(Method::GET, path, None).await?;
        decode(&Method::GET, path, &body)
    }

    /// GETs a list envelope and flattens it into its first [`Page`].
    pub async fn get_page<E: Envelope>(&self, path: &str) -> Result<Page<E::Item>, ApiError> {
        let envelope: E = self.get_json(path).await?;
        Ok(envelope.into_page())
    }

    pub async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.execute(Method::POST, path, Some(body)).await?;
        decode(&Method::POST, path, &bytes)
    }

    pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.execute(Method::PATCH, path, Some(body)).await?;
        decode(&Method::PATCH, path, &bytes)
    }

    /// POSTs `body` and discards the response body.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(Method::POST, path, Some(body)).await?;
        Ok(())
    }
}

/// Sends one request and captures what the classifier needs.
///
/// Error bodies that fail to read are treated as empty; a 429 body is never
/// read because only its `Retry-After` header matters.
async fn perform(request: reqwest::RequestBuilder) -> Attempt {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return Attempt::Failed(Box::new(e)),
    };

    let status = response.status();
    let header = |name: reqwest::header::HeaderName| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let content_type = header(CONTENT_TYPE);
    let retry_after = header(RETRY_AFTER);

    let body = if status.as_u16() == 429 {
        Vec::new()
    } else if status.is_success() {
        match response.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => return Attempt::Unreadable(e),
        }
    } else {
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .unwrap_or_default()
    };

    Attempt::Responded(ResponseParts {
        status: status.as_u16(),
        content_type,
        retry_after,
        body,
    })
}

/// Ensures a non-empty path starts with `/`.
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn decode<T: DeserializeOwned>(method: &Method, path: &str, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|source| ApiError::Decode {
        method: method.to_string(),
        path: normalize_path(path),
        source,
        snippet: snippet(body, BODY_SNIPPET_LEN),
    })
}
