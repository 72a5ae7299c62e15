//
//  sourcecraft-cli
//  context/resolver.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Context Resolver
//!
//! Resolves the target repository from CLI arguments or git remote URLs.
//!
//! ## Supported URL Formats
//!
//! - SCP-like SSH: `git@git.sourcecraft.dev:org/repo.git`
//! - SSH URL: `ssh://git@ssh.sourcecraft.dev:2222/org/repo.git`
//! - HTTPS: `https://git.sourcecraft.dev/org/repo.git`, optionally with
//!   `user:password@` credentials, which are ignored
//!
//! ## Resolution Priority
//!
//! 1. `--repo org/repo` flag (or `SOURCECRAFT_REPO`)
//! 2. the `origin` remote of the current git repository
//!
//! ## Example
//!
//! ```rust
//! use sourcecraft_cli::context::parse_remote_url;
//!
//! let ctx = parse_remote_url("git@git.sourcecraft.dev:acme/widgets.git")?;
//! assert_eq!(ctx.full_name(), "acme/widgets");
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::{GitContext, RepoContext};
use crate::cli::GlobalOptions;
use crate::config::Config;

static SCP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@/\s]+@[^:/\s]+:(.+)$").unwrap());

pub struct ContextResolver {
    organization: Option<String>,
}

impl ContextResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            organization: config.organization.clone().filter(|o| !o.is_empty()),
        }
    }

    /// Repository for commands that act on "the current repository".
    pub fn resolve(&self, options: &GlobalOptions) -> Result<RepoContext> {
        if let Some(repo) = &options.repo {
            return parse_repo_arg(repo);
        }

        if let Ok(git) = GitContext::open() {
            if let Some(url) = git.origin_url()? {
                return parse_remote_url(&url)
                    .context("Could not determine repository from the 'origin' remote");
            }
        }

        bail!("Could not determine repository. Use --repo ORG/REPO, or run from within a git repository with an 'origin' remote.")
    }

    /// Accepts `org/repo` or a bare slug in the configured organization.
    pub fn resolve_named(&self, identifier: &str) -> Result<RepoContext> {
        if identifier.contains('/') {
            return parse_repo_arg(identifier);
        }
        if identifier.trim().is_empty() {
            bail!("Repository slug cannot be empty");
        }
        match &self.organization {
            Some(org) => Ok(RepoContext::new(org.as_str(), identifier)),
            None => bail!(
                "No organization configured. Use ORG/REPO or run 'src config set organization <org>'."
            ),
        }
    }

    /// Organization to use when none was given explicitly.
    pub fn organization(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .map(str::to_string)
            .or_else(|| self.organization.clone())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No organization given. Pass --org or run 'src config set organization <org>'."
                )
            })
    }
}

/// Parses an `org/repo` argument: exactly two non-empty segments.
pub fn parse_repo_arg(value: &str) -> Result<RepoContext> {
    let parts: Vec<&str> = value.trim().split('/').collect();
    match parts.as_slice() {
        [org, repo] if !org.is_empty() && !repo.is_empty() => Ok(RepoContext::new(*org, *repo)),
        _ => bail!("Invalid repository '{}'. Expected ORG/REPO", value),
    }
}

/// Extracts `org/repo` from an SSH or HTTPS remote URL.
pub fn parse_remote_url(remote: &str) -> Result<RepoContext> {
    let remote = remote.trim();

    let path = if remote.starts_with("https://")
        || remote.starts_with("http://")
        || remote.starts_with("ssh://")
    {
        // Embedded credentials live in the authority and never reach `path()`.
        let url = Url::parse(remote)
            .with_context(|| format!("Could not parse remote URL '{}'", remote))?;
        url.path().to_string()
    } else if let Some(caps) = SCP_PATTERN.captures(remote) {
        caps[1].to_string()
    } else {
        bail!("Unsupported remote URL format '{}'", remote);
    };

    let slug = path.trim_matches('/');
    let slug = slug.strip_suffix(".git").unwrap_or(slug);

    match slug.split_once('/') {
        Some((org, repo)) if !org.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok(RepoContext::new(org, repo))
        }
        _ => bail!(
            "Could not extract ORG/REPO from path '{}' (remote URL '{}')",
            path,
            remote
        ),
    }
}

/// What `repo clone` was asked to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneTarget {
    Url(String),
    Repo(RepoContext),
}

impl CloneTarget {
    pub fn parse(identifier: &str, resolver: &ContextResolver) -> Result<Self> {
        let looks_like_url = identifier.starts_with("https://")
            || identifier.starts_with("http://")
            || identifier.starts_with("ssh://")
            || identifier.starts_with("git@");
        if looks_like_url {
            return Ok(CloneTarget::Url(identifier.to_string()));
        }
        resolver.resolve_named(identifier).map(CloneTarget::Repo)
    }
}
