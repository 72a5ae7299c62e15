//
//  sourcecraft-cli
//  context/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Repository Context
//!
//! Works out which SourceCraft repository a command targets, either from the
//! `--repo org/repo` flag or from the `origin` remote of the current git
//! checkout, and exposes the local git queries commands need.

mod git;
mod resolver;

pub use git::*;
pub use resolver::*;

use std::fmt;

/// Web UI host for repository links.
pub const WEB_HOST: &str = "https://sourcecraft.dev";

/// An `org/repo` pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoContext {
    pub org: String,
    pub repo: String,
}

impl RepoContext {
    pub fn new(org: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            org: org.into(),
            repo: repo.into(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.org, self.repo)
    }

    pub fn web_url(&self) -> String {
        format!("{}/{}/{}", WEB_HOST, self.org, self.repo)
    }

    pub fn pull_request_url(&self, slug: &str) -> String {
        format!("{}/pr/{}", self.web_url(), slug)
    }

    pub fn issue_url(&self, slug: &str) -> String {
        format!("{}/issues/{}", self.web_url(), slug)
    }
}

impl fmt::Display for RepoContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.repo)
    }
}
