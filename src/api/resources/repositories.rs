//
//  sourcecraft-cli
//  api/resources/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository endpoints: list, create, get and fork.

use serde::{Deserialize, Serialize};

use crate::api::client::SourceCraftClient;
use crate::api::common::{ApiError, Envelope, Page, UserRef};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Repo {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub default_branch: Option<String>,

    #[serde(default)]
    pub is_empty: Option<bool>,

    #[serde(default)]
    pub description: Option<String>,

    /// `public`, `internal` or `private`.
    #[serde(default)]
    pub visibility: Option<String>,

    #[serde(default)]
    pub clone_url: Option<CloneUrl>,

    #[serde(default)]
    pub last_updated: Option<String>,

    #[serde(default)]
    pub language: Option<Language>,

    #[serde(default)]
    pub owner: Option<UserRef>,

    /// Upstream repository when this one is a fork.
    #[serde(default)]
    pub parent: Option<RepositoryRef>,
}

impl Repo {
    /// `org/slug` when both halves are known.
    pub fn full_name(&self) -> Option<String> {
        let owner = self.owner.as_ref()?.slug.as_deref()?;
        let slug = self.slug.as_deref()?;
        Some(format!("{}/{}", owner, slug))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CloneUrl {
    #[serde(default)]
    pub https: Option<String>,

    #[serde(default)]
    pub ssh: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Language {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub color: Option<String>,
}

/// Embedded reference to another repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryRef {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub owner: Option<UserRef>,

    #[serde(default)]
    pub clone_url: Option<CloneUrl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Internal,
    Private,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateRepoRequest {
    pub name: String,

    pub slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ForkRepoRequest {
    /// Organization that receives the fork.
    pub org_slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default_branch_only: bool,
}

#[derive(Debug, Deserialize)]
struct RepositoryList {
    #[serde(default)]
    repositories: Vec<Repo>,

    #[serde(default)]
    next_page_token: Option<String>,
}

impl Envelope for RepositoryList {
    type Item = Repo;

    fn into_page(self) -> Page<Repo> {
        Page::new(self.repositories, self.next_page_token)
    }
}

impl SourceCraftClient {
    /// First page of the repositories of an organization.
    pub async fn list_repositories(&self, org: &str) -> Result<Page<Repo>, ApiError> {
        self.get_page::<RepositoryList>(&format!("/orgs/{}/repos", org))
            .await
    }

    pub async fn create_repository(
        &self,
        org: &str,
        request: &CreateRepoRequest,
    ) -> Result<Repo, ApiError> {
        self.post_json(&format!("/orgs/{}/repos", org), request)
            .await
    }

    /// Fetches a repository, including its fork parent when present.
    pub async fn get_repository(&self, org: &str, repo: &str) -> Result<Repo, ApiError> {
        self.get_json(&format!("/repos/{}/{}", org, repo))
            .await
            .map_err(|e| e.or_not_found(|| format!("repository '{}/{}'", org, repo)))
    }

    pub async fn fork_repository(
        &self,
        org: &str,
        repo: &str,
        request: &ForkRepoRequest,
    ) -> Result<Repo, ApiError> {
        self.post_json(&format!("/repos/{}/{}/fork", org, repo), request)
            .await
    }
}
