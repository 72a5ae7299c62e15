//
//  sourcecraft-cli
//  api/resources/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use serde::{Deserialize, Serialize};

use crate::api::client::SourceCraftClient;
use crate::api::common::{ApiError, Envelope, Page, UserRef};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<IssueStatus>,

    #[serde(default)]
    pub author: Option<UserRef>,

    #[serde(default)]
    pub updated_by: Option<UserRef>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub assignee: Option<UserRef>,

    #[serde(default)]
    pub labels: Vec<Label>,

    #[serde(default)]
    pub priority: Option<String>,

    #[serde(default)]
    pub milestone: Option<MilestoneRef>,

    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueStatus {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    /// `initial`, `in_progress`, `paused`, `completed` or `cancelled`.
    #[serde(default)]
    pub status_type: Option<String>,
}

impl IssueStatus {
    pub fn label(&self) -> &str {
        self.name
            .as_deref()
            .or(self.slug.as_deref())
            .unwrap_or("-")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MilestoneRef {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,
}

/// Issue priorities accepted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Trivial,
    Minor,
    Normal,
    Critical,
    Blocker,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateIssue {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub label_ids: Vec<String>,
}

/// Partial issue update; absent fields are left untouched on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<String>,
}

impl UpdateIssue {
    /// The update applied by `issue close`.
    pub fn close() -> Self {
        Self {
            status_slug: Some("closed".to_string()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status_slug.is_none()
            && self.priority.is_none()
            && self.assignee_id.is_none()
            && self.milestone_id.is_none()
    }
}

#[derive(Debug, Deserialize)]
struct IssueList {
    #[serde(default)]
    issues: Vec<Issue>,

    #[serde(default)]
    next_page_token: Option<String>,
}

impl Envelope for IssueList {
    type Item = Issue;

    fn into_page(self) -> Page<Issue> {
        Page::new(self.issues, self.next_page_token)
    }
}

impl SourceCraftClient {
    pub async fn list_issues(&self, org: &str, repo: &str) -> Result<Page<Issue>, ApiError> {
        self.get_page::<IssueList>(&format!("/repos/{}/{}/issues", org, repo))
            .await
    }

    pub async fn create_issue(
        &self,
        org: &str,
        repo: &str,
        request: &CreateIssue,
    ) -> Result<Issue, ApiError> {
        self.post_json(&format!("/repos/{}/{}/issues", org, repo), request)
            .await
    }

    pub async fn get_issue(&self, org: &str, repo: &str, slug: &str) -> Result<Issue, ApiError> {
        self.get_json(&format!("/repos/{}/{}/issues/{}", org, repo, slug))
            .await
            .map_err(|e| e.or_not_found(|| format!("issue '{}/{}#{}'", org, repo, slug)))
    }

    pub async fn update_issue(
        &self,
        org: &str,
        repo: &str,
        slug: &str,
        request: &UpdateIssue,
    ) -> Result<Issue, ApiError> {
        self.patch_json(&format!("/repos/{}/{}/issues/{}", org, repo, slug), request)
            .await
            .map_err(|e| e.or_not_found(|| format!("issue '{}/{}#{}'", org, repo, slug)))
    }
}
