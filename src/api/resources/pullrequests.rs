//
//  sourcecraft-cli
//  api/resources/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request endpoints.
//!
//! Merging is modelled as setting an `approve` review decision; the server
//! performs the merge itself and takes no merge-strategy parameters.

use serde::{Deserialize, Serialize};

use crate::api::client::SourceCraftClient;
use crate::api::common::{ApiError, Envelope, Page, UserRef};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub author: Option<UserRef>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub source_branch: Option<String>,

    #[serde(default)]
    pub target_branch: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePullRequest {
    pub title: String,

    pub source_branch: String,

    pub target_branch: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewer_ids: Vec<String>,

    /// `false` creates a draft.
    pub publish: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdatePullRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
}

impl UpdatePullRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.target_branch.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Block,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetDecision {
    pub review_decision: ReviewDecision,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionResult {
    #[serde(default)]
    pub created_decision: Option<String>,

    #[serde(default)]
    pub pull_request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PullRequestList {
    #[serde(default)]
    pull_requests: Vec<PullRequest>,

    #[serde(default)]
    next_page_token: Option<String>,
}

impl Envelope for PullRequestList {
    type Item = PullRequest;

    fn into_page(self) -> Page<PullRequest> {
        Page::new(self.pull_requests, self.next_page_token)
    }
}

impl SourceCraftClient {
    pub async fn list_pull_requests(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Page<PullRequest>, ApiError> {
        self.get_page::<PullRequestList>(&format!("/repos/{}/{}/pulls", org, repo))
            .await
    }

    pub async fn create_pull_request(
        &self,
        org: &str,
        repo: &str,
        request: &CreatePullRequest,
    ) -> Result<PullRequest, ApiError> {
        self.post_json(&format!("/repos/{}/{}/pulls", org, repo), request)
            .await
    }

    pub async fn get_pull_request(
        &self,
        org: &str,
        repo: &str,
        slug: &str,
    ) -> Result<PullRequest, ApiError> {
        self.get_json(&format!("/repos/{}/{}/pulls/{}", org, repo, slug))
            .await
            .map_err(|e| e.or_not_found(|| format!("pull request '{}/{}#{}'", org, repo, slug)))
    }

    pub async fn update_pull_request(
        &self,
        org: &str,
        repo: &str,
        slug: &str,
        request: &UpdatePullRequest,
    ) -> Result<PullRequest, ApiError> {
        self.patch_json(&format!("/repos/{}/{}/pulls/{}", org, repo, slug), request)
            .await
            .map_err(|e| e.or_not_found(|| format!("pull request '{}/{}#{}'", org, repo, slug)))
    }

    /// Approves the pull request, which lets the server merge it.
    pub async fn merge_pull_request(
        &self,
        org: &str,
        repo: &str,
        slug: &str,
    ) -> Result<DecisionResult, ApiError> {
        let body = SetDecision {
            review_decision: ReviewDecision::Approve,
        };
        self.post_json(
            &format!("/repos/{}/{}/pulls/{}/decision", org, repo, slug),
            &body,
        )
        .await
        .map_err(|e| e.or_not_found(|| format!("pull request '{}/{}#{}'", org, repo, slug)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_pull_request_body() {
        let request = CreatePullRequest {
            title: "Add retries".to_string(),
            source_branch: "feature".to_string(),
            target_branch: "main".to_string(),
            description: None,
            reviewer_ids: Vec::new(),
            publish: false,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "title": "Add retries",
                "source_branch": "feature",
                "target_branch": "main",
                "publish": false
            })
        );
    }

    #[test]
    fn test_decision_body() {
        let body = SetDecision {
            review_decision: ReviewDecision::Approve,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"review_decision":"approve"}"#
        );
    }

    #[test]
    fn test_update_is_empty() {
        assert!(UpdatePullRequest::default().is_empty());
        let update = UpdatePullRequest {
            title: Some("New".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
