//
//  sourcecraft-cli
//  api/resources/milestones.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use serde::{Deserialize, Serialize};

use crate::api::client::SourceCraftClient;
use crate::api::common::{ApiError, Envelope, Page, UserRef};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Milestone {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub deadline: Option<String>,

    /// `open` or `closed`.
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub author: Option<UserRef>,

    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateMilestone {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// RFC 3339 timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// RFC 3339 timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

// Milestones use the generic `items` field name.
#[derive(Debug, Deserialize)]
struct MilestoneList {
    #[serde(default)]
    items: Vec<Milestone>,

    #[serde(default)]
    next_page_token: Option<String>,
}

impl Envelope for MilestoneList {
    type Item = Milestone;

    fn into_page(self) -> Page<Milestone> {
        Page::new(self.items, self.next_page_token)
    }
}

impl SourceCraftClient {
    pub async fn list_milestones(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Page<Milestone>, ApiError> {
        self.get_page::<MilestoneList>(&format!("/repos/{}/{}/milestones", org, repo))
            .await
    }

    pub async fn create_milestone(
        &self,
        org: &str,
        repo: &str,
        request: &CreateMilestone,
    ) -> Result<Milestone, ApiError> {
        self.post_json(&format!("/repos/{}/{}/milestones", org, repo), request)
            .await
    }

    pub async fn get_milestone(
        &self,
        org: &str,
        repo: &str,
        slug: &str,
    ) -> Result<Milestone, ApiError> {
        self.get_json(&format!("/repos/{}/{}/milestones/{}", org, repo, slug))
            .await
            .map_err(|e| e.or_not_found(|| format!("milestone '{}' in '{}/{}'", slug, org, repo)))
    }
}
