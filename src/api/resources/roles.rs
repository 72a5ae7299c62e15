//
//  sourcecraft-cli
//  api/resources/roles.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository access roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::client::SourceCraftClient;
use crate::api::common::{ApiError, Envelope, Page};

/// Repository role, from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoRole {
    Viewer,
    Contributor,
    Developer,
    Maintainer,
    Admin,
}

impl RepoRole {
    pub const ALL: [RepoRole; 5] = [
        RepoRole::Viewer,
        RepoRole::Contributor,
        RepoRole::Developer,
        RepoRole::Maintainer,
        RepoRole::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RepoRole::Viewer => "viewer",
            RepoRole::Contributor => "contributor",
            RepoRole::Developer => "developer",
            RepoRole::Maintainer => "maintainer",
            RepoRole::Admin => "admin",
        }
    }
}

impl fmt::Display for RepoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role '{input}'. Allowed roles: {}", allowed_roles())]
pub struct InvalidRole {
    pub input: String,
}

fn allowed_roles() -> String {
    RepoRole::ALL
        .iter()
        .map(RepoRole::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl FromStr for RepoRole {
    type Err = InvalidRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RepoRole::ALL
            .into_iter()
            .find(|role| role.as_str() == wanted)
            .ok_or_else(|| InvalidRole {
                input: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    #[serde(rename = "type")]
    pub kind: SubjectType,

    pub id: String,
}

/// One grant sent to the add and remove endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectRole {
    pub role: RepoRole,

    pub subject: Subject,
}

impl SubjectRole {
    pub fn user(id: impl Into<String>, role: RepoRole) -> Self {
        Self {
            role,
            subject: Subject {
                kind: SubjectType::User,
                id: id.into(),
            },
        }
    }
}

/// Body shared by the add and remove endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectRoles {
    pub subject_roles: Vec<SubjectRole>,
}

/// A grant as listed by the server.
///
/// Roles and subject types are kept as sent, so kinds this client cannot
/// grant (groups, service accounts, newer roles) still list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub role: String,

    pub subject: BoundSubject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundSubject {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub id: String,
}

impl RoleBinding {
    /// The role as a [`RepoRole`], when it is one this client knows.
    pub fn known_role(&self) -> Option<RepoRole> {
        self.role.parse().ok()
    }
}

#[derive(Debug, Deserialize)]
struct SubjectRoleList {
    #[serde(default)]
    subject_roles: Vec<RoleBinding>,

    #[serde(default)]
    next_page_token: Option<String>,
}

impl Envelope for SubjectRoleList {
    type Item = RoleBinding;

    fn into_page(self) -> Page<RoleBinding> {
        Page::new(self.subject_roles, self.next_page_token)
    }
}

impl SourceCraftClient {
    pub async fn list_repo_roles(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Page<RoleBinding>, ApiError> {
        self.get_page::<SubjectRoleList>(&format!("/repos/{}/{}/roles", org, repo))
            .await
    }

    pub async fn add_repo_role(
        &self,
        org: &str,
        repo: &str,
        roles: Vec<SubjectRole>,
    ) -> Result<(), ApiError> {
        let body = SubjectRoles {
            subject_roles: roles,
        };
        self.post_unit(&format!("/repos/{}/{}/roles", org, repo), &body)
            .await
    }

    pub async fn remove_repo_role(
        &self,
        org: &str,
        repo: &str,
        roles: Vec<SubjectRole>,
    ) -> Result<(), ApiError> {
        let body = SubjectRoles {
            subject_roles: roles,
        };
        self.post_unit(&format!("/repos/{}/{}/roles/remove", org, repo), &body)
            .await
    }
}
