//
//  sourcecraft-cli
//  cli/access.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository access commands (`src access role ...`).

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use super::{GlobalOptions, Session};
use crate::api::resources::{RepoRole, RoleBinding, SubjectRole};
use crate::context::{parse_repo_arg, RepoContext};
use crate::output::TableRow;

/// Manage repository access
#[derive(Args, Debug)]
pub struct AccessCommand {
    #[command(subcommand)]
    pub command: AccessSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AccessSubcommand {
    /// Manage user roles in a repository
    #[command(subcommand)]
    Role(RoleSubcommand),
}

#[derive(Subcommand, Debug)]
pub enum RoleSubcommand {
    /// List user roles
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Grant a role to a user
    Add(RoleArgs),

    /// Revoke a role from a user
    Remove(RoleArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository as ORG/REPO
    #[arg(value_parser = parse_repo)]
    pub repository: RepoContext,
}

#[derive(Args, Debug)]
pub struct RoleArgs {
    /// Repository as ORG/REPO
    #[arg(value_parser = parse_repo)]
    pub repository: RepoContext,

    /// User ID
    pub user_id: String,

    /// One of: viewer, contributor, developer, maintainer, admin
    pub role: RepoRole,
}

fn parse_repo(value: &str) -> Result<RepoContext, String> {
    parse_repo_arg(value).map_err(|e| e.to_string())
}

impl TableRow for RoleBinding {
    fn headers() -> &'static [&'static str] {
        &["SUBJECT ID", "TYPE", "ROLE"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let role = if color && self.known_role() == Some(RepoRole::Admin) {
            style(&self.role).red().to_string()
        } else {
            self.role.clone()
        };
        vec![self.subject.id.clone(), self.subject.kind.clone(), role]
    }
}

impl AccessCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AccessSubcommand::Role(RoleSubcommand::List(args)) => list(args, global).await,
            AccessSubcommand::Role(RoleSubcommand::Add(args)) => add(args, global).await,
            AccessSubcommand::Role(RoleSubcommand::Remove(args)) => remove(args, global).await,
        }
    }
}

async fn list(args: &ListArgs, global: &GlobalOptions) -> Result<()> {
    let session = Session::open(global)?;
    let repo = &args.repository;

    let page = session.client.list_repo_roles(&repo.org, &repo.repo).await?;
    global
        .output()
        .write_page(&page, "No roles found for this repository.")
}

async fn add(args: &RoleArgs, global: &GlobalOptions) -> Result<()> {
    let session = Session::open(global)?;
    let repo = &args.repository;

    session
        .client
        .add_repo_role(
            &repo.org,
            &repo.repo,
            vec![SubjectRole::user(args.user_id.as_str(), args.role)],
        )
        .await?;

    report(global, "granted", args)
}

async fn remove(args: &RoleArgs, global: &GlobalOptions) -> Result<()> {
    let session = Session::open(global)?;
    let repo = &args.repository;

    session
        .client
        .remove_repo_role(
            &repo.org,
            &repo.repo,
            vec![SubjectRole::user(args.user_id.as_str(), args.role)],
        )
        .await?;

    report(global, "revoked", args)
}

fn report(global: &GlobalOptions, action: &str, args: &RoleArgs) -> Result<()> {
    if global.json {
        let result = serde_json::json!({
            "success": true,
            "action": action,
            "repository": args.repository.full_name(),
            "user_id": args.user_id,
            "role": args.role,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{} Role '{}' {} for user {} in {}",
            style("✓").green(),
            args.role,
            action,
            args.user_id,
            args.repository
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        command: AccessSubcommand,
    }

    #[test]
    fn test_parse_add() {
        let parsed =
            Harness::try_parse_from(["access", "role", "add", "acme/app", "u-1", "Developer"])
                .unwrap();
        match parsed.command {
            AccessSubcommand::Role(RoleSubcommand::Add(args)) => {
                assert_eq!(args.repository, RepoContext::new("acme", "app"));
                assert_eq!(args.role, RepoRole::Developer);
            }
            _ => panic!("expected role add"),
        }
    }

    #[test]
    fn test_invalid_role_lists_allowed_values() {
        let err = Harness::try_parse_from(["access", "role", "add", "acme/app", "u-1", "owner"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("Allowed roles: viewer"));
    }

    #[test]
    fn test_row_shows_subject_type_as_sent() {
        let binding: RoleBinding = serde_json::from_str(
            r#"{"role":"developer","subject":{"type":"group","id":"g-1"}}"#,
        )
        .unwrap();
        assert_eq!(binding.row(false), vec!["g-1", "group", "developer"]);
    }

    #[test]
    fn test_repository_needs_two_segments() {
        assert!(Harness::try_parse_from(["access", "role", "list", "acme"]).is_err());
    }
}
