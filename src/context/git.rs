//
//  sourcecraft-cli
//  context/git.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Git Repository Operations
//!
//! Read-only queries against the local checkout through `git2`, plus
//! [`clone_repository`], which shells out to `git` so the user's credential
//! helpers and SSH agent apply.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sourcecraft_cli::context::GitContext;
//!
//! if let Ok(git) = GitContext::open() {
//!     if let Ok(branch) = git.current_branch() {
//!         println!("Current branch: {}", branch);
//!     }
//! }
//! ```

use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use git2::Repository;

pub struct GitContext {
    repo: Repository,
}

impl GitContext {
    /// Opens the repository containing the current directory.
    pub fn open() -> Result<Self> {
        let repo = Repository::discover(".").context("Not inside a git repository")?;
        Ok(Self { repo })
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let repo = Repository::open(path)?;
        Ok(Self { repo })
    }

    /// Short name of the checked-out branch. Detached HEAD is an error.
    pub fn current_branch(&self) -> Result<String> {
        if self.repo.head_detached().unwrap_or(false) {
            bail!("HEAD is detached; check out a branch first");
        }
        let head = self.repo.head().context("Failed to read HEAD")?;
        match head.shorthand() {
            Some(name) if head.is_branch() => Ok(name.to_string()),
            _ => bail!("HEAD does not point to a branch"),
        }
    }

    pub fn remote_url(&self, name: &str) -> Result<Option<String>> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
            Err(_) => Ok(None),
        }
    }

    pub fn origin_url(&self) -> Result<Option<String>> {
        self.remote_url("origin")
    }

    /// Subject line of the commit at HEAD.
    pub fn last_commit_title(&self) -> Result<String> {
        let commit = self
            .repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .context("Failed to read the last commit")?;
        Ok(commit.summary().unwrap_or_default().trim().to_string())
    }

    /// Subjects of the commits reachable from `head` but not from `base`,
    /// newest first.
    pub fn commit_subjects(&self, base: &str, head: &str) -> Result<Vec<String>> {
        let mut walk = self.repo.revwalk()?;
        walk.push_range(&format!("{}..{}", base, head))
            .with_context(|| format!("Failed to resolve range {}..{}", base, head))?;

        let mut subjects = Vec::new();
        for oid in walk {
            let commit = self.repo.find_commit(oid?)?;
            if let Some(summary) = commit.summary() {
                subjects.push(summary.trim().to_string());
            }
        }
        Ok(subjects)
    }
}

/// Runs `git clone <url> [dir]`, inheriting the terminal.
pub fn clone_repository(url: &str, directory: Option<&str>) -> Result<()> {
    let mut cmd = Command::new("git");
    cmd.arg("clone").arg(url);
    if let Some(dir) = directory {
        cmd.arg(dir);
    }

    tracing::debug!("Running git clone {}", url);
    let status = cmd.status().context("Failed to run git")?;
    if !status.success() {
        bail!("git clone failed with {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::Signature;
    use tempfile::TempDir;

    fn commit(repo: &Repository, message: &str) {
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn test_branch_and_commits() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Initial commit");
        let base = repo.head().unwrap().target().unwrap();
        repo.reference("refs/tags/base", base, true, "base").unwrap();
        commit(&repo, "Add feature\n\nLonger body");
        commit(&repo, "Fix typo");

        let git = GitContext::open_at(dir.path()).unwrap();
        let branch = git.current_branch().unwrap();
        assert!(branch == "master" || branch == "main");
        assert_eq!(git.last_commit_title().unwrap(), "Fix typo");
        assert_eq!(
            git.commit_subjects("base", "HEAD").unwrap(),
            vec!["Fix typo".to_string(), "Add feature".to_string()]
        );
    }

    #[test]
    fn test_detached_head_is_error() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit(&repo, "Initial commit");
        let oid = repo.head().unwrap().target().unwrap();
        repo.set_head_detached(oid).unwrap();

        let git = GitContext::open_at(dir.path()).unwrap();
        assert!(git.current_branch().is_err());
    }

    #[test]
    fn test_origin_url() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote("origin", "git@git.sourcecraft.dev:acme/widgets.git")
            .unwrap();

        let git = GitContext::open_at(dir.path()).unwrap();
        assert_eq!(
            git.origin_url().unwrap().as_deref(),
            Some("git@git.sourcecraft.dev:acme/widgets.git")
        );
        assert_eq!(git.remote_url("upstream").unwrap(), None);
    }
}
