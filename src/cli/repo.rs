//
//  sourcecraft-cli
//  cli/repo.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository commands: list, create, view, fork and clone.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use super::{GlobalOptions, Session};
use crate::api::resources::{CreateRepoRequest, ForkRepoRequest, Repo, Visibility};
use crate::context::{clone_repository, parse_repo_arg, CloneTarget, RepoContext};
use crate::output::{
    print_field, print_header, print_optional_field, write_json, TableOutput, TableRow,
};
use crate::util::{format_timestamp, slugify, truncate};

/// Manage repositories
#[derive(Args, Debug)]
pub struct RepoCommand {
    #[command(subcommand)]
    pub command: RepoSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum RepoSubcommand {
    /// List repositories of an organization
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a repository in the configured organization
    Create(CreateArgs),

    /// View repository details
    View(ViewArgs),

    /// Fork a repository into another organization
    Fork(ForkArgs),

    /// Clone a repository
    Clone(CloneArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Organization slug (defaults to the configured organization)
    #[arg(long)]
    pub org: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Display name of the repository
    pub name: String,

    /// URL-friendly slug (generated from the name when omitted)
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Defaults to the organization setting
    #[arg(long, value_enum)]
    pub visibility: Option<Visibility>,

    /// Organization slug (defaults to the configured organization)
    #[arg(long)]
    pub org: Option<String>,
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// SLUG or ORG/REPO (defaults to the current repository)
    pub repository: Option<String>,

    /// Open in the browser
    #[arg(long, short = 'w')]
    pub web: bool,
}

#[derive(Args, Debug)]
pub struct ForkArgs {
    /// Source repository as ORG/REPO
    pub source: String,

    /// Organization that receives the fork
    #[arg(long)]
    pub org: Option<String>,

    /// Slug for the fork (defaults to the source slug)
    #[arg(long)]
    pub slug: Option<String>,

    /// Only copy the default branch
    #[arg(long)]
    pub default_branch_only: bool,
}

#[derive(Args, Debug)]
pub struct CloneArgs {
    /// SLUG, ORG/REPO or a clone URL
    pub repository: String,

    /// Target directory (defaults to the repository slug)
    pub directory: Option<String>,

    /// Clone over HTTPS instead of SSH
    #[arg(long)]
    pub https: bool,
}

impl TableRow for Repo {
    fn headers() -> &'static [&'static str] {
        &["NAME", "SLUG", "VISIBILITY", "DESCRIPTION", "SSH URL"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let visibility = self.visibility.clone().unwrap_or_default();
        let visibility = if color && visibility == "private" {
            style(visibility).yellow().to_string()
        } else {
            visibility
        };
        vec![
            self.name.clone().unwrap_or_default(),
            self.slug.clone().unwrap_or_default(),
            visibility,
            truncate(self.description.as_deref().unwrap_or(""), 50),
            ssh_url(self).unwrap_or_default().to_string(),
        ]
    }
}

impl TableOutput for Repo {
    fn print_table(&self, color: bool) {
        let title = self
            .full_name()
            .or_else(|| self.slug.clone())
            .unwrap_or_default();
        print_header(&title);
        println!();

        print_optional_field("Name", self.name.as_deref(), color);
        print_optional_field("Description", self.description.as_deref(), color);
        print_optional_field("Visibility", self.visibility.as_deref(), color);
        print_optional_field("Default branch", self.default_branch.as_deref(), color);
        if let Some(empty) = self.is_empty {
            print_field("Empty", if empty { "yes" } else { "no" }, color);
        }
        if let Some(language) = self.language.as_ref().and_then(|l| l.name.as_deref()) {
            print_field("Language", language, color);
        }
        if let Some(parent) = &self.parent {
            let owner = parent.owner.as_ref().map(|o| o.display_name()).unwrap_or("-");
            let slug = parent.slug.as_deref().unwrap_or("-");
            print_field("Forked from", &format!("{}/{}", owner, slug), color);
        }

        println!();
        print_optional_field("SSH URL", ssh_url(self), color);
        print_optional_field(
            "HTTPS URL",
            self.clone_url.as_ref().and_then(|c| c.https.as_deref()),
            color,
        );
        if self.last_updated.is_some() {
            print_field(
                "Updated",
                &format_timestamp(self.last_updated.as_deref()),
                color,
            );
        }
    }
}

fn ssh_url(repo: &Repo) -> Option<&str> {
    repo.clone_url.as_ref().and_then(|c| c.ssh.as_deref())
}

/// SSH by default, HTTPS when asked or when no SSH URL is published.
fn pick_clone_url(repo: &Repo, https: bool) -> Result<String> {
    let urls = repo.clone_url.clone().unwrap_or_default();
    let ssh = urls.ssh.filter(|u| !u.is_empty());
    let http = urls.https.filter(|u| !u.is_empty());

    if https {
        return http.ok_or_else(|| anyhow::anyhow!("HTTPS clone URL not available for this repository"));
    }
    ssh.or(http)
        .ok_or_else(|| anyhow::anyhow!("No clone URL available for this repository"))
}

/// Last path segment of a clone URL without `.git`.
fn directory_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    trimmed
        .rsplit(['/', ':'])
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl RepoCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RepoSubcommand::List(args) => self.list(args, global).await,
            RepoSubcommand::Create(args) => self.create(args, global).await,
            RepoSubcommand::View(args) => self.view(args, global).await,
            RepoSubcommand::Fork(args) => self.fork(args, global).await,
            RepoSubcommand::Clone(args) => self.clone_repo(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let org = session.resolver().organization(args.org.as_deref())?;
        let output = global.output();

        output.write_info(&format!("Repositories of organization '{}'", org));
        let page = session.client.list_repositories(&org).await?;
        output.write_page(&page, "No repositories found.")
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let org = session.resolver().organization(args.org.as_deref())?;
        let output = global.output();

        let slug = match &args.slug {
            Some(slug) => slug.clone(),
            None => {
                let slug = slugify(&args.name);
                output.write_info(&format!("Generated slug: {} (use --slug to override)", slug));
                slug
            }
        };

        let request = CreateRepoRequest {
            name: args.name.clone(),
            slug,
            description: args.description.clone(),
            visibility: args.visibility,
        };

        let repo = session.client.create_repository(&org, &request).await?;

        if output.is_json() {
            return write_json(&repo);
        }

        println!(
            "{} Created repository {}/{}",
            style("✓").green(),
            org,
            repo.slug.as_deref().unwrap_or(&request.slug)
        );
        if let Some(url) = ssh_url(&repo) {
            println!("  SSH clone URL: {}", url);
        }
        Ok(())
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = match &args.repository {
            Some(identifier) => session.resolver().resolve_named(identifier)?,
            None => session.repo(global)?,
        };

        if args.web {
            return open_in_browser(&context.web_url());
        }

        let repo = session
            .client
            .get_repository(&context.org, &context.repo)
            .await?;
        global.output().write(&repo)
    }

    async fn fork(&self, args: &ForkArgs, global: &GlobalOptions) -> Result<()> {
        let source = parse_repo_arg(&args.source)?;
        let session = Session::open(global)?;
        let target_org = session.resolver().organization(args.org.as_deref())?;
        let output = global.output();

        let target_slug = args.slug.clone().unwrap_or_else(|| source.repo.clone());
        output.write_info(&format!(
            "Forking {} to {}/{}",
            source, target_org, target_slug
        ));

        let request = ForkRepoRequest {
            org_slug: target_org.clone(),
            slug: args.slug.clone(),
            default_branch_only: args.default_branch_only,
        };
        let fork = session
            .client
            .fork_repository(&source.org, &source.repo, &request)
            .await?;

        if output.is_json() {
            return write_json(&fork);
        }

        let owner = fork
            .owner
            .as_ref()
            .and_then(|o| o.slug.clone())
            .unwrap_or(target_org);
        println!(
            "{} Forked {} to {}/{}",
            style("✓").green(),
            source,
            owner,
            fork.slug.as_deref().unwrap_or(&target_slug)
        );
        if let Some(url) = ssh_url(&fork) {
            println!("  SSH clone URL: {}", url);
        }
        Ok(())
    }

    async fn clone_repo(&self, args: &CloneArgs, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;
        let resolver = crate::context::ContextResolver::new(&config);

        let (url, default_dir) = match CloneTarget::parse(&args.repository, &resolver)? {
            CloneTarget::Url(url) => {
                let dir = directory_from_url(&url);
                (url, dir)
            }
            CloneTarget::Repo(RepoContext { org, repo }) => {
                let session = Session::open(global)?;
                let details = session.client.get_repository(&org, &repo).await?;
                (pick_clone_url(&details, args.https)?, Some(repo))
            }
        };

        let directory = match args.directory.clone().or(default_dir) {
            Some(dir) => dir,
            None => bail!("Could not determine a target directory; pass it as the second argument"),
        };

        println!("Cloning into '{}'...", directory);
        clone_repository(&url, Some(&directory))?;
        println!("{} Cloned {}", style("✓").green(), url);
        Ok(())
    }
}

pub(super) fn open_in_browser(url: &str) -> Result<()> {
    webbrowser::open(url)?;
    println!("Opened {} in browser", url);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::CloneUrl;

    fn repo_with(ssh: Option<&str>, https: Option<&str>) -> Repo {
        Repo {
            clone_url: Some(CloneUrl {
                ssh: ssh.map(str::to_string),
                https: https.map(str::to_string),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_clone_url_prefers_ssh() {
        let repo = repo_with(Some("git@host:acme/app.git"), Some("https://host/acme/app.git"));
        assert_eq!(pick_clone_url(&repo, false).unwrap(), "git@host:acme/app.git");
        assert_eq!(pick_clone_url(&repo, true).unwrap(), "https://host/acme/app.git");
    }

    #[test]
    fn test_clone_url_falls_back_to_https() {
        let repo = repo_with(None, Some("https://host/acme/app.git"));
        assert_eq!(pick_clone_url(&repo, false).unwrap(), "https://host/acme/app.git");
    }

    #[test]
    fn test_clone_url_missing() {
        let repo = repo_with(Some("git@host:acme/app.git"), None);
        assert!(pick_clone_url(&repo, true).is_err());
        assert!(pick_clone_url(&Repo::default(), false).is_err());
    }

    #[test]
    fn test_directory_from_url() {
        assert_eq!(
            directory_from_url("git@host:acme/app.git").as_deref(),
            Some("app")
        );
        assert_eq!(
            directory_from_url("https://host/acme/app/").as_deref(),
            Some("app")
        );
    }

    #[test]
    fn test_list_row_truncates_description() {
        let repo = Repo {
            name: Some("App".to_string()),
            description: Some("x".repeat(80)),
            ..Default::default()
        };
        let row = repo.row(false);
        assert_eq!(row.len(), Repo::headers().len());
        assert!(row[3].chars().count() <= 50);
    }
}
