//
//  sourcecraft-cli
//  cli/pr.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request commands.
//!
//! `create` fills in what it can from the local checkout: the current branch
//! becomes the source, the repository default branch the target, the last
//! commit title the suggested title and the commit subjects between the two
//! branches the suggested description.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use super::repo::open_in_browser;
use super::{GlobalOptions, Session};
use crate::api::resources::{CreatePullRequest, PullRequest, UpdatePullRequest};
use crate::context::{GitContext, RepoContext};
use crate::interactive::{
    can_prompt, prompt_input_optional, prompt_input_with_default, value_or_prompt,
};
use crate::output::{
    format_status, print_field, print_header, write_json, TableOutput, TableRow,
};
use crate::util::{format_timestamp, truncate};

/// Target branch when the repository does not report one.
const FALLBACK_BASE_BRANCH: &str = "main";

/// Manage pull requests
#[derive(Args, Debug)]
pub struct PrCommand {
    #[command(subcommand)]
    pub command: PrSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PrSubcommand {
    /// List pull requests
    #[command(visible_alias = "ls")]
    List,

    /// View a pull request
    View(ViewArgs),

    /// Create a pull request
    Create(CreateArgs),

    /// Edit the title, description or target branch of a pull request
    Edit(EditArgs),

    /// Approve a pull request so the server merges it
    #[command(
        long_about = "Sets an 'approve' decision on the pull request. The server merges it once all checks pass.\n\n\
                      --squash, --rebase and --delete-branch are accepted for compatibility but the server ignores them."
    )]
    Merge(MergeArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Pull request slug
    pub slug: String,

    /// Open in the browser
    #[arg(long, short = 'w')]
    pub web: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Description
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// Target branch (defaults to the repository default branch)
    #[arg(long, short = 'B')]
    pub base: Option<String>,

    /// Source branch (defaults to the current branch)
    #[arg(long, short = 'H')]
    pub head: Option<String>,

    /// Reviewer user IDs
    #[arg(long = "reviewer", value_name = "USER_ID")]
    pub reviewers: Vec<String>,

    /// Create as a draft
    #[arg(long, short = 'd')]
    pub draft: bool,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Pull request slug
    pub slug: String,

    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// New target branch
    #[arg(long, short = 'B')]
    pub base: Option<String>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Pull request slug
    pub slug: String,

    /// Squash commits (ignored by the server)
    #[arg(long, conflicts_with = "rebase")]
    pub squash: bool,

    /// Rebase commits (ignored by the server)
    #[arg(long)]
    pub rebase: bool,

    /// Delete the source branch (ignored by the server)
    #[arg(long)]
    pub delete_branch: bool,
}

impl MergeArgs {
    fn has_strategy_flags(&self) -> bool {
        self.squash || self.rebase || self.delete_branch
    }
}

impl TableRow for PullRequest {
    fn headers() -> &'static [&'static str] {
        &["ID", "TITLE", "SOURCE -> TARGET", "STATUS", "AUTHOR", "UPDATED"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.slug.clone().unwrap_or_default(),
            truncate(self.title.as_deref().unwrap_or(""), 50),
            branches(self),
            format_status(self.status.as_deref().unwrap_or(""), color),
            self.author
                .as_ref()
                .map(|a| a.display_name().to_string())
                .unwrap_or_default(),
            format_timestamp(self.updated_at.as_deref()),
        ]
    }
}

impl TableOutput for PullRequest {
    fn print_table(&self, color: bool) {
        let slug = self.slug.as_deref().unwrap_or("-");
        print_header(&format!(
            "#{} {}",
            slug,
            self.title.as_deref().unwrap_or("")
        ));
        println!();

        print_field(
            "Status",
            &format_status(self.status.as_deref().unwrap_or("-"), color),
            color,
        );
        print_field("Branches", &branches(self), color);
        if let Some(author) = &self.author {
            print_field("Author", author.display_name(), color);
        }
        print_field("Updated", &format_timestamp(self.updated_at.as_deref()), color);

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            println!();
            println!("{}", description);
        }
    }
}

fn branches(pr: &PullRequest) -> String {
    format!(
        "{} -> {}",
        pr.source_branch.as_deref().unwrap_or("?"),
        pr.target_branch.as_deref().unwrap_or("?")
    )
}

/// Bullet list of commit subjects, used as a suggested description.
fn describe_commits(subjects: &[String]) -> Option<String> {
    if subjects.is_empty() {
        return None;
    }
    Some(
        subjects
            .iter()
            .map(|s| format!("- {}", s))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}

fn print_created(context: &RepoContext, pr: &PullRequest, draft: bool) {
    let slug = pr.slug.as_deref().unwrap_or("-");
    let kind = if draft { "draft pull request" } else { "pull request" };
    println!(
        "{} Created {} #{} in {}",
        style("✓").green(),
        kind,
        slug,
        context
    );
    println!("  {}", branches(pr));
    println!("  {}", context.pull_request_url(slug));
}

impl PrCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PrSubcommand::List => self.list(global).await,
            PrSubcommand::View(args) => self.view(args, global).await,
            PrSubcommand::Create(args) => self.create(args, global).await,
            PrSubcommand::Edit(args) => self.edit(args, global).await,
            PrSubcommand::Merge(args) => self.merge(args, global).await,
        }
    }

    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let page = session
            .client
            .list_pull_requests(&context.org, &context.repo)
            .await?;
        global.output().write_page(&page, "No pull requests found.")
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        if args.web {
            return open_in_browser(&context.pull_request_url(&args.slug));
        }

        let pr = session
            .client
            .get_pull_request(&context.org, &context.repo, &args.slug)
            .await?;
        global.output().write(&pr)
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;
        let output = global.output();
        let git = GitContext::open().ok();

        let head = match &args.head {
            Some(head) => head.clone(),
            None => match &git {
                Some(git) => git.current_branch()?,
                None => bail!("Not in a git repository; pass the source branch with --head"),
            },
        };

        let base = match &args.base {
            Some(base) => base.clone(),
            None => match session
                .client
                .get_repository(&context.org, &context.repo)
                .await
            {
                Ok(repo) => repo
                    .default_branch
                    .filter(|b| !b.is_empty())
                    .unwrap_or_else(|| FALLBACK_BASE_BRANCH.to_string()),
                Err(e) => {
                    output.write_warning(&format!(
                        "Could not read repository details ({}); targeting '{}'",
                        e, FALLBACK_BASE_BRANCH
                    ));
                    FALLBACK_BASE_BRANCH.to_string()
                }
            },
        };

        if head == base {
            bail!(
                "The source branch ('{}') and the target branch ('{}') cannot be the same",
                head,
                base
            );
        }

        let suggested_title = git.as_ref().and_then(|g| g.last_commit_title().ok());
        let title = value_or_prompt(
            args.title.as_deref(),
            "Title",
            suggested_title.as_deref(),
            global.no_prompt,
            "--title",
        )?;

        let description = match &args.body {
            Some(body) => Some(body.clone()),
            None => {
                let suggested = git
                    .as_ref()
                    .and_then(|g| g.commit_subjects(&base, &head).ok())
                    .and_then(|subjects| describe_commits(&subjects));
                if can_prompt(global.no_prompt) {
                    match suggested {
                        Some(text) => Some(prompt_input_with_default("Description", &text)?),
                        None => prompt_input_optional("Description (optional)")?,
                    }
                } else {
                    suggested
                }
            }
        };

        let request = CreatePullRequest {
            title,
            source_branch: head,
            target_branch: base,
            description: description.filter(|d| !d.trim().is_empty()),
            reviewer_ids: args.reviewers.clone(),
            publish: !args.draft,
        };

        let pr = session
            .client
            .create_pull_request(&context.org, &context.repo, &request)
            .await?;

        if output.is_json() {
            return write_json(&pr);
        }
        print_created(&context, &pr, args.draft);
        Ok(())
    }

    async fn edit(&self, args: &EditArgs, global: &GlobalOptions) -> Result<()> {
        let request = UpdatePullRequest {
            title: args.title.clone(),
            description: args.body.clone(),
            target_branch: args.base.clone(),
        };
        if request.is_empty() {
            bail!("Nothing to update. Pass at least one of --title, --body or --base");
        }

        let session = Session::open(global)?;
        let context = session.repo(global)?;
        let pr = session
            .client
            .update_pull_request(&context.org, &context.repo, &args.slug, &request)
            .await?;

        if global.json {
            return write_json(&pr);
        }
        println!(
            "{} Updated pull request #{}",
            style("✓").green(),
            args.slug
        );
        Ok(())
    }

    async fn merge(&self, args: &MergeArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;
        let output = global.output();

        if args.has_strategy_flags() {
            output.write_warning(
                "--squash, --rebase and --delete-branch are not supported by the API and will be ignored",
            );
        }

        let result = session
            .client
            .merge_pull_request(&context.org, &context.repo, &args.slug)
            .await?;

        if output.is_json() {
            return write_json(&result);
        }

        let decision = result.created_decision.as_deref().unwrap_or("");
        if decision == "approve" {
            println!(
                "{} Approved pull request #{}; the server merges it once all checks pass",
                style("✓").green(),
                args.slug
            );
        } else {
            println!(
                "Pull request #{} decision set to '{}'",
                args.slug,
                if decision.is_empty() { "unknown" } else { decision }
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(subcommand)]
        command: PrSubcommand,
    }

    #[test]
    fn test_merge_rejects_squash_with_rebase() {
        let parsed = Harness::try_parse_from(["pr", "merge", "7", "--squash", "--rebase"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_merge_flags_trigger_warning() {
        let parsed = Harness::try_parse_from(["pr", "merge", "7", "--delete-branch"]).unwrap();
        match parsed.command {
            PrSubcommand::Merge(args) => assert!(args.has_strategy_flags()),
            _ => panic!("expected merge"),
        }
    }

    #[test]
    fn test_describe_commits() {
        let subjects = vec!["Add retry".to_string(), "Fix typo".to_string()];
        assert_eq!(
            describe_commits(&subjects).as_deref(),
            Some("- Add retry\n- Fix typo")
        );
        assert_eq!(describe_commits(&[]), None);
    }

    #[test]
    fn test_row_shows_branches() {
        let pr = PullRequest {
            slug: Some("3".to_string()),
            source_branch: Some("feature".to_string()),
            target_branch: Some("main".to_string()),
            ..Default::default()
        };
        let row = pr.row(false);
        assert_eq!(row[0], "3");
        assert_eq!(row[2], "feature -> main");
        assert_eq!(row[5], "-");
    }
}
