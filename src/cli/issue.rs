//
//  sourcecraft-cli
//  cli/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Issue commands.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use super::repo::open_in_browser;
use super::{GlobalOptions, Session};
use crate::api::resources::{CreateIssue, Issue, Priority, UpdateIssue};
use crate::interactive::{can_prompt, prompt_input_optional, value_or_prompt};
use crate::output::{
    format_status, print_field, print_header, print_optional_field, write_json, TableOutput,
    TableRow,
};
use crate::util::{format_timestamp, truncate};

/// Manage issues
#[derive(Args, Debug)]
pub struct IssueCommand {
    #[command(subcommand)]
    pub command: IssueSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueSubcommand {
    /// List issues
    #[command(visible_alias = "ls")]
    List,

    /// View an issue
    View(ViewArgs),

    /// Create an issue
    Create(CreateArgs),

    /// Update fields of an issue
    Update(UpdateArgs),

    /// Close an issue
    Close(CloseArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Issue slug
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

    #[arg(long, short = 'p', value_enum)]
    pub priority: Option<Priority>,

    /// Assignee user ID
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Milestone ID
    #[arg(long, short = 'm')]
    pub milestone: Option<String>,

    /// Label IDs
    #[arg(long = "label", short = 'l', value_name = "LABEL_ID")]
    pub labels: Vec<String>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Issue slug
    pub slug: String,

    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// New status slug
    #[arg(long, short = 's')]
    pub status: Option<String>,

    #[arg(long, short = 'p', value_enum)]
    pub priority: Option<Priority>,

    /// Assignee user ID
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Milestone ID
    #[arg(long, short = 'm')]
    pub milestone: Option<String>,
}

#[derive(Args, Debug)]
pub struct CloseArgs {
    /// Issue slug
    pub slug: String,
}

impl UpdateArgs {
    fn to_request(&self) -> UpdateIssue {
        UpdateIssue {
            title: self.title.clone(),
            description: self.body.clone(),
            status_slug: self.status.clone(),
            priority: self.priority,
            assignee_id: self.assignee.clone(),
            milestone_id: self.milestone.clone(),
        }
    }
}

impl TableRow for Issue {
    fn headers() -> &'static [&'static str] {
        &["ID", "TITLE", "STATUS", "PRIORITY", "ASSIGNEE", "UPDATED"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.slug.clone().unwrap_or_default(),
            truncate(self.title.as_deref().unwrap_or(""), 50),
            format_status(status_label(self), color),
            self.priority.clone().unwrap_or_default(),
            self.assignee
                .as_ref()
                .map(|a| a.display_name().to_string())
                .unwrap_or_default(),
            format_timestamp(self.updated_at.as_deref()),
        ]
    }
}

impl TableOutput for Issue {
    fn print_table(&self, color: bool) {
        print_header(&format!(
            "#{} {}",
            self.slug.as_deref().unwrap_or("-"),
            self.title.as_deref().unwrap_or("")
        ));
        println!();

        print_field("Status", &format_status(status_label(self), color), color);
        print_optional_field("Priority", self.priority.as_deref(), color);
        if let Some(author) = &self.author {
            print_field("Author", author.display_name(), color);
        }
        if let Some(assignee) = &self.assignee {
            print_field("Assignee", assignee.display_name(), color);
        }
        if !self.labels.is_empty() {
            let labels: Vec<&str> = self
                .labels
                .iter()
                .filter_map(|l| l.name.as_deref().or(l.slug.as_deref()))
                .collect();
            print_field("Labels", &labels.join(", "), color);
        }
        print_optional_field(
            "Milestone",
            self.milestone.as_ref().and_then(|m| m.slug.as_deref()),
            color,
        );
        print_optional_field("Deadline", self.deadline.as_deref(), color);
        print_field("Created", &format_timestamp(self.created_at.as_deref()), color);
        print_field("Updated", &format_timestamp(self.updated_at.as_deref()), color);

        if let Some(description) = self.description.as_deref().filter(|d| !d.is_empty()) {
            println!();
            println!("{}", description);
        }
    }
}

fn status_label(issue: &Issue) -> &str {
    issue.status.as_ref().map(|s| s.label()).unwrap_or("-")
}

impl IssueCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            IssueSubcommand::List => self.list(global).await,
            IssueSubcommand::View(args) => self.view(args, global).await,
            IssueSubcommand::Create(args) => self.create(args, global).await,
            IssueSubcommand::Update(args) => self.update(args, global).await,
            IssueSubcommand::Close(args) => self.close(args, global).await,
        }
    }

    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let page = session.client.list_issues(&context.org, &context.repo).await?;
        global.output().write_page(&page, "No issues found.")
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        if args.web {
            return open_in_browser(&context.issue_url(&args.slug));
        }

        let issue = session
            .client
            .get_issue(&context.org, &context.repo, &args.slug)
            .await?;
        global.output().write(&issue)
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let title = value_or_prompt(
            args.title.as_deref(),
            "Title",
            None,
            global.no_prompt,
            "--title",
        )?;
        let description = match &args.body {
            Some(body) => Some(body.clone()),
            None if args.title.is_none() && can_prompt(global.no_prompt) => {
                prompt_input_optional("Description (optional)")?
            }
            None => None,
        };

        let request = CreateIssue {
            title,
            description,
            status_slug: None,
            priority: args.priority,
            assignee_id: args.assignee.clone(),
            milestone_id: args.milestone.clone(),
            label_ids: args.labels.clone(),
        };

        let issue = session
            .client
            .create_issue(&context.org, &context.repo, &request)
            .await?;

        if global.json {
            return write_json(&issue);
        }
        let slug = issue.slug.as_deref().unwrap_or("-");
        println!(
            "{} Created issue #{} in {}",
            style("✓").green(),
            slug,
            context
        );
        println!("  {}", context.issue_url(slug));
        Ok(())
    }

    async fn update(&self, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
        let request = args.to_request();
        if request.is_empty() {
            bail!("Nothing to update. Pass at least one field flag, e.g. --title or --status");
        }
        self.apply(&args.slug, &request, "Updated", global).await
    }

    async fn close(&self, args: &CloseArgs, global: &GlobalOptions) -> Result<()> {
        self.apply(&args.slug, &UpdateIssue::close(), "Closed", global)
            .await
    }

    async fn apply(
        &self,
        slug: &str,
        request: &UpdateIssue,
        verb: &str,
        global: &GlobalOptions,
    ) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let issue = session
            .client
            .update_issue(&context.org, &context.repo, slug, request)
            .await?;

        if global.json {
            return write_json(&issue);
        }
        println!(
            "{} {} issue #{} ({})",
            style("✓").green(),
            verb,
            slug,
            status_label(&issue)
        );
        Ok(())
    }
}
