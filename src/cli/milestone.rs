//
//  sourcecraft-cli
//  cli/milestone.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Milestone commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;

use super::{GlobalOptions, Session};
use crate::api::resources::{CreateMilestone, Milestone};
use crate::output::{
    format_status, print_field, print_header, print_optional_field, write_json, TableOutput,
    TableRow,
};
use crate::util::{format_timestamp, parse_date, truncate};

/// Manage milestones
#[derive(Args, Debug)]
pub struct MilestoneCommand {
    #[command(subcommand)]
    pub command: MilestoneSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MilestoneSubcommand {
    /// List milestones
    #[command(visible_alias = "ls")]
    List,

    /// View a milestone
    View(ViewArgs),

    /// Create a milestone
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Milestone slug
    pub slug: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Milestone name
    pub name: String,

    /// Slug (generated by the server when omitted)
    #[arg(long)]
    pub slug: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Start date as YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<String>,

    /// Deadline as YYYY-MM-DD
    #[arg(long, value_parser = parse_date)]
    pub deadline: Option<String>,
}

impl TableRow for Milestone {
    fn headers() -> &'static [&'static str] {
        &["SLUG", "NAME", "STATUS", "START", "DEADLINE"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        vec![
            self.slug.clone().unwrap_or_default(),
            truncate(self.name.as_deref().unwrap_or(""), 40),
            format_status(self.status.as_deref().unwrap_or(""), color),
            date_only(self.start_date.as_deref()),
            date_only(self.deadline.as_deref()),
        ]
    }
}

impl TableOutput for Milestone {
    fn print_table(&self, color: bool) {
        print_header(self.name.as_deref().unwrap_or("Milestone"));
        println!();

        print_optional_field("Slug", self.slug.as_deref(), color);
        print_field(
            "Status",
            &format_status(self.status.as_deref().unwrap_or("-"), color),
            color,
        );
        print_optional_field("Description", self.description.as_deref(), color);
        print_field("Start", &date_only(self.start_date.as_deref()), color);
        print_field("Deadline", &date_only(self.deadline.as_deref()), color);
        if let Some(author) = &self.author {
            print_field("Author", author.display_name(), color);
        }
        print_field("Updated", &format_timestamp(self.updated_at.as_deref()), color);
    }
}

/// The date part of an RFC 3339 timestamp, or `-`.
fn date_only(value: Option<&str>) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => v.split('T').next().unwrap_or(v).to_string(),
        None => "-".to_string(),
    }
}

impl MilestoneCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            MilestoneSubcommand::List => self.list(global).await,
            MilestoneSubcommand::View(args) => self.view(args, global).await,
            MilestoneSubcommand::Create(args) => self.create(args, global).await,
        }
    }

    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let page = session
            .client
            .list_milestones(&context.org, &context.repo)
            .await?;
        global.output().write_page(&page, "No milestones found.")
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let milestone = session
            .client
            .get_milestone(&context.org, &context.repo, &args.slug)
            .await?;
        global.output().write(&milestone)
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let request = CreateMilestone {
            name: args.name.clone(),
            slug: args.slug.clone(),
            description: args.description.clone(),
            start_date: args.start_date.clone(),
            deadline: args.deadline.clone(),
        };

        let milestone = session
            .client
            .create_milestone(&context.org, &context.repo, &request)
            .await?;

        if global.json {
            return write_json(&milestone);
        }
        println!(
            "{} Created milestone '{}' ({}) in {}",
            style("✓").green(),
            milestone.name.as_deref().unwrap_or(&args.name),
            milestone.slug.as_deref().unwrap_or("-"),
            context
        );
        Ok(())
    }
}
