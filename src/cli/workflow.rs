//
//  sourcecraft-cli
//  cli/workflow.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CI/CD workflow commands.
//!
//! A run fans out into workflows, each workflow into tasks and each task into
//! cubes. Logs and artifacts are addressed by the full
//! `<run> <workflow> <task> <cube>` path.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::{GlobalOptions, Session};
use crate::api::resources::{CubePath, Run, RunWorkflow};
use crate::output::{
    format_status, print_field, print_header, write_json, TableOutput, TableRow,
};
use crate::util::{format_size, format_timestamp};

/// Run and inspect CI/CD workflows
#[derive(Args, Debug)]
pub struct WorkflowCommand {
    #[command(subcommand)]
    pub command: WorkflowSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WorkflowSubcommand {
    /// Trigger a workflow by name
    Run(RunArgs),

    /// List recent runs
    #[command(visible_alias = "ls")]
    List,

    /// Show the status tree of a run
    Status(StatusArgs),

    /// Print the logs of a cube
    Logs(CubeArgs),

    /// Download the artifact of a cube
    Artifacts(ArtifactArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Workflow name from the CI configuration
    pub workflow: String,

    /// Branch, tag or SHA to run on (defaults to the default branch)
    #[arg(long, short = 'r')]
    pub revision: Option<String>,

    /// Branch, tag or SHA to read the workflow file from
    #[arg(long)]
    pub workflow_revision: Option<String>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Run slug
    pub run: String,
}

#[derive(Args, Debug)]
pub struct CubeArgs {
    /// Run slug
    pub run: String,

    /// Workflow slug
    pub workflow: String,

    /// Task slug
    pub task: String,

    /// Cube slug
    pub cube: String,
}

impl CubeArgs {
    fn path(&self) -> CubePath {
        CubePath::new(&self.run, &self.workflow, &self.task, &self.cube)
    }
}

#[derive(Args, Debug)]
pub struct ArtifactArgs {
    #[command(flatten)]
    pub cube: CubeArgs,

    /// Where to save the artifact (defaults to <run>-<workflow>-<task>-<cube>.artifact)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl TableRow for Run {
    fn headers() -> &'static [&'static str] {
        &["RUN", "STATUS", "WORKFLOWS", "CREATED", "UPDATED"]
    }

    fn row(&self, color: bool) -> Vec<String> {
        let workflows: Vec<&str> = self
            .workflow_runs
            .iter()
            .filter_map(|w| w.workflow_slug.as_deref())
            .collect();
        vec![
            self.slug.clone().or_else(|| self.id.clone()).unwrap_or_default(),
            format_status(self.status.as_deref().unwrap_or(""), color),
            workflows.join(", "),
            format_timestamp(self.created_at.as_deref()),
            format_timestamp(self.updated_at.as_deref()),
        ]
    }
}

impl TableOutput for Run {
    fn print_table(&self, color: bool) {
        let slug = self.slug.as_deref().or(self.id.as_deref()).unwrap_or("-");
        print_header(&format!("Run {}", slug));
        println!();
        print_field(
            "Status",
            &format_status(self.status.as_deref().unwrap_or("-"), color),
            color,
        );
        print_field("Created", &format_timestamp(self.created_at.as_deref()), color);
        print_field("Updated", &format_timestamp(self.updated_at.as_deref()), color);

        if self.workflow_runs.is_empty() {
            return;
        }
        println!();
        for line in run_tree(self, color) {
            println!("{}", line);
        }
    }
}

/// Indented workflow, task and cube lines with their statuses.
fn run_tree(run: &Run, color: bool) -> Vec<String> {
    let status = |s: &Option<String>| format_status(s.as_deref().unwrap_or("-"), color);
    let mut lines = Vec::new();
    for workflow in &run.workflow_runs {
        lines.push(format!(
            "{} [{}]",
            workflow.workflow_slug.as_deref().unwrap_or("?"),
            status(&workflow.status)
        ));
        for task in &workflow.task_runs {
            lines.push(format!(
                "  {} [{}]",
                task.task_slug.as_deref().unwrap_or("?"),
                status(&task.status)
            ));
            for cube in &task.cube_runs {
                lines.push(format!(
                    "    {} [{}]",
                    cube.cube_slug.as_deref().unwrap_or("?"),
                    status(&cube.status)
                ));
            }
        }
    }
    lines
}

impl WorkflowCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            WorkflowSubcommand::Run(args) => self.trigger(args, global).await,
            WorkflowSubcommand::List => self.list(global).await,
            WorkflowSubcommand::Status(args) => self.status(args, global).await,
            WorkflowSubcommand::Logs(args) => self.logs(args, global).await,
            WorkflowSubcommand::Artifacts(args) => self.artifacts(args, global).await,
        }
    }

    async fn trigger(&self, args: &RunArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let request = RunWorkflow {
            workflow_slug: args.workflow.clone(),
            revision: args.revision.clone(),
            workflow_revision: args.workflow_revision.clone(),
        };
        let triggered = session
            .client
            .run_workflow(&context.org, &context.repo, &request)
            .await?;

        if global.json {
            return write_json(&triggered);
        }

        let status = triggered.trigger_status.as_deref().unwrap_or("unknown");
        match status {
            "created" => println!(
                "{} Started workflow '{}' in {}",
                style("✓").green(),
                args.workflow,
                context
            ),
            _ => println!(
                "{} Workflow '{}' was not started: {}",
                style("!").yellow(),
                args.workflow,
                status
            ),
        }
        if let Some(flux) = triggered.flux_id.as_deref() {
            println!("  Flux ID: {}", flux);
        }
        Ok(())
    }

    async fn list(&self, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let page = session.client.list_runs(&context.org, &context.repo).await?;
        global.output().write_page(&page, "No workflow runs found.")
    }

    async fn status(&self, args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let run = session
            .client
            .get_run(&context.org, &context.repo, &args.run)
            .await?;
        global.output().write(&run)
    }

    async fn logs(&self, args: &CubeArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;

        let logs = session
            .client
            .get_logs(&context.org, &context.repo, &args.path())
            .await?;

        if global.json {
            return write_json(&serde_json::json!({ "logs": logs }));
        }
        if logs.is_empty() {
            global.output().write_info("No logs for this cube.");
        } else {
            print!("{}", logs);
            if !logs.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }

    async fn artifacts(&self, args: &ArtifactArgs, global: &GlobalOptions) -> Result<()> {
        let session = Session::open(global)?;
        let context = session.repo(global)?;
        let cube = args.cube.path();
        let target = args
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(cube.artifact_file_name()));

        let spinner = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
            spinner.set_style(spinner_style);
        }
        spinner.set_message(format!("Downloading artifact of run {}", cube.run));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let data = session
            .client
            .get_artifact(&context.org, &context.repo, &cube)
            .await;
        spinner.finish_and_clear();
        let data = data?;

        save_artifact(&target, &data)?;

        if global.json {
            let result = serde_json::json!({
                "success": true,
                "path": target.display().to_string(),
                "size": data.len(),
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!(
                "{} Saved artifact to {}",
                style("✓").green(),
                target.display()
            );
            println!("  Size: {}", format_size(data.len() as u64));
        }
        Ok(())
    }
}

/// Writes `data` to `path`, creating parent directories. Empty data is an
/// error and leaves nothing on disk.
fn save_artifact(path: &Path, data: &[u8]) -> Result<()> {
    if data.is_empty() {
        bail!("The artifact exists but is empty");
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, data)
        .with_context(|| format!("Failed to save the artifact to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::resources::{CubeRun, TaskRun, WorkflowRun};

    #[test]
    fn test_save_artifact_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/build.bin");
        save_artifact(&path, b"\x00\x01binary").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"\x00\x01binary");
    }

    #[test]
    fn test_empty_artifact_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.artifact");
        assert!(save_artifact(&path, b"").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_run_tree_lines() {
        let run = Run {
            workflow_runs: vec![WorkflowRun {
                workflow_slug: Some("build".to_string()),
                status: Some("running".to_string()),
                task_runs: vec![TaskRun {
                    task_slug: Some("compile".to_string()),
                    status: None,
                    cube_runs: vec![CubeRun {
                        cube_slug: Some("linux".to_string()),
                        status: Some("success".to_string()),
                    }],
                }],
            }],
            ..Default::default()
        };
        assert_eq!(
            run_tree(&run, false),
            vec![
                "build [running]".to_string(),
                "  compile [-]".to_string(),
                "    linux [success]".to_string(),
            ]
        );
    }
}
