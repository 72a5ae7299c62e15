//
//  sourcecraft-cli
//  api/resources/cicd.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CI/CD runs, logs and artifacts.
//!
//! A run fans out into workflow runs, each workflow into task runs and each
//! task into cube runs. Logs and artifacts are addressed by the full
//! `run/workflow/task/cube` path, see [`CubePath`].

use serde::{Deserialize, Serialize};

use crate::api::client::SourceCraftClient;
use crate::api::common::{ApiError, Envelope, Page};

#[derive(Debug, Clone, Serialize)]
pub struct RunWorkflow {
    pub workflow_slug: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_revision: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunTriggered {
    #[serde(default)]
    pub flux_id: Option<String>,

    /// `created`, `already_exists` or `nothing_to_start`.
    #[serde(default)]
    pub trigger_status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Run {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub slug: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub created_at: Option<String>,

    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default)]
    pub workflow_runs: Vec<WorkflowRun>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowRun {
    #[serde(default)]
    pub workflow_slug: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub task_runs: Vec<TaskRun>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRun {
    #[serde(default)]
    pub task_slug: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub cube_runs: Vec<CubeRun>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CubeRun {
    #[serde(default)]
    pub cube_slug: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

/// Address of one cube inside a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubePath {
    pub run: String,
    pub workflow: String,
    pub task: String,
    pub cube: String,
}

impl CubePath {
    pub fn new(
        run: impl Into<String>,
        workflow: impl Into<String>,
        task: impl Into<String>,
        cube: impl Into<String>,
    ) -> Self {
        Self {
            run: run.into(),
            workflow: workflow.into(),
            task: task.into(),
            cube: cube.into(),
        }
    }

    fn segments(&self) -> String {
        format!("{}/{}/{}/{}", self.run, self.workflow, self.task, self.cube)
    }

    /// Default local file name for the cube's artifact.
    pub fn artifact_file_name(&self) -> String {
        format!(
            "{}-{}-{}-{}.artifact",
            self.run, self.workflow, self.task, self.cube
        )
    }
}

#[derive(Debug, Deserialize)]
struct RunList {
    #[serde(default)]
    runs: Vec<Run>,

    #[serde(default)]
    next_page_token: Option<String>,
}

impl Envelope for RunList {
    type Item = Run;

    fn into_page(self) -> Page<Run> {
        Page::new(self.runs, self.next_page_token)
    }
}

#[derive(Debug, Deserialize)]
struct LogsBody {
    #[serde(default)]
    logs: Option<String>,
}

/// Extracts the `logs` field, falling back to the raw body as text.
pub fn logs_from_body(body: &[u8]) -> String {
    match serde_json::from_slice::<LogsBody>(body) {
        Ok(parsed) => parsed.logs.unwrap_or_default(),
        Err(_) => String::from_utf8_lossy(body).into_owned(),
    }
}

impl SourceCraftClient {
    pub async fn run_workflow(
        &self,
        org: &str,
        repo: &str,
        request: &RunWorkflow,
    ) -> Result<RunTriggered, ApiError> {
        self.post_json(&format!("/{}/{}/cicd/runs", org, repo), request)
            .await
    }

    pub async fn list_runs(&self, org: &str, repo: &str) -> Result<Page<Run>, ApiError> {
        self.get_page::<RunList>(&format!("/{}/{}/cicd/runs", org, repo))
            .await
    }

    pub async fn get_run(&self, org: &str, repo: &str, run: &str) -> Result<Run, ApiError> {
        self.get_json(&format!("/{}/{}/cicd/runs/{}", org, repo, run))
            .await
            .map_err(|e| e.or_not_found(|| format!("run '{}' in '{}/{}'", run, org, repo)))
    }

    pub async fn get_logs(
        &self,
        org: &str,
        repo: &str,
        cube: &CubePath,
    ) -> Result<String, ApiError> {
        let path = format!("/{}/{}/cicd/logs/{}", org, repo, cube.segments());
        let body = self
            .execute::<()>(reqwest::Method::GET, &path, None)
            .await?;
        Ok(logs_from_body(&body))
    }

    /// Raw artifact bytes, whatever the content type.
    pub async fn get_artifact(
        &self,
        org: &str,
        repo: &str,
        cube: &CubePath,
    ) -> Result<Vec<u8>, ApiError> {
        self.download(&format!(
            "/{}/{}/cicd/artifacts/{}",
            org,
            repo,
            cube.segments()
        ))
        .await
    }
}
