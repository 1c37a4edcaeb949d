//! Task store seam: where a project id turns into a task list.
//!
//! Storage is a later layer; the engine only needs "tasks for project X".
//! `JsonFileStore` keeps one JSON array per project on disk.

use std::future::Future;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ReminderError;
use crate::task::Task;

pub trait TaskStore {
    fn tasks_for_project(&self, project_id: &str) -> impl Future<Output = Result<Vec<Task>>> + Send;
}

/// Either inline tasks or a project to look up. Inline tasks win when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderRequest {
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
}

impl ReminderRequest {
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            tasks: None,
        }
    }

    pub fn for_tasks(tasks: Vec<Task>) -> Self {
        Self {
            project_id: None,
            tasks: Some(tasks),
        }
    }
}

pub async fn resolve_tasks<S: TaskStore>(
    request: ReminderRequest,
    store: &S,
) -> Result<Vec<Task>, ReminderError> {
    if let Some(tasks) = request.tasks {
        return Ok(tasks);
    }

    let project_id = request
        .project_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(ReminderError::InvalidInput)?;

    let tasks = store
        .tasks_for_project(&project_id)
        .await
        .map_err(ReminderError::UpstreamFailure)?;
    tracing::debug!(project = %project_id, tasks = tasks.len(), "resolved project tasks");
    Ok(tasks)
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn project_path(&self, project_id: &str) -> PathBuf {
        self.root.join(format!("{project_id}.json"))
    }
}

impl TaskStore for JsonFileStore {
    async fn tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>> {
        if project_id.contains(['/', '\\']) || project_id.starts_with('.') {
            anyhow::bail!("invalid project id: {project_id}");
        }
        let p = self.project_path(project_id);
        let s = tokio::fs::read_to_string(&p)
            .await
            .with_context(|| format!("read {}", p.display()))?;
        serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
    }
}
