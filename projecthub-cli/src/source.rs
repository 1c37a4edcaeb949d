use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::Args;
use projecthub_core::time::parse_instant;
use projecthub_core::{ReminderRequest, Task, resolve_tasks};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::task_store::ConfiguredStore;

/// Where the tasks come from. `--tasks` wins over `--project`.
#[derive(Args, Debug, Clone)]
pub struct TaskSourceArgs {
    /// Project id, resolved through the configured task store
    #[arg(long)]
    pub project: Option<String>,

    /// JSON file: a tasks array, or a {"projectId": .., "tasks": [..]} request body
    #[arg(long)]
    pub tasks: Option<PathBuf>,
}

impl TaskSourceArgs {
    pub fn to_request(&self) -> Result<ReminderRequest> {
        let mut request = match &self.tasks {
            Some(p) => read_request_file(p)?,
            None => ReminderRequest::default(),
        };
        if self.project.is_some() {
            request.project_id = self.project.clone();
        }
        Ok(request)
    }

    pub async fn load(&self, cfg: &Config) -> Result<Vec<Task>> {
        let store = ConfiguredStore::from_config(cfg)?;
        Ok(resolve_tasks(self.to_request()?, &store).await?)
    }
}

fn read_request_file(path: &Path) -> Result<ReminderRequest> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let v: Value = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    match v {
        Value::Array(_) => {
            let tasks: Vec<Task> = serde_json::from_value(v)
                .with_context(|| format!("parse tasks array in {}", path.display()))?;
            Ok(ReminderRequest::for_tasks(tasks))
        }
        Value::Object(_) => serde_json::from_value(v)
            .with_context(|| format!("parse request body in {}", path.display())),
        _ => bail!(
            "{}: expected a tasks array or a request object",
            path.display()
        ),
    }
}

/// `--now` override (RFC 3339 or "YYYY-MM-DD HH:MM" in the configured zone), else the clock.
pub fn resolve_now(raw: Option<&str>, cfg: &Config) -> Result<DateTime<Utc>> {
    match raw {
        Some(s) => {
            let opts = cfg.reminder_options()?;
            parse_instant(s, opts.timezone)
        }
        None => Ok(Utc::now()),
    }
}
