use anyhow::{Context, Result, bail};
use projecthub_core::{JsonFileStore, Task, TaskStore};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

use crate::config::Config;
use crate::state::default_data_dir;

/// Reads tasks from a running ProjectHub API: `GET /api/tasks/project/:id`.
#[derive(Debug, Clone)]
pub struct HttpTaskStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTaskStore {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn project_url(&self, project_id: &str) -> String {
        format!("{}/api/tasks/project/{}", self.base_url, project_id)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &self.token {
            headers.insert("x-auth-token", HeaderValue::from_str(token)?);
        }
        Ok(headers)
    }
}

impl TaskStore for HttpTaskStore {
    async fn tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>> {
        if project_id.contains(['/', '?', '#']) {
            bail!("invalid project id: {project_id}");
        }
        let url = self.project_url(project_id);
        tracing::debug!(%url, "fetching project tasks");

        let resp = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("GET {url} returned {status}: {}", body.trim());
        }

        resp.json::<Vec<Task>>()
            .await
            .with_context(|| format!("decode tasks from {url}"))
    }
}

/// The store picked by config: remote API when `[api].base_url` is set, else local files.
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    Http(HttpTaskStore),
    File(JsonFileStore),
}

impl ConfiguredStore {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        if let Some(base) = cfg.api.base_url.as_deref().filter(|b| !b.trim().is_empty()) {
            return Ok(Self::Http(HttpTaskStore::new(base, cfg.api_token())));
        }
        let dir = match &cfg.store.data_dir {
            Some(d) => d.clone(),
            None => default_data_dir()?,
        };
        Ok(Self::File(JsonFileStore::new(dir)))
    }
}

impl TaskStore for ConfiguredStore {
    async fn tasks_for_project(&self, project_id: &str) -> Result<Vec<Task>> {
        match self {
            Self::Http(s) => s.tasks_for_project(project_id).await,
            Self::File(s) => s.tasks_for_project(project_id).await,
        }
    }
}
