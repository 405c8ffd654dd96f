//! `reqwest` client implementing the board ports.

use super::error::HttpClientError;
use super::wire::{self, StatusPatch, TaskRecord};
use crate::board::{
    domain::{
        Commit, NewTask, Project, ProjectId, ProjectUpdate, Recommendation, Status, Task,
        TaskEvaluation, TaskId,
    },
    ports::{CommitFeed, RecommendationSource, RemoteError, RemoteResult, TaskStore},
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// HTTP client for the board REST API.
#[derive(Clone)]
pub struct HttpBoardClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl HttpBoardClient {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::Build`] when the TLS backend or client
    /// configuration cannot be initialised.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        access_token: Option<String>,
    ) -> Result<Self, HttpClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HttpClientError::Build)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            access_token: access_token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder, url: &str) -> Result<Value, HttpClientError> {
        tracing::debug!(target: "projectflow.http", stage = "request", url = %url);
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| HttpClientError::request(err, url))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| HttpClientError::request(err, url))?;
        tracing::debug!(
            target: "projectflow.http",
            stage = "response",
            url = %url,
            status = %status,
            body_len = body.len()
        );

        if !status.is_success() {
            return Err(HttpClientError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
                body: wire::preview_body(&body),
            });
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str::<Value>(&body).map_err(|err| HttpClientError::Decode {
            url: url.to_owned(),
            message: format!("{err} | body={}", wire::preview_body(&body)),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, HttpClientError> {
        let url = self.url(path);
        let req = self.http.get(&url).query(query);
        self.send(req, &url).await
    }
}

#[async_trait]
impl TaskStore for HttpBoardClient {
    async fn list_tasks(&self, project_id: ProjectId) -> RemoteResult<Vec<Task>> {
        let value = self
            .get("/api/v1/tasks", &[("projectId", project_id.to_string())])
            .await?;
        Ok(wire::decode_tasks(value, project_id))
    }

    async fn create_task(&self, task: &NewTask) -> RemoteResult<Option<Task>> {
        let url = self.url("/api/v1/tasks");
        let value = self.send(self.http.post(&url).json(task), &url).await?;
        let created = serde_json::from_value::<TaskRecord>(value)
            .ok()
            .and_then(|record| record.into_task(task.project_id()));
        Ok(created)
    }

    async fn update_status(&self, task_id: TaskId, status: Status) -> RemoteResult<()> {
        let url = self.url(&format!("/api/v1/tasks/{task_id}"));
        let req = self.http.patch(&url).json(&StatusPatch { status });
        self.send(req, &url).await?;
        Ok(())
    }

    async fn get_project(&self, project_id: ProjectId) -> RemoteResult<Project> {
        let value = self
            .get(&format!("/api/v1/projects/{project_id}"), &[])
            .await?;
        serde_json::from_value(value).map_err(|err| RemoteError::Decode(err.to_string()))
    }

    async fn update_project(
        &self,
        project_id: ProjectId,
        update: &ProjectUpdate,
    ) -> RemoteResult<Project> {
        let url = self.url(&format!("/api/v1/projects/{project_id}"));
        let value = self.send(self.http.patch(&url).json(update), &url).await?;
        serde_json::from_value(value).map_err(|err| RemoteError::Decode(err.to_string()))
    }
}

#[async_trait]
impl RecommendationSource for HttpBoardClient {
    async fn fetch_recommendations(
        &self,
        project_id: ProjectId,
    ) -> RemoteResult<Vec<Recommendation>> {
        let value = self
            .get(
                "/api/v1/ai/task-recommendations",
                &[("projectId", project_id.to_string())],
            )
            .await?;
        Ok(wire::decode_recommendations(value))
    }

    async fn evaluate_task(&self, task_id: TaskId, limit: u32) -> RemoteResult<TaskEvaluation> {
        let url = self.url(&format!("/api/v1/tasks/{task_id}/ai-evaluate"));
        let req = self.http.post(&url).query(&[("limit", limit)]);
        let value = self.send(req, &url).await?;
        Ok(TaskEvaluation::new(value))
    }
}

#[async_trait]
impl CommitFeed for HttpBoardClient {
    async fn fetch_commits(&self, project_id: ProjectId, limit: u32) -> RemoteResult<Vec<Commit>> {
        let value = self
            .get(
                "/api/v1/github/commits",
                &[
                    ("projectId", project_id.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(wire::decode_commits(value))
    }
}
