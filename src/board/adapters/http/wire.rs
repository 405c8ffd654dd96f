//! Wire records and lenient decoding for REST responses.

use crate::board::domain::{
    Commit, ProjectId, Recommendation, Status, Task, TaskId, lenient_id,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Task record as returned by `/api/v1/tasks`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TaskRecord {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    project_id: Option<Value>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    due_date: Option<String>,
    #[serde(default)]
    progress: Option<f64>,
}

impl TaskRecord {
    /// Converts the record into a domain task, or `None` when it carries no
    /// usable identifier. A missing project falls back to `project_id`.
    pub(super) fn into_task(self, project_id: ProjectId) -> Option<Task> {
        let id = self.id.as_ref().and_then(lenient_id)?;
        let task_id = TaskId::new(id).ok()?;
        let owner = self
            .project_id
            .as_ref()
            .and_then(lenient_id)
            .and_then(|raw| ProjectId::new(raw).ok())
            .unwrap_or(project_id);
        let status = self
            .status
            .as_ref()
            .map_or(Status::Todo, Status::from_value);

        let mut task = Task::new(task_id, owner, self.title.unwrap_or_default()).with_status(status);
        if let Some(description) = self.description {
            task = task.with_description(description);
        }
        if let Some(due_date) = self.due_date {
            task = task.with_due_date(due_date);
        }
        if let Some(progress) = self.progress {
            task = task.with_progress(progress);
        }
        Some(task)
    }
}

/// Body of `PATCH /api/v1/tasks/{id}` for status changes.
#[derive(Debug, Serialize)]
pub(super) struct StatusPatch {
    pub(super) status: Status,
}

/// Returns the elements of a JSON array, or nothing for any other value.
fn array_items(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Decodes each array element independently, skipping elements that do not
/// decode.
pub(super) fn decode_list<T: DeserializeOwned>(value: Value, what: &'static str) -> Vec<T> {
    array_items(value)
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<T>(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(
                    target: "projectflow.http",
                    record = what,
                    error = %err,
                    "skipping undecodable record"
                );
                None
            }
        })
        .collect()
}

/// Decodes a task list, dropping records without a usable identifier.
pub(super) fn decode_tasks(value: Value, project_id: ProjectId) -> Vec<Task> {
    decode_list::<TaskRecord>(value, "task")
        .into_iter()
        .filter_map(|record| {
            let task = record.into_task(project_id);
            if task.is_none() {
                tracing::warn!(
                    target: "projectflow.http",
                    project_id = %project_id,
                    "dropping task record without a usable id"
                );
            }
            task
        })
        .collect()
}

/// Decodes a recommendation list.
pub(super) fn decode_recommendations(value: Value) -> Vec<Recommendation> {
    decode_list(value, "recommendation")
}

/// Decodes a commit list.
pub(super) fn decode_commits(value: Value) -> Vec<Commit> {
    decode_list(value, "commit")
}

/// Truncates a response body for inclusion in error messages.
pub(super) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_owned();
    }
    let mut preview: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().nth(BODY_PREVIEW_LIMIT).is_some() {
        preview.push_str("...");
    }
    preview
}
