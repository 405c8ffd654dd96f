//! Project metadata and single-task AI evaluations.

use super::ProjectId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Project metadata as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project identifier.
    pub id: ProjectId,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Repository whose commits feed the board.
    #[serde(default)]
    pub github_repo_url: Option<String>,
}

/// Partial project update. Only the repository URL is writable here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    /// New repository URL; `None` clears it.
    pub github_repo_url: Option<String>,
}

impl ProjectUpdate {
    /// Builds an update from user input. Blank input clears the URL.
    #[must_use]
    pub fn repository_url(raw: Option<&str>) -> Self {
        Self {
            github_repo_url: raw
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_owned),
        }
    }
}

/// Opaque result of evaluating a single task with the AI service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskEvaluation(Value);

impl TaskEvaluation {
    /// Wraps a raw evaluation payload.
    #[must_use]
    pub const fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// Returns the raw payload.
    #[must_use]
    pub const fn raw(&self) -> &Value {
        &self.0
    }

    /// Returns the reported progress fraction when it is a finite number.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.0
            .get("progress")
            .and_then(Value::as_f64)
            .filter(|value| value.is_finite())
    }

    /// Returns progress as an integer percentage clamped to `[0, 100]`.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is rounded and clamped to [0, 100] before the cast"
    )]
    pub fn progress_percent(&self) -> Option<u8> {
        self.progress()
            .map(|fraction| (fraction * 100.0).round().clamp(0.0, 100.0) as u8)
    }
}
