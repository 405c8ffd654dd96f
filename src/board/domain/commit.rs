//! External commits and their conversion into board tasks.
//!
//! An imported commit's title starts with `[GitHub <short-sha>]`. The marker
//! is deterministic, so re-importing the same commit produces the same title
//! and duplicates can be detected by prefix.

use super::{BoardDomainError, NewTask, ProjectId};
use serde::{Deserialize, Serialize};

const SHORT_SHA_LEN: usize = 7;
const COMMIT_DATE_DISPLAY_LEN: usize = 16;
const NO_MESSAGE: &str = "(no message)";

/// A commit as reported by the source-control feed. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    /// Full commit hash.
    #[serde(default)]
    pub sha: String,
    /// Full commit message.
    #[serde(default)]
    pub message: Option<String>,
    /// Commit author display name.
    #[serde(default)]
    pub author_name: Option<String>,
    /// Commit timestamp as reported by the feed.
    #[serde(default)]
    pub date: Option<String>,
    /// Link to the commit on the hosting service.
    #[serde(default)]
    pub html_url: Option<String>,
}

impl Commit {
    /// Creates a commit with a hash and message.
    #[must_use]
    pub fn new(sha: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            sha: sha.into(),
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Sets the author name.
    #[must_use]
    pub fn with_author(mut self, author_name: impl Into<String>) -> Self {
        self.author_name = Some(author_name.into());
        self
    }

    /// Sets the commit timestamp.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Sets the commit URL.
    #[must_use]
    pub fn with_html_url(mut self, html_url: impl Into<String>) -> Self {
        self.html_url = Some(html_url.into());
        self
    }

    /// Returns the first seven characters of the hash.
    #[must_use]
    pub fn short_sha(&self) -> String {
        short_sha(&self.sha)
    }

    /// Returns the trimmed first line of the message, if any.
    #[must_use]
    pub fn summary_line(&self) -> Option<&str> {
        self.message
            .as_deref()
            .and_then(|message| message.split('\n').next())
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Returns the idempotency marker for this commit.
    #[must_use]
    pub fn import_marker(&self) -> String {
        import_marker(&self.sha)
    }

    /// Builds the task title: the import marker followed by the first
    /// message line, or `(no message)`.
    #[must_use]
    pub fn task_title(&self) -> String {
        format!(
            "{} {}",
            self.import_marker(),
            self.summary_line().unwrap_or(NO_MESSAGE)
        )
    }

    /// Builds the task description from the commit URL, author, and date.
    ///
    /// Only present, non-blank values contribute a line. Returns `None` when
    /// no line is present.
    #[must_use]
    pub fn task_description(&self) -> Option<String> {
        let lines: Vec<String> = [
            present(self.html_url.as_deref()).map(str::to_owned),
            present(self.author_name.as_deref()).map(|name| format!("author: {name}")),
            present(self.date.as_deref()).map(|date| format!("date: {}", format_commit_date(date))),
        ]
        .into_iter()
        .flatten()
        .collect();
        (!lines.is_empty()).then(|| lines.join("\n"))
    }

    /// Builds the creation payload for importing this commit into a project.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] only if the generated title
    /// is blank, which cannot happen for the marker format.
    pub fn to_new_task(&self, project_id: ProjectId) -> Result<NewTask, BoardDomainError> {
        let task = NewTask::new(project_id, self.task_title())?;
        Ok(match self.task_description() {
            Some(description) => task.with_description(description),
            None => task,
        })
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Returns the first seven characters of a commit hash, ignoring
/// surrounding whitespace.
#[must_use]
pub fn short_sha(sha: &str) -> String {
    sha.trim().chars().take(SHORT_SHA_LEN).collect()
}

/// Returns the `[GitHub <short-sha>]` marker for a commit hash.
#[must_use]
pub fn import_marker(sha: &str) -> String {
    format!("[GitHub {}]", short_sha(sha))
}

/// Formats a commit timestamp as `YYYY-MM-DD HH:MM` for display.
///
/// This is a lossy text transform rather than a parse: the first `T` becomes
/// a space, a trailing `Z` is dropped, and the result is cut to sixteen
/// characters. Malformed input passes through the same steps unchanged.
#[must_use]
pub fn format_commit_date(raw: &str) -> String {
    let spaced = raw.replacen('T', " ", 1);
    let unzoned = spaced.strip_suffix('Z').unwrap_or(&spaced);
    unzoned.chars().take(COMMIT_DATE_DISPLAY_LEN).collect()
}
