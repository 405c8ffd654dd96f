//! Task records and board grouping.

use super::{BoardDomainError, ProjectId, Status, TaskId};
use serde::Serialize;

/// A task as cached from the remote store.
///
/// Status is the only field this crate ever writes; everything else is
/// read-through from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    status: Status,
    due_date: Option<String>,
    progress: Option<f64>,
}

impl Task {
    /// Creates a task in the default [`Status::Todo`] state.
    #[must_use]
    pub fn new(id: TaskId, project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id,
            project_id,
            title: title.into(),
            description: None,
            status: Status::default(),
            due_date: None,
            progress: None,
        }
    }

    /// Sets the task description. Blank descriptions are stored as absent.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let value = description.into();
        self.description = (!value.trim().is_empty()).then_some(value);
        self
    }

    /// Sets the task status.
    #[must_use]
    pub const fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Sets the display-only due date.
    #[must_use]
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = Some(due_date.into());
        self
    }

    /// Sets the display-only progress value.
    #[must_use]
    pub const fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the normalized task status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Returns the due date as reported by the store.
    #[must_use]
    pub fn due_date(&self) -> Option<&str> {
        self.due_date.as_deref()
    }

    /// Returns the progress value as reported by the store.
    #[must_use]
    pub const fn progress(&self) -> Option<f64> {
        self.progress
    }
}

/// Payload for creating a task in the remote store.
///
/// Status is deliberately absent: new tasks take the store's default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    project_id: ProjectId,
    title: String,
    description: Option<String>,
}

impl NewTask {
    /// Creates a task payload with a trimmed, required title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTitle`] if the title is blank.
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyTitle);
        }
        Ok(Self {
            project_id,
            title: trimmed.to_owned(),
            description: None,
        })
    }

    /// Sets the description, trimming it; blank descriptions are sent as
    /// absent.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let value = description.into();
        let trimmed = value.trim();
        self.description = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Tasks grouped into board columns by status.
///
/// Task order within each column follows the input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardColumns {
    /// Tasks in [`Status::Todo`].
    pub todo: Vec<Task>,
    /// Tasks in [`Status::InProgress`].
    pub in_progress: Vec<Task>,
    /// Tasks in [`Status::Done`].
    pub done: Vec<Task>,
}

impl BoardColumns {
    /// Groups tasks by status.
    #[must_use]
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut columns = Self::default();
        for task in tasks {
            let column = match task.status() {
                Status::Todo => &mut columns.todo,
                Status::InProgress => &mut columns.in_progress,
                Status::Done => &mut columns.done,
            };
            column.push(task.clone());
        }
        columns
    }

    /// Returns the column holding tasks with the given status.
    #[must_use]
    pub fn column(&self, status: Status) -> &[Task] {
        match status {
            Status::Todo => &self.todo,
            Status::InProgress => &self.in_progress,
            Status::Done => &self.done,
        }
    }

    /// Returns the total number of tasks across all columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when the board has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
