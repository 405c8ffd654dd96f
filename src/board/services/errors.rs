//! Service-level errors and the per-category last-error slots.

use crate::board::{
    domain::{BoardDomainError, TaskId},
    ports::RemoteError,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// What a failed read was fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    /// Project metadata and its task list.
    Tasks,
    /// AI recommendations.
    Recommendations,
    /// Repository commits.
    Commits,
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tasks => "tasks",
            Self::Recommendations => "recommendations",
            Self::Commits => "commits",
        })
    }
}

/// Optional board capability named in [`BoardError::FeatureDisabled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// Bulk recommendation apply.
    BulkApply,
    /// Commit feed and commit import.
    CommitImport,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BulkApply => "bulk apply",
            Self::CommitImport => "commit import",
        })
    }
}

/// Errors returned by board services.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// A read from the remote failed.
    #[error("failed to fetch {target}: {source}")]
    Fetch {
        /// What was being fetched.
        target: FetchTarget,
        /// Underlying remote failure.
        #[source]
        source: RemoteError,
    },

    /// A single status update failed; the local task is unchanged.
    #[error("failed to update task {task_id}: {source}")]
    MutationFailed {
        /// Task whose update failed.
        task_id: TaskId,
        /// Underlying remote failure.
        #[source]
        source: RemoteError,
    },

    /// Creating a task from a commit failed; no task was created.
    #[error("failed to import commit {sha}: {source}")]
    ImportFailed {
        /// Commit hash.
        sha: String,
        /// Underlying remote failure.
        #[source]
        source: RemoteError,
    },

    /// Creating a task by hand failed.
    #[error("failed to create task: {0}")]
    CreateFailed(#[source] RemoteError),

    /// Saving project settings failed.
    #[error("failed to update project: {0}")]
    ProjectUpdateFailed(#[source] RemoteError),

    /// Evaluating a single task failed.
    #[error("failed to evaluate task {task_id}: {source}")]
    EvaluationFailed {
        /// Evaluated task.
        task_id: TaskId,
        /// Underlying remote failure.
        #[source]
        source: RemoteError,
    },

    /// The task already has a status mutation in flight.
    #[error("task {0} already has an update in flight")]
    TaskBusy(TaskId),

    /// A bulk apply is running.
    #[error("a bulk apply is already running")]
    BulkInProgress,

    /// The commit is already being imported.
    #[error("commit {0} is already being imported")]
    ImportInProgress(String),

    /// The commit has no hash.
    #[error("commit has no sha")]
    MissingCommitSha,

    /// The requested capability is switched off for this board.
    #[error("{0} is disabled for this board")]
    FeatureDisabled(Feature),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
}

/// Result type for board service operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Category of user-visible error. Each category keeps only its latest
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCategory {
    /// Project and task loading.
    Tasks,
    /// Recommendation fetches.
    Recommendations,
    /// Commit fetches.
    Commits,
    /// Status changes and manual task creation.
    Mutation,
    /// Commit imports.
    Import,
    /// Project settings updates.
    Project,
    /// Single-task evaluations.
    Evaluation,
}

/// Latest error per category, shared by all services of one board.
///
/// Starting an attempt clears its category; a failure records into it. There
/// is no history.
#[derive(Debug, Clone, Default)]
pub struct ErrorSlots {
    slots: Arc<Mutex<HashMap<ErrorCategory, BoardError>>>,
}

impl ErrorSlots {
    /// Creates empty slots.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ErrorCategory, BoardError>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears a category.
    pub fn clear(&self, category: ErrorCategory) {
        self.lock().remove(&category);
    }

    /// Records the latest error for a category.
    pub fn record(&self, category: ErrorCategory, error: BoardError) {
        tracing::warn!(
            target: "projectflow.board",
            category = ?category,
            error = %error,
            "board operation failed"
        );
        self.lock().insert(category, error);
    }

    /// Returns the latest error for a category.
    #[must_use]
    pub fn get(&self, category: ErrorCategory) -> Option<BoardError> {
        self.lock().get(&category).cloned()
    }

    /// Returns every recorded error, ordered by category.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<ErrorCategory, BoardError> {
        self.lock()
            .iter()
            .map(|(category, error)| (*category, error.clone()))
            .collect()
    }
}
