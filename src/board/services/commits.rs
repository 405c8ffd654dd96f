//! Commit feed and commit-to-task import.

use super::errors::{BoardError, BoardResult, ErrorCategory, ErrorSlots, FetchTarget};
use super::guard::BusySet;
use super::recommendations::RecommendationStore;
use super::tasks::TaskBoard;
use crate::board::{
    domain::{Commit, Task},
    ports::{CommitFeed, RecommendationSource, TaskStore},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Outcome of importing a commit.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// A new task was created. Holds the task when the store echoed it.
    Created(Option<Task>),
    /// A cached task already carries the commit's marker; nothing was
    /// created.
    AlreadyImported(Task),
}

/// Fetches commits and turns them into tasks.
///
/// Imports are tracked by commit hash: the same commit cannot be imported
/// twice concurrently, while different commits import independently.
pub struct CommitIngestion<S, A, F, C>
where
    S: TaskStore,
    A: RecommendationSource,
    F: CommitFeed,
    C: Clock + Send + Sync,
{
    feed: Arc<F>,
    tasks: Arc<TaskBoard<S>>,
    recommendations: Arc<RecommendationStore<A, C>>,
    errors: ErrorSlots,
    importing: BusySet<String>,
    limit: u32,
    dedupe: bool,
    commits: RwLock<Vec<Commit>>,
}

impl<S, A, F, C> CommitIngestion<S, A, F, C>
where
    S: TaskStore,
    A: RecommendationSource,
    F: CommitFeed,
    C: Clock + Send + Sync,
{
    /// Creates the pipeline. `limit` caps each commit fetch; `dedupe`
    /// enables the cached-title check before creating a task.
    #[must_use]
    pub fn new(
        feed: Arc<F>,
        tasks: Arc<TaskBoard<S>>,
        recommendations: Arc<RecommendationStore<A, C>>,
        errors: ErrorSlots,
        limit: u32,
        dedupe: bool,
    ) -> Self {
        Self {
            feed,
            tasks,
            recommendations,
            errors,
            importing: BusySet::new(),
            limit,
            dedupe,
            commits: RwLock::new(Vec::new()),
        }
    }

    /// Fetches the latest commits, replacing the cached list.
    ///
    /// Never fails: a fetch error empties the list and is recorded in the
    /// [`ErrorCategory::Commits`] slot.
    pub async fn refresh(&self) -> Vec<Commit> {
        self.errors.clear(ErrorCategory::Commits);
        let project_id = self.tasks.context().project_id();
        let fetched = match self.feed.fetch_commits(project_id, self.limit).await {
            Ok(commits) => commits,
            Err(source) => {
                self.errors.record(
                    ErrorCategory::Commits,
                    BoardError::Fetch {
                        target: FetchTarget::Commits,
                        source,
                    },
                );
                Vec::new()
            }
        };
        let mut commits = self.commits.write().unwrap_or_else(PoisonError::into_inner);
        commits.clone_from(&fetched);
        fetched
    }

    /// Returns the cached commits.
    #[must_use]
    pub fn commits(&self) -> Vec<Commit> {
        self.commits
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the hashes of commits being imported.
    #[must_use]
    pub fn importing(&self) -> BTreeSet<String> {
        self.importing.snapshot()
    }

    /// Creates a task from a commit.
    ///
    /// The title is `[GitHub <short-sha>] <first message line>` and the
    /// description lists the commit URL, author, and date. On success the
    /// task cache and the recommendations are reloaded so the new task shows
    /// up on the board and in the next evaluation. No retry is attempted on
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::MissingCommitSha`] for a commit without a hash,
    /// [`BoardError::ImportInProgress`] when the same commit is already being
    /// imported, and [`BoardError::ImportFailed`] when the store rejects the
    /// new task.
    pub async fn import_as_task(&self, commit: &Commit) -> BoardResult<ImportOutcome> {
        let sha = commit.sha.trim();
        if sha.is_empty() {
            return Err(BoardError::MissingCommitSha);
        }
        let Some(_importing) = self.importing.try_acquire(sha.to_owned()) else {
            return Err(BoardError::ImportInProgress(sha.to_owned()));
        };
        self.errors.clear(ErrorCategory::Import);

        if self.dedupe
            && let Some(existing) = self.tasks.find_by_title_prefix(&commit.import_marker())
        {
            tracing::info!(
                target: "projectflow.commits",
                sha,
                task_id = %existing.id(),
                "commit already imported"
            );
            return Ok(ImportOutcome::AlreadyImported(existing));
        }

        let draft = commit.to_new_task(self.tasks.context().project_id())?;
        let created = match self.tasks.store().create_task(&draft).await {
            Ok(created) => created,
            Err(source) => {
                let error = BoardError::ImportFailed {
                    sha: sha.to_owned(),
                    source,
                };
                self.errors.record(ErrorCategory::Import, error.clone());
                return Err(error);
            }
        };
        tracing::info!(
            target: "projectflow.commits",
            sha,
            title = draft.title(),
            "commit imported as task"
        );

        // Reload failures land in their own error slots.
        let _reloaded = self.tasks.reload().await;
        self.recommendations.refresh().await;
        Ok(ImportOutcome::Created(created))
    }
}
