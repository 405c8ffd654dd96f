//! Load sequencing for a board.

use super::commits::CommitIngestion;
use super::recommendations::RecommendationStore;
use super::tasks::TaskBoard;
use crate::board::ports::{CommitFeed, RecommendationSource, TaskStore};
use mockable::Clock;
use std::sync::Arc;

/// What a load pass produced.
///
/// Each fetch is reported independently; one failing never hides the
/// others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Tasks loaded, or `None` if the project or task fetch failed.
    pub tasks: Option<usize>,
    /// Recommendations indexed after the refresh.
    pub recommendations: usize,
    /// Commits fetched, or `None` when the commit feed is disabled.
    pub commits: Option<usize>,
}

/// Sequences the project/task fetch before the recommendation and commit
/// fetches, which run concurrently.
pub struct LoadOrchestrator<S, A, F, C>
where
    S: TaskStore,
    A: RecommendationSource,
    F: CommitFeed,
    C: Clock + Send + Sync,
{
    tasks: Arc<TaskBoard<S>>,
    recommendations: Arc<RecommendationStore<A, C>>,
    commits: Option<Arc<CommitIngestion<S, A, F, C>>>,
}

impl<S, A, F, C> LoadOrchestrator<S, A, F, C>
where
    S: TaskStore,
    A: RecommendationSource,
    F: CommitFeed,
    C: Clock + Send + Sync,
{
    /// Creates the orchestrator. Pass `None` for `commits` to skip the
    /// commit feed.
    #[must_use]
    pub const fn new(
        tasks: Arc<TaskBoard<S>>,
        recommendations: Arc<RecommendationStore<A, C>>,
        commits: Option<Arc<CommitIngestion<S, A, F, C>>>,
    ) -> Self {
        Self {
            tasks,
            recommendations,
            commits,
        }
    }

    /// Loads the project and tasks, then recommendations and commits.
    ///
    /// Recommendations and commits are fetched even when the task fetch
    /// failed. Errors land in their own slots.
    pub async fn load(&self) -> LoadReport {
        let tasks = self.tasks.reload().await.ok();
        let commit_fetch = async {
            match &self.commits {
                Some(commits) => Some(commits.refresh().await.len()),
                None => None,
            }
        };
        let (index, commits) = tokio::join!(self.recommendations.refresh(), commit_fetch);

        let report = LoadReport {
            tasks,
            recommendations: index.len(),
            commits,
        };
        tracing::info!(
            target: "projectflow.board",
            project_id = %self.tasks.context().project_id(),
            tasks = ?report.tasks,
            recommendations = report.recommendations,
            commits = ?report.commits,
            "board loaded"
        );
        report
    }
}
