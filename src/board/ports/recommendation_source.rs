//! Port for the remote AI evaluator.

use super::RemoteResult;
use crate::board::domain::{ProjectId, Recommendation, TaskEvaluation, TaskId};
use async_trait::async_trait;

/// Remote AI recommendation contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Fetches the current recommendations for every task in a project.
    ///
    /// # Errors
    ///
    /// Returns a [`super::RemoteError`] on transport or application failure.
    async fn fetch_recommendations(
        &self,
        project_id: ProjectId,
    ) -> RemoteResult<Vec<Recommendation>>;

    /// Evaluates a single task, considering at most `limit` commits.
    ///
    /// # Errors
    ///
    /// Returns a [`super::RemoteError`] on transport or application failure.
    async fn evaluate_task(&self, task_id: TaskId, limit: u32) -> RemoteResult<TaskEvaluation>;
}
