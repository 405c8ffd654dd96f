//! Per-task status mutations.

use super::errors::{BoardError, BoardResult, ErrorCategory, ErrorSlots};
use super::guard::{BusySet, SingleFlight};
use super::recommendations::RecommendationStore;
use super::tasks::TaskBoard;
use crate::board::{
    domain::{Status, Task, TaskId},
    ports::{RecommendationSource, TaskStore},
};
use mockable::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Serializes status changes per task and reconciles the local cache with
/// confirmed remote updates.
///
/// A task with an update in flight rejects further updates with
/// [`BoardError::TaskBusy`] until the first one finishes. Single updates are
/// also rejected while a bulk apply runs.
pub struct MutationCoordinator<S, A, C>
where
    S: TaskStore,
    A: RecommendationSource,
    C: Clock + Send + Sync,
{
    tasks: Arc<TaskBoard<S>>,
    recommendations: Arc<RecommendationStore<A, C>>,
    busy: BusySet<TaskId>,
    bulk: SingleFlight,
    errors: ErrorSlots,
    refresh_after_mutation: bool,
}

impl<S, A, C> MutationCoordinator<S, A, C>
where
    S: TaskStore,
    A: RecommendationSource,
    C: Clock + Send + Sync,
{
    /// Creates a coordinator over shared board state.
    #[must_use]
    pub const fn new(
        tasks: Arc<TaskBoard<S>>,
        recommendations: Arc<RecommendationStore<A, C>>,
        busy: BusySet<TaskId>,
        bulk: SingleFlight,
        errors: ErrorSlots,
        refresh_after_mutation: bool,
    ) -> Self {
        Self {
            tasks,
            recommendations,
            busy,
            bulk,
            errors,
            refresh_after_mutation,
        }
    }

    /// Sets a task's status remotely, then locally.
    ///
    /// The cached task changes only after the remote confirms. On success
    /// the recommendations are refreshed, since the task's current status
    /// no longer matches what the evaluator saw. The busy mark is released
    /// on every path.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BulkInProgress`] during a bulk apply,
    /// [`BoardError::TaskBusy`] when the task already has an update in
    /// flight, and [`BoardError::MutationFailed`] when the remote update
    /// fails.
    pub async fn set_status(&self, task: &Task, status: Status) -> BoardResult<Task> {
        if self.bulk.is_running() {
            return Err(BoardError::BulkInProgress);
        }
        let task_id = task.id();
        let Some(_busy) = self.busy.try_acquire(task_id) else {
            return Err(BoardError::TaskBusy(task_id));
        };
        self.errors.clear(ErrorCategory::Mutation);

        if let Err(source) = self.tasks.store().update_status(task_id, status).await {
            let error = BoardError::MutationFailed { task_id, source };
            self.errors.record(ErrorCategory::Mutation, error.clone());
            return Err(error);
        }

        let updated = self
            .tasks
            .apply_status(task_id, status)
            .unwrap_or_else(|| task.clone().with_status(status));
        tracing::info!(
            target: "projectflow.mutation",
            task_id = %task_id,
            from = %task.status(),
            to = %status,
            "task status updated"
        );

        if self.refresh_after_mutation {
            self.recommendations.refresh().await;
        }
        Ok(updated)
    }

    /// Advances a task one step along the status lifecycle.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_status`].
    pub async fn advance(&self, task: &Task) -> BoardResult<Task> {
        self.set_status(task, task.status().next()).await
    }

    /// Applies the task's meaningful recommendation, if it has one.
    ///
    /// Returns `Ok(None)` without contacting the remote when the task has no
    /// recommendation or the recommendation is not meaningful.
    ///
    /// # Errors
    ///
    /// Same as [`Self::set_status`].
    pub async fn apply_suggestion(&self, task: &Task) -> BoardResult<Option<Task>> {
        let Some(suggested) = self
            .recommendations
            .meaningful_for(task.id())
            .and_then(|rec| rec.suggested_status)
        else {
            return Ok(None);
        };
        self.set_status(task, suggested).await.map(Some)
    }

    /// Returns `true` when the task has an update in flight.
    #[must_use]
    pub fn is_busy(&self, task_id: TaskId) -> bool {
        self.busy.contains(&task_id)
    }

    /// Returns every task with an update in flight.
    #[must_use]
    pub fn busy_tasks(&self) -> BTreeSet<TaskId> {
        self.busy.snapshot()
    }
}
