//! Sequential application of every meaningful recommendation.

use super::errors::{BoardError, BoardResult};
use super::guard::{BusySet, SingleFlight};
use super::recommendations::RecommendationStore;
use super::tasks::TaskBoard;
use crate::board::{
    domain::{BulkResult, TaskId},
    ports::{RecommendationSource, TaskStore},
};
use mockable::Clock;
use std::sync::{Arc, Mutex, PoisonError};

/// Applies all meaningful recommendations one at a time.
///
/// Items are isolated: a failed update is counted and the run moves on.
/// Only one run may be active per board.
pub struct BulkApplyWorkflow<S, A, C>
where
    S: TaskStore,
    A: RecommendationSource,
    C: Clock + Send + Sync,
{
    tasks: Arc<TaskBoard<S>>,
    recommendations: Arc<RecommendationStore<A, C>>,
    busy: BusySet<TaskId>,
    flight: SingleFlight,
    last_result: Mutex<Option<BulkResult>>,
}

impl<S, A, C> BulkApplyWorkflow<S, A, C>
where
    S: TaskStore,
    A: RecommendationSource,
    C: Clock + Send + Sync,
{
    /// Creates the workflow over shared board state.
    #[must_use]
    pub const fn new(
        tasks: Arc<TaskBoard<S>>,
        recommendations: Arc<RecommendationStore<A, C>>,
        busy: BusySet<TaskId>,
        flight: SingleFlight,
    ) -> Self {
        Self {
            tasks,
            recommendations,
            busy,
            flight,
            last_result: Mutex::new(None),
        }
    }

    /// Applies every meaningful recommendation in index order.
    ///
    /// Each successful update patches the cached task immediately, so
    /// partial progress is visible while later items are still pending. A
    /// task with a single update in flight counts as a failure. After the
    /// loop the recommendations are refreshed exactly once. When nothing is
    /// meaningful the run returns `{0, 0}` without contacting the remote.
    ///
    /// The returned result replaces the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BulkInProgress`] if another run is active.
    /// Item failures are never errors; they are counted in the result.
    pub async fn apply_all(&self) -> BoardResult<BulkResult> {
        let Some(_flight) = self.flight.try_enter() else {
            return Err(BoardError::BulkInProgress);
        };

        let pending: Vec<_> = self
            .recommendations
            .index()
            .meaningful()
            .filter_map(|rec| rec.task_id.zip(rec.suggested_status))
            .collect();
        if pending.is_empty() {
            let result = BulkResult::default();
            self.store_result(Some(result));
            return Ok(result);
        }
        self.store_result(None);

        let mut result = BulkResult::default();
        for (task_id, status) in pending {
            let Some(_busy) = self.busy.try_acquire(task_id) else {
                tracing::warn!(
                    target: "projectflow.bulk",
                    task_id = %task_id,
                    "skipping task with an update in flight"
                );
                result.fail += 1;
                continue;
            };
            match self.tasks.store().update_status(task_id, status).await {
                Ok(()) => {
                    self.tasks.apply_status(task_id, status);
                    result.success += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        target: "projectflow.bulk",
                        task_id = %task_id,
                        status = %status,
                        error = %err,
                        "bulk item failed"
                    );
                    result.fail += 1;
                }
            }
        }

        self.store_result(Some(result));
        tracing::info!(
            target: "projectflow.bulk",
            success = result.success,
            fail = result.fail,
            "bulk apply finished"
        );
        self.recommendations.refresh_within_bulk().await;
        Ok(result)
    }

    fn store_result(&self, result: Option<BulkResult>) {
        *self
            .last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = result;
    }

    /// Returns the result of the last completed run.
    #[must_use]
    pub fn last_result(&self) -> Option<BulkResult> {
        *self
            .last_result
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns `true` while a run is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.flight.is_running()
    }
}
