//! Latest AI recommendation per task, refreshed wholesale.

use super::errors::{BoardError, ErrorCategory, ErrorSlots, FetchTarget};
use super::guard::SingleFlight;
use crate::board::{
    domain::{ProjectId, Recommendation, RecommendationIndex, RecommendationSummary, TaskId},
    ports::RecommendationSource,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

#[derive(Debug, Default)]
struct StoreState {
    index: RecommendationIndex,
    applied_seq: u64,
    fetched_at: Option<DateTime<Utc>>,
}

/// Keyed cache of the latest recommendation per task.
///
/// Every refresh takes a sequence number when it is issued. A response
/// older than the one already applied is discarded, so a slow request can
/// never overwrite fresher data. A failed refresh that is not stale empties
/// the store.
///
/// While a bulk apply runs, [`Self::refresh`] keeps the current index and
/// issues no request; only the bulk run's own refresh goes out.
pub struct RecommendationStore<A, C>
where
    A: RecommendationSource,
    C: Clock + Send + Sync,
{
    source: Arc<A>,
    clock: Arc<C>,
    project_id: ProjectId,
    errors: ErrorSlots,
    bulk: SingleFlight,
    next_seq: AtomicU64,
    state: RwLock<StoreState>,
}

impl<A, C> RecommendationStore<A, C>
where
    A: RecommendationSource,
    C: Clock + Send + Sync,
{
    /// Creates an empty store for a project. `bulk` is the board's bulk
    /// apply window.
    #[must_use]
    pub fn new(
        source: Arc<A>,
        clock: Arc<C>,
        project_id: ProjectId,
        errors: ErrorSlots,
        bulk: SingleFlight,
    ) -> Self {
        Self {
            source,
            clock,
            project_id,
            errors,
            bulk,
            next_seq: AtomicU64::new(0),
            state: RwLock::new(StoreState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the remote evaluator.
    #[must_use]
    pub fn source(&self) -> &Arc<A> {
        &self.source
    }

    /// Fetches all recommendations for the project and replaces the store.
    ///
    /// Never fails: a fetch error empties the store and is recorded in the
    /// [`ErrorCategory::Recommendations`] slot. Returns the index in effect
    /// afterwards, which is the previous one if this response was stale or
    /// a bulk apply is running.
    pub async fn refresh(&self) -> RecommendationIndex {
        if self.bulk.is_running() {
            tracing::debug!(
                target: "projectflow.recommendations",
                "bulk apply running; keeping current recommendations"
            );
            return self.index();
        }
        self.fetch_and_apply().await
    }

    /// Refreshes on behalf of the running bulk apply, inside its window.
    pub(crate) async fn refresh_within_bulk(&self) -> RecommendationIndex {
        self.fetch_and_apply().await
    }

    async fn fetch_and_apply(&self) -> RecommendationIndex {
        let seq = self.next_seq.fetch_add(1, Ordering::AcqRel) + 1;
        self.errors.clear(ErrorCategory::Recommendations);
        let response = self.source.fetch_recommendations(self.project_id).await;

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if seq < state.applied_seq {
            tracing::warn!(
                target: "projectflow.recommendations",
                seq,
                applied_seq = state.applied_seq,
                "discarding stale recommendation response"
            );
            return state.index.clone();
        }
        state.applied_seq = seq;

        match response {
            Ok(list) => {
                state.index = RecommendationIndex::from_list(list);
                state.fetched_at = Some(self.clock.utc());
                tracing::debug!(
                    target: "projectflow.recommendations",
                    seq,
                    indexed = state.index.len(),
                    meaningful = state.index.meaningful().count(),
                    "recommendations refreshed"
                );
            }
            Err(source) => {
                state.index = RecommendationIndex::default();
                state.fetched_at = None;
                self.errors.record(
                    ErrorCategory::Recommendations,
                    BoardError::Fetch {
                        target: FetchTarget::Recommendations,
                        source,
                    },
                );
            }
        }
        state.index.clone()
    }

    /// Returns a snapshot of the current index.
    #[must_use]
    pub fn index(&self) -> RecommendationIndex {
        self.read().index.clone()
    }

    /// Returns the recommendation for a task, meaningful or not.
    #[must_use]
    pub fn get(&self, task_id: TaskId) -> Option<Recommendation> {
        self.read().index.get(task_id).cloned()
    }

    /// Returns the recommendation for a task only when it is meaningful.
    #[must_use]
    pub fn meaningful_for(&self, task_id: TaskId) -> Option<Recommendation> {
        self.read().index.meaningful_for(task_id).cloned()
    }

    /// Summarizes meaningful recommendations.
    #[must_use]
    pub fn summary(&self) -> RecommendationSummary {
        self.read().index.summary()
    }

    /// Returns when the current index was fetched, if it came from a
    /// successful fetch.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.read().fetched_at
    }
}
