//! Facade wiring the board services around one project.

use super::bulk::BulkApplyWorkflow;
use super::commits::{CommitIngestion, ImportOutcome};
use super::errors::{BoardError, BoardResult, ErrorCategory, ErrorSlots, Feature};
use super::guard::{BusySet, SingleFlight};
use super::mutation::MutationCoordinator;
use super::orchestrator::{LoadOrchestrator, LoadReport};
use super::recommendations::RecommendationStore;
use super::tasks::TaskBoard;
use crate::board::{
    domain::{
        BoardColumns, BoardContext, BoardFeatures, BulkResult, Commit, NewTask, Project,
        ProjectUpdate, Recommendation, RecommendationIndex, RecommendationSummary, Status, Task,
        TaskEvaluation, TaskId,
    },
    ports::{CommitFeed, RecommendationSource, TaskStore},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Tunables for a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSettings {
    /// Maximum commits per commit fetch.
    pub commit_limit: u32,
    /// Maximum commits considered by a single-task evaluation.
    pub evaluation_limit: u32,
    /// Refresh recommendations after every confirmed single mutation.
    pub refresh_after_mutation: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            commit_limit: 20,
            evaluation_limit: 20,
            refresh_after_mutation: true,
        }
    }
}

/// Everything a presentation layer needs to render the board.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    /// Cached project metadata.
    pub project: Option<Project>,
    /// Cached tasks in store order.
    pub tasks: Vec<Task>,
    /// Cached tasks grouped by status.
    pub columns: BoardColumns,
    /// Tasks with an update in flight.
    pub busy: BTreeSet<TaskId>,
    /// Current recommendation index.
    pub recommendations: RecommendationIndex,
    /// Summary of meaningful recommendations.
    pub summary: RecommendationSummary,
    /// When the recommendation index was fetched.
    pub recommendations_fetched_at: Option<DateTime<Utc>>,
    /// Whether a bulk apply is running.
    pub bulk_running: bool,
    /// Result of the last bulk apply.
    pub bulk_result: Option<BulkResult>,
    /// Cached commits.
    pub commits: Vec<Commit>,
    /// Commits being imported.
    pub importing: BTreeSet<String>,
    /// Latest error per category.
    pub errors: BTreeMap<ErrorCategory, BoardError>,
}

/// A task board for one project.
///
/// Owns the task cache, the recommendation store, the busy set, and the
/// error slots, and routes every user action through the matching service.
pub struct Board<S, A, F, C>
where
    S: TaskStore,
    A: RecommendationSource,
    F: CommitFeed,
    C: Clock + Send + Sync,
{
    features: BoardFeatures,
    settings: BoardSettings,
    errors: ErrorSlots,
    tasks: Arc<TaskBoard<S>>,
    recommendations: Arc<RecommendationStore<A, C>>,
    mutations: MutationCoordinator<S, A, C>,
    bulk: BulkApplyWorkflow<S, A, C>,
    bulk_flight: SingleFlight,
    commits: Arc<CommitIngestion<S, A, F, C>>,
    orchestrator: LoadOrchestrator<S, A, F, C>,
    evaluation: Mutex<Option<(TaskId, TaskEvaluation)>>,
}

impl<S, A, F, C> Board<S, A, F, C>
where
    S: TaskStore,
    A: RecommendationSource,
    F: CommitFeed,
    C: Clock + Send + Sync,
{
    /// Wires a board for the context's project.
    #[must_use]
    pub fn new(
        context: BoardContext,
        features: BoardFeatures,
        settings: BoardSettings,
        store: Arc<S>,
        source: Arc<A>,
        feed: Arc<F>,
        clock: Arc<C>,
    ) -> Self {
        let errors = ErrorSlots::new();
        let busy = BusySet::new();
        let bulk_flight = SingleFlight::new();
        let project_id = context.project_id();

        let tasks = Arc::new(TaskBoard::new(store, context, errors.clone()));
        let recommendations = Arc::new(RecommendationStore::new(
            source,
            clock,
            project_id,
            errors.clone(),
            bulk_flight.clone(),
        ));
        let mutations = MutationCoordinator::new(
            Arc::clone(&tasks),
            Arc::clone(&recommendations),
            busy.clone(),
            bulk_flight.clone(),
            errors.clone(),
            settings.refresh_after_mutation,
        );
        let bulk = BulkApplyWorkflow::new(
            Arc::clone(&tasks),
            Arc::clone(&recommendations),
            busy,
            bulk_flight.clone(),
        );
        let commits = Arc::new(CommitIngestion::new(
            feed,
            Arc::clone(&tasks),
            Arc::clone(&recommendations),
            errors.clone(),
            settings.commit_limit,
            features.dedupe_commit_imports,
        ));
        let orchestrator = LoadOrchestrator::new(
            Arc::clone(&tasks),
            Arc::clone(&recommendations),
            features.commit_import.then(|| Arc::clone(&commits)),
        );

        Self {
            features,
            settings,
            errors,
            tasks,
            recommendations,
            mutations,
            bulk,
            bulk_flight,
            commits,
            orchestrator,
            evaluation: Mutex::new(None),
        }
    }

    fn evaluation_slot(&self) -> MutexGuard<'_, Option<(TaskId, TaskEvaluation)>> {
        self.evaluation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Loads the project and tasks, then recommendations and commits.
    pub async fn load(&self) -> LoadReport {
        self.orchestrator.load().await
    }

    /// Re-runs the full load.
    pub async fn refresh(&self) -> LoadReport {
        self.load().await
    }

    /// Refreshes recommendations on user request.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::BulkInProgress`] while a bulk apply runs.
    pub async fn refresh_recommendations(&self) -> BoardResult<RecommendationIndex> {
        if self.bulk_flight.is_running() {
            return Err(BoardError::BulkInProgress);
        }
        Ok(self.recommendations.refresh().await)
    }

    /// Refreshes the commit list.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::FeatureDisabled`] when commit import is off.
    pub async fn refresh_commits(&self) -> BoardResult<Vec<Commit>> {
        Self::require(self.features.commit_import, Feature::CommitImport)?;
        Ok(self.commits.refresh().await)
    }

    /// Sets a task's status. See [`MutationCoordinator::set_status`].
    ///
    /// # Errors
    ///
    /// Returns the coordinator's errors.
    pub async fn set_status(&self, task: &Task, status: Status) -> BoardResult<Task> {
        self.mutations.set_status(task, status).await
    }

    /// Advances a task along the lifecycle.
    ///
    /// # Errors
    ///
    /// Returns the coordinator's errors.
    pub async fn advance(&self, task: &Task) -> BoardResult<Task> {
        self.mutations.advance(task).await
    }

    /// Applies a task's meaningful recommendation, if any.
    ///
    /// # Errors
    ///
    /// Returns the coordinator's errors.
    pub async fn apply_suggestion(&self, task: &Task) -> BoardResult<Option<Task>> {
        self.mutations.apply_suggestion(task).await
    }

    /// Applies every meaningful recommendation.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::FeatureDisabled`] when bulk apply is off and
    /// [`BoardError::BulkInProgress`] when a run is already active.
    pub async fn apply_all(&self) -> BoardResult<BulkResult> {
        Self::require(self.features.bulk_apply, Feature::BulkApply)?;
        self.bulk.apply_all().await
    }

    /// Imports a commit as a task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::FeatureDisabled`] when commit import is off, or
    /// the pipeline's errors.
    pub async fn import_as_task(&self, commit: &Commit) -> BoardResult<ImportOutcome> {
        Self::require(self.features.commit_import, Feature::CommitImport)?;
        self.commits.import_as_task(commit).await
    }

    /// Creates a task by hand, then reloads tasks and recommendations.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] for a blank title and
    /// [`BoardError::CreateFailed`] when the store rejects the task.
    pub async fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> BoardResult<Option<Task>> {
        self.errors.clear(ErrorCategory::Mutation);
        let draft = match NewTask::new(self.tasks.context().project_id(), title) {
            Ok(draft) => match description {
                Some(text) => draft.with_description(text),
                None => draft,
            },
            Err(err) => {
                let error = BoardError::from(err);
                self.errors.record(ErrorCategory::Mutation, error.clone());
                return Err(error);
            }
        };

        let created = match self.tasks.store().create_task(&draft).await {
            Ok(created) => created,
            Err(source) => {
                let error = BoardError::CreateFailed(source);
                self.errors.record(ErrorCategory::Mutation, error.clone());
                return Err(error);
            }
        };
        tracing::info!(target: "projectflow.board", title = draft.title(), "task created");

        // Reload failures land in their own error slots.
        let _reloaded = self.tasks.reload().await;
        self.recommendations.refresh().await;
        Ok(created)
    }

    /// Saves the project's repository URL and refreshes commits. Blank input
    /// clears the URL.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ProjectUpdateFailed`] when the store rejects the
    /// update.
    pub async fn save_repository_url(&self, url: Option<&str>) -> BoardResult<Project> {
        self.errors.clear(ErrorCategory::Project);
        let update = ProjectUpdate::repository_url(url);
        let project_id = self.tasks.context().project_id();
        let project = match self.tasks.store().update_project(project_id, &update).await {
            Ok(project) => project,
            Err(source) => {
                let error = BoardError::ProjectUpdateFailed(source);
                self.errors.record(ErrorCategory::Project, error.clone());
                return Err(error);
            }
        };
        self.tasks.set_project(project.clone());
        if self.features.commit_import {
            self.commits.refresh().await;
        }
        Ok(project)
    }

    /// Runs the single-task AI evaluation and keeps its result.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::EvaluationFailed`] when the evaluator fails; the
    /// previous evaluation is discarded either way.
    pub async fn evaluate_task(&self, task: &Task) -> BoardResult<TaskEvaluation> {
        self.errors.clear(ErrorCategory::Evaluation);
        *self.evaluation_slot() = None;
        let task_id = task.id();
        match self
            .recommendations
            .source()
            .evaluate_task(task_id, self.settings.evaluation_limit)
            .await
        {
            Ok(evaluation) => {
                *self.evaluation_slot() = Some((task_id, evaluation.clone()));
                Ok(evaluation)
            }
            Err(source) => {
                let error = BoardError::EvaluationFailed { task_id, source };
                self.errors.record(ErrorCategory::Evaluation, error.clone());
                Err(error)
            }
        }
    }

    const fn require(enabled: bool, feature: Feature) -> BoardResult<()> {
        if enabled {
            Ok(())
        } else {
            Err(BoardError::FeatureDisabled(feature))
        }
    }

    /// Returns the enabled features.
    #[must_use]
    pub const fn features(&self) -> BoardFeatures {
        self.features
    }

    /// Returns the board context.
    #[must_use]
    pub fn context(&self) -> &BoardContext {
        self.tasks.context()
    }

    /// Returns the cached tasks.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.tasks()
    }

    /// Returns a cached task.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<Task> {
        self.tasks.find(task_id)
    }

    /// Returns the cached tasks grouped by status.
    #[must_use]
    pub fn columns(&self) -> BoardColumns {
        self.tasks.columns()
    }

    /// Returns the cached project.
    #[must_use]
    pub fn project(&self) -> Option<Project> {
        self.tasks.project()
    }

    /// Returns the current recommendation index.
    #[must_use]
    pub fn recommendations(&self) -> RecommendationIndex {
        self.recommendations.index()
    }

    /// Returns the recommendation for a task.
    #[must_use]
    pub fn recommendation(&self, task_id: TaskId) -> Option<Recommendation> {
        self.recommendations.get(task_id)
    }

    /// Summarizes meaningful recommendations.
    #[must_use]
    pub fn summary(&self) -> RecommendationSummary {
        self.recommendations.summary()
    }

    /// Returns `true` when the task has an update in flight.
    #[must_use]
    pub fn is_busy(&self, task_id: TaskId) -> bool {
        self.mutations.is_busy(task_id)
    }

    /// Returns the result of the last bulk apply.
    #[must_use]
    pub fn bulk_result(&self) -> Option<BulkResult> {
        self.bulk.last_result()
    }

    /// Returns `true` while a bulk apply runs.
    #[must_use]
    pub fn is_bulk_running(&self) -> bool {
        self.bulk.is_running()
    }

    /// Returns the cached commits.
    #[must_use]
    pub fn commits(&self) -> Vec<Commit> {
        self.commits.commits()
    }

    /// Returns the latest error of a category.
    #[must_use]
    pub fn error(&self, category: ErrorCategory) -> Option<BoardError> {
        self.errors.get(category)
    }

    /// Returns the last successful evaluation and the task it belongs to.
    #[must_use]
    pub fn evaluation(&self) -> Option<(TaskId, TaskEvaluation)> {
        self.evaluation_slot().clone()
    }

    /// Captures the whole board state.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            project: self.tasks.project(),
            tasks: self.tasks.tasks(),
            columns: self.tasks.columns(),
            busy: self.mutations.busy_tasks(),
            recommendations: self.recommendations.index(),
            summary: self.recommendations.summary(),
            recommendations_fetched_at: self.recommendations.fetched_at(),
            bulk_running: self.bulk.is_running(),
            bulk_result: self.bulk.last_result(),
            commits: self.commits.commits(),
            importing: self.commits.importing(),
            errors: self.errors.snapshot(),
        }
    }
}
