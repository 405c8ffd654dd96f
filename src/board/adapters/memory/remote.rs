//! In-memory remote implementing every board port.
//!
//! Failure switches and pause gates let tests script the remote's behaviour:
//! failing individual task updates, holding a request in flight, or letting
//! an older recommendation response arrive after a newer one.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};
use tokio::sync::Notify;

use crate::board::{
    domain::{
        Commit, NewTask, Project, ProjectId, ProjectUpdate, Recommendation, Status, Task,
        TaskEvaluation, TaskId,
    },
    ports::{CommitFeed, RecommendationSource, RemoteError, RemoteResult, TaskStore},
};

/// Number of calls received per port operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `list_tasks` calls.
    pub list_tasks: usize,
    /// `create_task` calls.
    pub create_task: usize,
    /// `update_status` calls.
    pub update_status: usize,
    /// `get_project` calls.
    pub get_project: usize,
    /// `update_project` calls.
    pub update_project: usize,
    /// `fetch_recommendations` calls.
    pub fetch_recommendations: usize,
    /// `evaluate_task` calls.
    pub evaluate_task: usize,
    /// `fetch_commits` calls.
    pub fetch_commits: usize,
}

#[derive(Debug, Default)]
struct Failures {
    list_tasks: bool,
    create_task: bool,
    all_updates: bool,
    updates: HashSet<TaskId>,
    project_update: bool,
    recommendations: bool,
    evaluation: bool,
    commits: bool,
}

#[derive(Debug, Default)]
struct RemoteState {
    projects: HashMap<ProjectId, Project>,
    tasks: Vec<Task>,
    last_task_id: u64,
    recommendations: HashMap<ProjectId, Vec<Recommendation>>,
    evaluations: HashMap<TaskId, TaskEvaluation>,
    commits: HashMap<ProjectId, Vec<Commit>>,
    failures: Failures,
    update_gate: Option<Arc<Notify>>,
    recommendation_gate: Option<Arc<Notify>>,
    calls: CallCounts,
}

/// Thread-safe in-memory stand-in for the remote board API.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRemote {
    state: Arc<RwLock<RemoteState>>,
}

fn injected(operation: &str) -> RemoteError {
    RemoteError::Rejected(format!("injected {operation} failure"))
}

impl InMemoryRemote {
    /// Creates an empty remote.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, RemoteState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a project.
    pub fn insert_project(&self, project: Project) {
        self.write().projects.insert(project.id, project);
    }

    /// Stores a task as-is, keeping its identifier.
    pub fn insert_task(&self, task: Task) {
        let mut state = self.write();
        state.last_task_id = state.last_task_id.max(task.id().value());
        state.tasks.retain(|existing| existing.id() != task.id());
        state.tasks.push(task);
    }

    /// Replaces the recommendations served for a project.
    pub fn set_recommendations(&self, project_id: ProjectId, recommendations: Vec<Recommendation>) {
        self.write().recommendations.insert(project_id, recommendations);
    }

    /// Replaces the commits served for a project.
    pub fn set_commits(&self, project_id: ProjectId, commits: Vec<Commit>) {
        self.write().commits.insert(project_id, commits);
    }

    /// Sets the evaluation served for a task.
    pub fn set_evaluation(&self, task_id: TaskId, evaluation: TaskEvaluation) {
        self.write().evaluations.insert(task_id, evaluation);
    }

    /// Makes `list_tasks` fail.
    pub fn fail_list_tasks(&self, fail: bool) {
        self.write().failures.list_tasks = fail;
    }

    /// Makes `create_task` fail.
    pub fn fail_create_task(&self, fail: bool) {
        self.write().failures.create_task = fail;
    }

    /// Makes every `update_status` call fail.
    pub fn fail_all_updates(&self, fail: bool) {
        self.write().failures.all_updates = fail;
    }

    /// Makes `update_status` fail for one task.
    pub fn fail_updates_for(&self, task_id: TaskId) {
        self.write().failures.updates.insert(task_id);
    }

    /// Makes `update_project` fail.
    pub fn fail_project_update(&self, fail: bool) {
        self.write().failures.project_update = fail;
    }

    /// Makes `fetch_recommendations` fail.
    pub fn fail_recommendations(&self, fail: bool) {
        self.write().failures.recommendations = fail;
    }

    /// Makes `evaluate_task` fail.
    pub fn fail_evaluation(&self, fail: bool) {
        self.write().failures.evaluation = fail;
    }

    /// Makes `fetch_commits` fail.
    pub fn fail_commits(&self, fail: bool) {
        self.write().failures.commits = fail;
    }

    /// Holds subsequent `update_status` calls until the returned gate is
    /// notified once per held call.
    pub fn pause_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.write().update_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Stops holding new `update_status` calls. Calls already held keep
    /// waiting on their gate.
    pub fn resume_updates(&self) {
        self.write().update_gate = None;
    }

    /// Holds subsequent `fetch_recommendations` calls until the returned gate
    /// is notified. Each held call answers with the data present when it was
    /// received, not when it is released.
    pub fn pause_recommendations(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.write().recommendation_gate = Some(Arc::clone(&gate));
        gate
    }

    /// Stops holding new `fetch_recommendations` calls.
    pub fn resume_recommendations(&self) {
        self.write().recommendation_gate = None;
    }

    /// Returns the call counters.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.write().calls
    }

    /// Returns a stored task.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<Task> {
        self.write()
            .tasks
            .iter()
            .find(|task| task.id() == task_id)
            .cloned()
    }

    /// Returns the stored tasks of a project in creation order.
    #[must_use]
    pub fn tasks(&self, project_id: ProjectId) -> Vec<Task> {
        self.write()
            .tasks
            .iter()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl TaskStore for InMemoryRemote {
    async fn list_tasks(&self, project_id: ProjectId) -> RemoteResult<Vec<Task>> {
        let mut state = self.write();
        state.calls.list_tasks += 1;
        if state.failures.list_tasks {
            return Err(injected("list_tasks"));
        }
        Ok(state
            .tasks
            .iter()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, task: &NewTask) -> RemoteResult<Option<Task>> {
        let mut state = self.write();
        state.calls.create_task += 1;
        if state.failures.create_task {
            return Err(injected("create_task"));
        }
        state.last_task_id += 1;
        let id = TaskId::new(state.last_task_id)
            .map_err(|err| RemoteError::Rejected(err.to_string()))?;
        let mut created = Task::new(id, task.project_id(), task.title());
        if let Some(description) = task.description() {
            created = created.with_description(description);
        }
        state.tasks.push(created.clone());
        Ok(Some(created))
    }

    async fn update_status(&self, task_id: TaskId, status: Status) -> RemoteResult<()> {
        let gate = {
            let mut state = self.write();
            state.calls.update_status += 1;
            state.update_gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut state = self.write();
        if state.failures.all_updates || state.failures.updates.contains(&task_id) {
            return Err(injected("update_status"));
        }
        let slot = state
            .tasks
            .iter_mut()
            .find(|task| task.id() == task_id)
            .ok_or_else(|| RemoteError::NotFound(format!("task {task_id}")))?;
        *slot = slot.clone().with_status(status);
        Ok(())
    }

    async fn get_project(&self, project_id: ProjectId) -> RemoteResult<Project> {
        let mut state = self.write();
        state.calls.get_project += 1;
        state
            .projects
            .get(&project_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("project {project_id}")))
    }

    async fn update_project(
        &self,
        project_id: ProjectId,
        update: &ProjectUpdate,
    ) -> RemoteResult<Project> {
        let mut state = self.write();
        state.calls.update_project += 1;
        if state.failures.project_update {
            return Err(injected("update_project"));
        }
        let project = state
            .projects
            .get_mut(&project_id)
            .ok_or_else(|| RemoteError::NotFound(format!("project {project_id}")))?;
        project.github_repo_url.clone_from(&update.github_repo_url);
        Ok(project.clone())
    }
}

#[async_trait]
impl RecommendationSource for InMemoryRemote {
    async fn fetch_recommendations(
        &self,
        project_id: ProjectId,
    ) -> RemoteResult<Vec<Recommendation>> {
        let (response, gate) = {
            let mut state = self.write();
            state.calls.fetch_recommendations += 1;
            let response = if state.failures.recommendations {
                Err(injected("fetch_recommendations"))
            } else {
                Ok(state
                    .recommendations
                    .get(&project_id)
                    .cloned()
                    .unwrap_or_default())
            };
            (response, state.recommendation_gate.clone())
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        response
    }

    async fn evaluate_task(&self, task_id: TaskId, _limit: u32) -> RemoteResult<TaskEvaluation> {
        let mut state = self.write();
        state.calls.evaluate_task += 1;
        if state.failures.evaluation {
            return Err(injected("evaluate_task"));
        }
        state
            .evaluations
            .get(&task_id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("evaluation for task {task_id}")))
    }
}

#[async_trait]
impl CommitFeed for InMemoryRemote {
    async fn fetch_commits(&self, project_id: ProjectId, limit: u32) -> RemoteResult<Vec<Commit>> {
        let mut state = self.write();
        state.calls.fetch_commits += 1;
        if state.failures.commits {
            return Err(injected("fetch_commits"));
        }
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(state
            .commits
            .get(&project_id)
            .map(|commits| commits.iter().take(take).cloned().collect())
            .unwrap_or_default())
    }
}
