//! Read-through cache of the board's project and tasks.

use super::errors::{BoardError, BoardResult, ErrorCategory, ErrorSlots, FetchTarget};
use crate::board::{
    domain::{BoardColumns, BoardContext, Project, Status, Task, TaskId},
    ports::{RemoteError, TaskStore},
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct TaskCacheState {
    project: Option<Project>,
    tasks: Vec<Task>,
}

/// Local copy of the project and its tasks.
///
/// The cache only changes after the remote confirms: a reload replaces it,
/// and a confirmed status update patches a single task.
pub struct TaskBoard<S>
where
    S: TaskStore,
{
    store: Arc<S>,
    context: BoardContext,
    errors: ErrorSlots,
    state: RwLock<TaskCacheState>,
}

impl<S> TaskBoard<S>
where
    S: TaskStore,
{
    /// Creates an empty cache for the context's project.
    #[must_use]
    pub fn new(store: Arc<S>, context: BoardContext, errors: ErrorSlots) -> Self {
        Self {
            store,
            context,
            errors,
            state: RwLock::new(TaskCacheState::default()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, TaskCacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, TaskCacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the remote store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the board context.
    #[must_use]
    pub const fn context(&self) -> &BoardContext {
        &self.context
    }

    /// Fetches the project and then its tasks, replacing the cache.
    ///
    /// On failure the previous cache is kept and the error is recorded in
    /// the [`ErrorCategory::Tasks`] slot.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Fetch`] when either read fails.
    pub async fn reload(&self) -> BoardResult<usize> {
        self.errors.clear(ErrorCategory::Tasks);
        let project_id = self.context.project_id();
        let fetched = async {
            let project = self.store.get_project(project_id).await?;
            let tasks = self.store.list_tasks(project_id).await?;
            Ok::<_, RemoteError>((project, tasks))
        }
        .await;

        match fetched {
            Ok((project, tasks)) => {
                let count = tasks.len();
                let mut state = self.write();
                state.project = Some(project);
                state.tasks = tasks;
                tracing::debug!(
                    target: "projectflow.board",
                    project_id = %project_id,
                    tasks = count,
                    "task cache reloaded"
                );
                Ok(count)
            }
            Err(source) => {
                let error = BoardError::Fetch {
                    target: FetchTarget::Tasks,
                    source,
                };
                self.errors.record(ErrorCategory::Tasks, error.clone());
                Err(error)
            }
        }
    }

    /// Patches the cached status of a confirmed update.
    ///
    /// Returns the updated task, or `None` if the task is not cached.
    pub fn apply_status(&self, task_id: TaskId, status: Status) -> Option<Task> {
        let mut state = self.write();
        let slot = state.tasks.iter_mut().find(|task| task.id() == task_id)?;
        *slot = slot.clone().with_status(status);
        Some(slot.clone())
    }

    /// Replaces the cached project.
    pub fn set_project(&self, project: Project) {
        self.write().project = Some(project);
    }

    /// Returns the cached project.
    #[must_use]
    pub fn project(&self) -> Option<Project> {
        self.read().project.clone()
    }

    /// Returns the cached tasks in store order.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    /// Returns a cached task.
    #[must_use]
    pub fn find(&self, task_id: TaskId) -> Option<Task> {
        self.read()
            .tasks
            .iter()
            .find(|task| task.id() == task_id)
            .cloned()
    }

    /// Returns the first cached task whose title starts with `prefix`.
    #[must_use]
    pub fn find_by_title_prefix(&self, prefix: &str) -> Option<Task> {
        self.read()
            .tasks
            .iter()
            .find(|task| task.title().starts_with(prefix))
            .cloned()
    }

    /// Groups the cached tasks into board columns.
    #[must_use]
    pub fn columns(&self) -> BoardColumns {
        BoardColumns::from_tasks(&self.read().tasks)
    }
}
