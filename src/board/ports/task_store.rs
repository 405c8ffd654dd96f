//! Port for the remote task and project store.

use super::RemoteResult;
use crate::board::domain::{NewTask, Project, ProjectId, ProjectUpdate, Status, Task, TaskId};
use async_trait::async_trait;

/// Remote task store contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Lists the tasks of a project.
    ///
    /// # Errors
    ///
    /// Returns a [`super::RemoteError`] on transport or application failure.
    async fn list_tasks(&self, project_id: ProjectId) -> RemoteResult<Vec<Task>>;

    /// Creates a task. The store chooses the initial status.
    ///
    /// Returns the created task when the store echoes a usable record.
    ///
    /// # Errors
    ///
    /// Returns a [`super::RemoteError`] when the store rejects the task.
    async fn create_task(&self, task: &NewTask) -> RemoteResult<Option<Task>>;

    /// Sets the status of a task.
    ///
    /// # Errors
    ///
    /// Returns a [`super::RemoteError`] when the update is not applied.
    async fn update_status(&self, task_id: TaskId, status: Status) -> RemoteResult<()>;

    /// Fetches project metadata.
    ///
    /// # Errors
    ///
    /// Returns a [`super::RemoteError`] on transport or application failure.
    async fn get_project(&self, project_id: ProjectId) -> RemoteResult<Project>;

    /// Applies a partial project update and returns the updated project.
    ///
    /// # Errors
    ///
    /// Returns a [`super::RemoteError`] when the update is not applied.
    async fn update_project(
        &self,
        project_id: ProjectId,
        update: &ProjectUpdate,
    ) -> RemoteResult<Project>;
}
