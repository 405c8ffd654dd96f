//! Port for the source-control commit feed.

use super::RemoteResult;
use crate::board::domain::{Commit, ProjectId};
use async_trait::async_trait;

/// Remote commit feed contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommitFeed: Send + Sync {
    /// Fetches the most recent `limit` commits of the project's repository.
    ///
    /// # Errors
    ///
    /// Returns a [`super::RemoteError`] on transport or application failure,
    /// including when the project has no repository configured.
    async fn fetch_commits(&self, project_id: ProjectId, limit: u32) -> RemoteResult<Vec<Commit>>;
}
