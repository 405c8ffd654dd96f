//! Shared fixtures for board unit tests.

use crate::board::{
    adapters::memory::InMemoryRemote,
    domain::{BoardContext, BoardFeatures, Project, ProjectId, Status, Task, TaskId},
    services::{Board, BoardSettings},
};
use mockable::DefaultClock;
use std::sync::Arc;

pub(super) type TestBoard = Board<InMemoryRemote, InMemoryRemote, InMemoryRemote, DefaultClock>;

pub(super) fn project_id() -> ProjectId {
    ProjectId::new(1).expect("valid project id")
}

pub(super) fn task_id(raw: u64) -> TaskId {
    TaskId::new(raw).expect("valid task id")
}

/// Remote holding project 1 with three tasks: 1 and 2 in `TODO`, 3 in
/// `IN_PROGRESS`.
pub(super) fn seeded_remote() -> InMemoryRemote {
    let remote = InMemoryRemote::new();
    remote.insert_project(Project {
        id: project_id(),
        name: Some("Board".to_owned()),
        description: None,
        github_repo_url: None,
    });
    remote.insert_task(Task::new(task_id(1), project_id(), "Write parser"));
    remote.insert_task(Task::new(task_id(2), project_id(), "Add tests"));
    remote.insert_task(
        Task::new(task_id(3), project_id(), "Ship release").with_status(Status::InProgress),
    );
    remote
}

pub(super) fn board_with(
    remote: &InMemoryRemote,
    features: BoardFeatures,
    settings: BoardSettings,
) -> TestBoard {
    let shared = Arc::new(remote.clone());
    Board::new(
        BoardContext::new(project_id()),
        features,
        settings,
        Arc::clone(&shared),
        Arc::clone(&shared),
        shared,
        Arc::new(DefaultClock),
    )
}

pub(super) fn board(remote: &InMemoryRemote) -> TestBoard {
    board_with(remote, BoardFeatures::default(), BoardSettings::default())
}

/// Waits until the remote has received `count` status updates.
pub(super) async fn wait_for_updates(remote: &InMemoryRemote, count: usize) {
    while remote.calls().update_status < count {
        tokio::task::yield_now().await;
    }
}

/// Waits until the remote has received `count` recommendation fetches.
pub(super) async fn wait_for_fetches(remote: &InMemoryRemote, count: usize) {
    while remote.calls().fetch_recommendations < count {
        tokio::task::yield_now().await;
    }
}
