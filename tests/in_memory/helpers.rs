//! Shared test helpers for in-memory board integration tests.

use mockable::DefaultClock;
use projectflow::board::{
    adapters::memory::InMemoryRemote,
    domain::{
        BoardContext, BoardFeatures, Commit, Project, ProjectId, Recommendation, Status, Task,
        TaskId,
    },
    services::{Board, BoardSettings},
};
use rstest::fixture;
use std::sync::Arc;

/// Board wired to the in-memory remote.
pub type MemoryBoard = Board<InMemoryRemote, InMemoryRemote, InMemoryRemote, DefaultClock>;

/// Project used by every fixture.
#[must_use]
pub fn project_id() -> ProjectId {
    ProjectId::new(10).expect("valid project id")
}

/// Builds a task identifier.
///
/// # Errors
///
/// Returns an error for zero.
pub fn task_id(raw: u64) -> eyre::Result<TaskId> {
    Ok(TaskId::new(raw)?)
}

/// Provides a remote with a project, four tasks, recommendations for three
/// of them, and two recent commits.
#[fixture]
pub fn remote() -> InMemoryRemote {
    let remote = InMemoryRemote::new();
    remote.insert_project(Project {
        id: project_id(),
        name: Some("Release train".to_owned()),
        description: Some("Q3 release".to_owned()),
        github_repo_url: Some("https://git.example/release".to_owned()),
    });
    let seeded = [
        (1, "Draft notes", Status::Todo),
        (2, "Cut branch", Status::InProgress),
        (3, "Tag release", Status::Todo),
        (4, "Announce", Status::Done),
    ];
    for (raw, title, status) in seeded {
        let id = TaskId::new(raw).expect("valid task id");
        remote.insert_task(Task::new(id, project_id(), title).with_status(status));
    }
    remote.set_recommendations(
        project_id(),
        vec![
            recommendation(1, Status::InProgress, Status::Todo, 0.82),
            recommendation(2, Status::Done, Status::InProgress, 0.64),
            recommendation(4, Status::Done, Status::Done, 0.99),
        ],
    );
    remote.set_commits(
        project_id(),
        vec![
            Commit::new("f00dbabe0000000000000000000000000000cafe", "Cut release branch\n\nrefs #2")
                .with_author("Robin")
                .with_date("2024-06-01T09:15:00Z")
                .with_html_url("https://git.example/release/commit/f00dbab"),
            Commit::new("0badc0de0000000000000000000000000000beef", "Fix typo in notes"),
        ],
    );
    remote
}

fn recommendation(raw: u64, suggested: Status, current: Status, confidence: f64) -> Recommendation {
    Recommendation::suggest(TaskId::new(raw).expect("valid task id"), suggested)
        .with_current_status(current)
        .with_confidence(confidence)
}

/// Builds a board over `remote` with default features and settings.
#[must_use]
pub fn board(remote: &InMemoryRemote) -> MemoryBoard {
    let shared = Arc::new(remote.clone());
    Board::new(
        BoardContext::new(project_id()).with_access_token("integration-token"),
        BoardFeatures::default(),
        BoardSettings::default(),
        Arc::clone(&shared),
        Arc::clone(&shared),
        shared,
        Arc::new(DefaultClock),
    )
}

/// Returns the cached status of a task.
///
/// # Errors
///
/// Returns an error when the task is not cached.
pub fn cached_status(board: &MemoryBoard, raw: u64) -> eyre::Result<Status> {
    board
        .task(task_id(raw)?)
        .map(|task| task.status())
        .ok_or_else(|| eyre::eyre!("task {raw} is not cached"))
}
