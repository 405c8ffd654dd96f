//! Board facade tests for manual task creation, project settings, and
//! single-task evaluation.

use super::support::{board, project_id, seeded_remote, task_id};
use crate::board::{
    adapters::memory::InMemoryRemote,
    domain::{BoardDomainError, TaskEvaluation},
    ports::RemoteError,
    services::{BoardError, ErrorCategory},
};
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn remote() -> InMemoryRemote {
    seeded_remote()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_reloads_board(remote: InMemoryRemote) {
    let board = board(&remote);
    board.load().await;
    let fetches = remote.calls().fetch_recommendations;

    let created = board
        .create_task("  Write changelog ", Some("   "))
        .await
        .expect("task is created")
        .expect("store returns the task");

    assert_eq!(created.title(), "Write changelog");
    assert_eq!(created.description(), None);
    assert_eq!(board.tasks().len(), 4);
    assert_eq!(remote.calls().fetch_recommendations, fetches + 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_title_is_rejected_locally(remote: InMemoryRemote) {
    let board = board(&remote);

    let err = board
        .create_task("   ", None)
        .await
        .expect_err("title is required");

    assert!(matches!(
        err,
        BoardError::Domain(BoardDomainError::EmptyTitle)
    ));
    assert_eq!(remote.calls().create_task, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_create_is_recorded(remote: InMemoryRemote) {
    remote.fail_create_task(true);
    let board = board(&remote);

    let err = board
        .create_task("Write changelog", None)
        .await
        .expect_err("store rejects the task");

    assert!(matches!(err, BoardError::CreateFailed(RemoteError::Rejected(_))));
    assert!(matches!(
        board.error(ErrorCategory::Mutation),
        Some(BoardError::CreateFailed(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn saving_repository_url_refreshes_commits(remote: InMemoryRemote) {
    let board = board(&remote);
    board.load().await;
    let fetches = remote.calls().fetch_commits;

    let project = board
        .save_repository_url(Some(" https://git.example/board "))
        .await
        .expect("project updates");

    assert_eq!(
        project.github_repo_url.as_deref(),
        Some("https://git.example/board")
    );
    assert_eq!(board.project(), Some(project));
    assert_eq!(remote.calls().fetch_commits, fetches + 1);

    let cleared = board
        .save_repository_url(Some("  "))
        .await
        .expect("project updates");
    assert_eq!(cleared.github_repo_url, None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_project_update_is_recorded(remote: InMemoryRemote) {
    remote.fail_project_update(true);
    let board = board(&remote);

    let err = board
        .save_repository_url(Some("https://git.example/board"))
        .await
        .expect_err("store rejects the update");

    assert!(matches!(err, BoardError::ProjectUpdateFailed(_)));
    assert!(board.error(ErrorCategory::Project).is_some());
    assert_eq!(remote.calls().fetch_commits, 0);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn evaluation_is_kept_until_the_next_attempt(remote: InMemoryRemote) {
    remote.set_evaluation(
        task_id(1),
        TaskEvaluation::new(json!({"progress": 0.5, "summary": "halfway"})),
    );
    let board = board(&remote);
    board.load().await;
    let task = board.task(task_id(1)).expect("task is cached");

    let evaluation = board.evaluate_task(&task).await.expect("evaluation runs");
    assert_eq!(evaluation.progress_percent(), Some(50));
    assert_eq!(
        board.evaluation().map(|(id, _)| id),
        Some(task_id(1))
    );

    remote.fail_evaluation(true);
    let err = board
        .evaluate_task(&task)
        .await
        .expect_err("evaluator fails");

    assert!(matches!(err, BoardError::EvaluationFailed { task_id: id, .. } if id == task_id(1)));
    assert!(board.evaluation().is_none());
    assert!(board.error(ErrorCategory::Evaluation).is_some());
    assert_eq!(board.context().project_id(), project_id());
}
