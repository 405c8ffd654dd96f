//! In-memory integration tests for cache consistency after mutations.

use super::helpers::{MemoryBoard, board, cached_status, project_id, remote, task_id};
use projectflow::board::{
    adapters::memory::InMemoryRemote,
    domain::{Status, TaskEvaluation},
    services::{BoardError, ErrorCategory},
};
use rstest::rstest;
use serde_json::json;
use std::sync::Arc;

async fn loaded(remote: &InMemoryRemote) -> MemoryBoard {
    let board = board(remote);
    board.load().await;
    board
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cache_matches_remote_after_each_outcome(remote: InMemoryRemote) -> eyre::Result<()> {
    let board = loaded(&remote).await;
    remote.fail_updates_for(task_id(3)?);

    let ok = board
        .task(task_id(1)?)
        .ok_or_else(|| eyre::eyre!("task 1 is cached"))?;
    board.set_status(&ok, Status::Done).await?;

    let failing = board
        .task(task_id(3)?)
        .ok_or_else(|| eyre::eyre!("task 3 is cached"))?;
    let err = board.set_status(&failing, Status::Done).await;
    eyre::ensure!(
        matches!(err, Err(BoardError::MutationFailed { .. })),
        "failing update surfaces"
    );

    for task in remote.tasks(project_id()) {
        assert_eq!(cached_status(&board, task.id().value())?, task.status());
    }
    eyre::ensure!(
        board.error(ErrorCategory::Mutation).is_some(),
        "failure stays visible"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_clicks_issue_one_remote_update(remote: InMemoryRemote) -> eyre::Result<()> {
    let board = Arc::new(loaded(&remote).await);
    let task = board
        .task(task_id(1)?)
        .ok_or_else(|| eyre::eyre!("task 1 is cached"))?;
    let gate = remote.pause_updates();

    let first = {
        let board = Arc::clone(&board);
        let task = task.clone();
        tokio::spawn(async move { board.advance(&task).await })
    };
    while remote.calls().update_status == 0 {
        tokio::task::yield_now().await;
    }
    let second = board.advance(&task).await;
    eyre::ensure!(
        matches!(second, Err(BoardError::TaskBusy(_))),
        "second click is rejected"
    );

    gate.notify_one();
    let advanced = first.await??;
    assert_eq!(advanced.status(), Status::InProgress);
    assert_eq!(remote.calls().update_status, 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repository_and_evaluation_round_trip(remote: InMemoryRemote) -> eyre::Result<()> {
    remote.set_evaluation(task_id(2)?, TaskEvaluation::new(json!({"progress": 0.9})));
    let board = loaded(&remote).await;

    let project = board.save_repository_url(None).await?;
    eyre::ensure!(project.github_repo_url.is_none(), "url cleared");
    eyre::ensure!(
        board.project().and_then(|project| project.github_repo_url).is_none(),
        "cached project replaced"
    );

    let task = board
        .task(task_id(2)?)
        .ok_or_else(|| eyre::eyre!("task 2 is cached"))?;
    let evaluation = board.evaluate_task(&task).await?;
    assert_eq!(evaluation.progress_percent(), Some(90));
    Ok(())
}
