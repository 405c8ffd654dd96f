//! In-memory integration tests for a full board session.

use super::helpers::{MemoryBoard, board, cached_status, project_id, remote, task_id};
use projectflow::board::{
    adapters::memory::InMemoryRemote,
    domain::{BulkResult, Recommendation, Status},
    services::{ErrorCategory, ImportOutcome},
};
use rstest::rstest;

async fn loaded(remote: &InMemoryRemote) -> MemoryBoard {
    let board = board(remote);
    board.load().await;
    board
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_builds_columns_and_summary(remote: InMemoryRemote) -> eyre::Result<()> {
    let board = loaded(&remote).await;
    let snapshot = board.snapshot();

    eyre::ensure!(snapshot.columns.todo.len() == 2, "two tasks to do");
    eyre::ensure!(snapshot.columns.in_progress.len() == 1, "one task in progress");
    eyre::ensure!(snapshot.columns.done.len() == 1, "one task done");
    eyre::ensure!(snapshot.summary.total == 2, "only differing suggestions count");
    eyre::ensure!(snapshot.commits.len() == 2, "both commits cached");
    eyre::ensure!(snapshot.errors.is_empty(), "clean load");

    let rec = board
        .recommendation(task_id(1)?)
        .ok_or_else(|| eyre::eyre!("task 1 has a recommendation"))?;
    assert_eq!(rec.confidence_percent(), "82%");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn apply_then_bulk_reconciles_every_suggestion(remote: InMemoryRemote) -> eyre::Result<()> {
    let board = loaded(&remote).await;
    let task = board
        .task(task_id(1)?)
        .ok_or_else(|| eyre::eyre!("task 1 is cached"))?;

    let applied = board.apply_suggestion(&task).await?;
    assert_eq!(applied.map(|task| task.status()), Some(Status::InProgress));

    // The evaluator now sees task 1 in progress.
    remote.set_recommendations(
        project_id(),
        vec![
            Recommendation::suggest(task_id(1)?, Status::InProgress)
                .with_current_status(Status::InProgress),
            Recommendation::suggest(task_id(2)?, Status::Done)
                .with_current_status(Status::InProgress),
        ],
    );
    board.refresh_recommendations().await?;

    let result = board.apply_all().await?;
    assert_eq!(result, BulkResult { success: 1, fail: 0 });
    assert_eq!(cached_status(&board, 1)?, Status::InProgress);
    assert_eq!(cached_status(&board, 2)?, Status::Done);
    assert_eq!(cached_status(&board, 3)?, Status::Todo);
    assert_eq!(board.bulk_result(), Some(result));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn imported_commit_appears_once_on_the_board(remote: InMemoryRemote) -> eyre::Result<()> {
    let board = loaded(&remote).await;
    let commit = board
        .commits()
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("a commit is cached"))?;

    let first = board.import_as_task(&commit).await?;
    let ImportOutcome::Created(Some(created)) = first else {
        eyre::bail!("expected the first import to create a task");
    };
    assert_eq!(created.title(), "[GitHub f00dbab] Cut release branch");
    assert_eq!(
        created.description(),
        Some(
            "https://git.example/release/commit/f00dbab\nauthor: Robin\ndate: 2024-06-01 09:15"
        )
    );
    eyre::ensure!(
        board.columns().todo.iter().any(|task| task.id() == created.id()),
        "imported task lands in TODO"
    );

    let second = board.import_as_task(&commit).await?;
    eyre::ensure!(
        matches!(second, ImportOutcome::AlreadyImported(ref task) if task.id() == created.id()),
        "re-import returns the existing task"
    );
    assert_eq!(remote.calls().create_task, 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn partial_outage_keeps_the_board_usable(remote: InMemoryRemote) -> eyre::Result<()> {
    remote.fail_recommendations(true);
    remote.fail_commits(true);
    let board = loaded(&remote).await;

    eyre::ensure!(board.tasks().len() == 4, "tasks load despite outages");
    eyre::ensure!(board.recommendations().is_empty(), "no stale suggestions");
    eyre::ensure!(board.error(ErrorCategory::Recommendations).is_some(), "recorded");
    eyre::ensure!(board.error(ErrorCategory::Commits).is_some(), "recorded");

    let task = board
        .task(task_id(3)?)
        .ok_or_else(|| eyre::eyre!("task 3 is cached"))?;
    let advanced = board.advance(&task).await?;
    assert_eq!(advanced.status(), Status::InProgress);

    let result = board.apply_all().await?;
    assert_eq!(result, BulkResult::default());
    Ok(())
}
