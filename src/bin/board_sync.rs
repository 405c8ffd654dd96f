//! Drives a task board from the command line.
//!
//! Usage:
//!
//! ```text
//! board_sync [--config <path>] <command>
//! ```
//!
//! Commands load the board first, then act on it. Results are reported
//! through `tracing` at `info`; set `RUST_LOG` or `PROJECTFLOW_LOG` to adjust
//! verbosity.

use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use projectflow::board::adapters::http::HttpBoardClient;
use projectflow::board::domain::{Status, Task, TaskId};
use projectflow::board::services::{Board, ImportOutcome};
use projectflow::config::BoardConfig;
use projectflow::telemetry;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

type HttpBoard = Board<HttpBoardClient, HttpBoardClient, HttpBoardClient, DefaultClock>;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reconcile a task board with AI recommendations")]
struct Cli {
    /// Configuration file (defaults to ./projectflow.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the board and report tasks, recommendations, and commits.
    Show,
    /// Move a task to the next lifecycle status.
    Advance {
        /// Task identifier.
        task_id: u64,
    },
    /// Apply the AI suggestion for one task.
    Apply {
        /// Task identifier.
        task_id: u64,
    },
    /// Apply every meaningful AI suggestion.
    ApplyAll,
    /// Import a recent commit as a task.
    Import {
        /// Commit SHA or unique prefix.
        sha: String,
    },
    /// Run the AI evaluation for one task.
    Evaluate {
        /// Task identifier.
        task_id: u64,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("task {0} is not on the board")]
    UnknownTask(TaskId),
    #[error("no recent commit matches '{0}'")]
    UnknownCommit(String),
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let cli = Cli::parse();
    let config = BoardConfig::load(cli.config.as_deref())?;
    telemetry::init_tracing(&config.logging)?;

    let client = Arc::new(HttpBoardClient::new(
        &config.api.base_url,
        config.api.timeout(),
        config.api.access_token.clone(),
    )?);
    let board = Board::new(
        config.context()?,
        config.features,
        config.settings(),
        Arc::clone(&client),
        Arc::clone(&client),
        client,
        Arc::new(DefaultClock),
    );

    let report = board.load().await;
    for (category, error) in board.snapshot().errors {
        warn!(?category, %error, "load incomplete");
    }
    info!(
        tasks = ?report.tasks,
        recommendations = report.recommendations,
        commits = ?report.commits,
        "board loaded"
    );

    run(&board, cli.command).await
}

async fn run(board: &HttpBoard, command: Command) -> Result<(), BoxError> {
    match command {
        Command::Show => {
            show(board);
            Ok(())
        }
        Command::Advance { task_id } => {
            let task = find_task(board, task_id)?;
            let updated = board.advance(&task).await?;
            info!(task_id = %updated.id(), status = %updated.status(), "task advanced");
            Ok(())
        }
        Command::Apply { task_id } => {
            let task = find_task(board, task_id)?;
            match board.apply_suggestion(&task).await? {
                Some(updated) => {
                    info!(task_id = %updated.id(), status = %updated.status(), "suggestion applied");
                }
                None => info!(task_id = %task.id(), "no actionable suggestion"),
            }
            Ok(())
        }
        Command::ApplyAll => {
            let result = board.apply_all().await?;
            info!(success = result.success, fail = result.fail, "bulk apply finished");
            Ok(())
        }
        Command::Import { sha } => {
            let commit = board
                .commits()
                .into_iter()
                .find(|commit| commit.sha.starts_with(sha.trim()))
                .ok_or_else(|| CliError::UnknownCommit(sha.clone()))?;
            match board.import_as_task(&commit).await? {
                ImportOutcome::Created(Some(task)) => {
                    info!(task_id = %task.id(), title = task.title(), "commit imported");
                }
                ImportOutcome::Created(None) => info!(sha = %commit.sha, "commit imported"),
                ImportOutcome::AlreadyImported(task) => {
                    info!(task_id = %task.id(), title = task.title(), "commit already imported");
                }
            }
            Ok(())
        }
        Command::Evaluate { task_id } => {
            let task = find_task(board, task_id)?;
            let evaluation = board.evaluate_task(&task).await?;
            info!(
                task_id = %task.id(),
                progress = ?evaluation.progress_percent(),
                evaluation = %evaluation.raw(),
                "task evaluated"
            );
            Ok(())
        }
    }
}

fn find_task(board: &HttpBoard, raw: u64) -> Result<Task, BoxError> {
    let task_id = TaskId::new(raw)?;
    board
        .task(task_id)
        .ok_or_else(|| CliError::UnknownTask(task_id).into())
}

fn show(board: &HttpBoard) {
    let snapshot = board.snapshot();
    if let Some(project) = &snapshot.project {
        info!(project_id = %project.id, name = ?project.name, "project");
    }
    for status in Status::LIFECYCLE {
        for task in snapshot.columns.column(status) {
            let suggestion = snapshot
                .recommendations
                .meaningful_for(task.id())
                .map(|rec| (rec.suggested_status, rec.confidence_percent()));
            info!(
                column = %status,
                task_id = %task.id(),
                title = task.title(),
                suggestion = ?suggestion,
                "task"
            );
        }
    }
    info!(
        total = snapshot.summary.total,
        by_status = ?snapshot.summary.by_status,
        "recommendation summary"
    );
    for commit in &snapshot.commits {
        info!(sha = %commit.short_sha(), summary = ?commit.summary_line(), "commit");
    }
}
