//! Domain model for the task board.
//!
//! Every value here is pure: no remote calls, no shared state. Values
//! received from the remote store are normalized on the way in so that
//! unknown statuses or unusable identifiers never reach the services.

mod bulk;
mod commit;
mod context;
mod error;
mod ids;
mod project;
mod recommendation;
mod status;
mod task;

pub use bulk::BulkResult;
pub use commit::{Commit, format_commit_date, import_marker, short_sha};
pub use context::{BoardContext, BoardFeatures};
pub use error::BoardDomainError;
pub use ids::{ProjectId, TaskId, TeamId};
pub use project::{Project, ProjectUpdate, TaskEvaluation};
pub use recommendation::{
    Recommendation, RecommendationIndex, RecommendationSummary, is_meaningful, percent,
};
pub use status::Status;
pub use task::{BoardColumns, NewTask, Task};

pub(crate) use ids::{deserialize_optional_task_id, lenient_id};
pub(crate) use status::deserialize_optional_status;
