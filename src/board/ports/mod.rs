//! Port contracts for the remote board collaborator.
//!
//! The remote store, the AI evaluator, and the commit feed are reached
//! through these traits only. Every call is a suspension point; nothing else
//! in the board suspends.

pub mod commit_feed;
pub mod error;
pub mod recommendation_source;
pub mod task_store;

pub use commit_feed::CommitFeed;
pub use error::{RemoteError, RemoteResult};
pub use recommendation_source::RecommendationSource;
pub use task_store::TaskStore;

#[cfg(test)]
pub use commit_feed::MockCommitFeed;
#[cfg(test)]
pub use recommendation_source::MockRecommendationSource;
#[cfg(test)]
pub use task_store::MockTaskStore;
