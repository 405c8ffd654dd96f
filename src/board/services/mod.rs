//! Application services for board reconciliation.
//!
//! [`Board`] is the entry point. The services it wires share the task cache,
//! the recommendation store, the per-task busy set, and the error slots.

mod board;
mod bulk;
mod commits;
mod errors;
mod guard;
mod mutation;
mod orchestrator;
mod recommendations;
mod tasks;

pub use board::{Board, BoardSettings, BoardSnapshot};
pub use bulk::BulkApplyWorkflow;
pub use commits::{CommitIngestion, ImportOutcome};
pub use errors::{BoardError, BoardResult, ErrorCategory, ErrorSlots, Feature, FetchTarget};
pub use guard::{BusyGuard, BusySet, FlightGuard, SingleFlight};
pub use mutation::MutationCoordinator;
pub use orchestrator::{LoadOrchestrator, LoadReport};
pub use recommendations::RecommendationStore;
pub use tasks::TaskBoard;
