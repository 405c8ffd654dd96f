//! In-memory adapters for tests and offline runs.

mod remote;

pub use remote::{CallCounts, InMemoryRemote};
