//! Aggregate outcome of a bulk recommendation apply.

use serde::{Deserialize, Serialize};

/// Success and failure counts from one bulk apply run.
///
/// A non-zero `fail` count is a partial failure, not an error: the run
/// itself always completes and reports both counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkResult {
    /// Recommendations applied successfully.
    pub success: usize,
    /// Recommendations whose status update failed.
    pub fail: usize,
}

impl BulkResult {
    /// Returns `true` when at least one item failed.
    #[must_use]
    pub const fn is_partial_failure(&self) -> bool {
        self.fail > 0
    }

    /// Returns the number of items attempted.
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.success + self.fail
    }
}
