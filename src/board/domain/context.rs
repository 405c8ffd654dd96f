//! Explicit session context and feature switches for a board.

use super::{ProjectId, TeamId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything a board needs to know about who is looking at which project.
///
/// Passed in explicitly; the board reads no ambient session state.
#[derive(Clone, PartialEq, Eq)]
pub struct BoardContext {
    project_id: ProjectId,
    team_id: Option<TeamId>,
    access_token: Option<String>,
}

impl BoardContext {
    /// Creates a context for a project.
    #[must_use]
    pub const fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            team_id: None,
            access_token: None,
        }
    }

    /// Sets the selected team.
    #[must_use]
    pub const fn with_team(mut self, team_id: TeamId) -> Self {
        self.team_id = Some(team_id);
        self
    }

    /// Sets the bearer token used by remote adapters. Blank tokens are
    /// ignored.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let value = token.into();
        self.access_token = (!value.trim().is_empty()).then_some(value);
        self
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the selected team, if any.
    #[must_use]
    pub const fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    /// Returns the bearer token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl fmt::Debug for BoardContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardContext")
            .field("project_id", &self.project_id)
            .field("team_id", &self.team_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Optional board capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardFeatures {
    /// Allow applying every meaningful recommendation in one run.
    pub bulk_apply: bool,
    /// Fetch commits and allow importing them as tasks.
    pub commit_import: bool,
    /// Skip imports whose marker already appears in a cached task title.
    pub dedupe_commit_imports: bool,
}

impl Default for BoardFeatures {
    fn default() -> Self {
        Self {
            bulk_apply: true,
            commit_import: true,
            dedupe_commit_imports: true,
        }
    }
}
