//! Task status lifecycle.
//!
//! Statuses advance through the fixed cycle `TODO -> IN_PROGRESS -> DONE ->
//! TODO`. Anything the remote store reports outside that set is coerced to
//! [`Status::Todo`] so that unknown values never reach the services.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Task lifecycle status.
///
/// The derived ordering follows the lifecycle sequence.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Work has not started.
    #[default]
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is complete.
    Done,
}

impl Status {
    /// Statuses in lifecycle order.
    pub const LIFECYCLE: [Self; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Normalizes a raw status string.
    ///
    /// Returns the matching status for the three canonical values and
    /// [`Status::Todo`] for anything else, including `None`. Matching is
    /// exact: `"done"` is not a canonical value.
    #[must_use]
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("IN_PROGRESS") => Self::InProgress,
            Some("DONE") => Self::Done,
            _ => Self::Todo,
        }
    }

    /// Normalizes an arbitrary JSON value. Non-string values map to
    /// [`Status::Todo`].
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        Self::normalize(value.as_str())
    }

    /// Returns the status one step further along the lifecycle, wrapping
    /// from [`Status::Done`] back to [`Status::Todo`].
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done => Self::Todo,
        }
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Decodes an optional status field. Absent and falsy values (`null`, `""`,
/// `false`, `0`) mean "no status"; anything else is coerced like
/// [`Status`].
pub(crate) fn deserialize_optional_status<'de, D>(
    deserializer: D,
) -> Result<Option<Status>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| match &raw {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::Number(number) if number.as_u64() == Some(0) => None,
        _ => Some(Status::from_value(&raw)),
    }))
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
