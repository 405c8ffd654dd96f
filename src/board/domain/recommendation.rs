//! AI status recommendations and their per-task index.

use super::{Status, TaskId, deserialize_optional_status, deserialize_optional_task_id};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// An AI-suggested status for one task, with supporting evidence.
///
/// Recommendations are ephemeral: every fetch replaces the whole set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Task the recommendation targets. Unusable identifiers decode as
    /// `None` and are dropped when indexing.
    #[serde(default, deserialize_with = "deserialize_optional_task_id")]
    pub task_id: Option<TaskId>,
    /// Status the evaluator suggests.
    #[serde(default, deserialize_with = "deserialize_optional_status")]
    pub suggested_status: Option<Status>,
    /// Status the evaluator saw when producing the suggestion.
    #[serde(default, deserialize_with = "deserialize_optional_status")]
    pub current_status: Option<Status>,
    /// Evaluator confidence, nominally in `[0, 1]`.
    #[serde(default, deserialize_with = "deserialize_confidence")]
    pub confidence: Option<f64>,
    /// Ordered reasons for the suggestion.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub reasons: Vec<String>,
    /// Ordered evidence lines, such as commit messages.
    #[serde(default, deserialize_with = "deserialize_string_list")]
    pub evidence: Vec<String>,
}

impl Recommendation {
    /// Creates a recommendation for a task with a suggested status.
    #[must_use]
    pub fn suggest(task_id: TaskId, suggested_status: Status) -> Self {
        Self {
            task_id: Some(task_id),
            suggested_status: Some(suggested_status),
            ..Self::default()
        }
    }

    /// Sets the status the evaluator observed.
    #[must_use]
    pub const fn with_current_status(mut self, status: Status) -> Self {
        self.current_status = Some(status);
        self
    }

    /// Sets the evaluator confidence.
    #[must_use]
    pub const fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Returns `true` when a suggested status is present and differs from
    /// the observed current status.
    #[must_use]
    pub fn is_meaningful(&self) -> bool {
        self.suggested_status
            .is_some_and(|suggested| Some(suggested) != self.current_status)
    }

    /// Returns the confidence formatted as a percentage, or an empty string
    /// when no finite confidence is available.
    #[must_use]
    pub fn confidence_percent(&self) -> String {
        percent(self.confidence)
    }
}

/// Returns `true` when `rec` is present and meaningful.
#[must_use]
pub fn is_meaningful(rec: Option<&Recommendation>) -> bool {
    rec.is_some_and(Recommendation::is_meaningful)
}

/// Formats a confidence in `[0, 1]` as a rounded integer percentage.
///
/// Returns an empty string for absent or non-finite values so callers never
/// render `NaN%`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_possible_truncation,
    reason = "display rounding of a finite confidence; `as` saturates out-of-range values"
)]
pub fn percent(confidence: Option<f64>) -> String {
    match confidence {
        Some(value) if value.is_finite() => format!("{}%", (value * 100.0).round() as i64),
        _ => String::new(),
    }
}

/// Latest recommendation per task, in first-seen order.
///
/// When a fetch reports the same task twice, the later entry wins but keeps
/// the position of the first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationIndex {
    entries: Vec<Recommendation>,
    positions: HashMap<TaskId, usize>,
}

impl RecommendationIndex {
    /// Builds the index, dropping entries without a task identifier.
    #[must_use]
    pub fn from_list(list: impl IntoIterator<Item = Recommendation>) -> Self {
        let mut index = Self::default();
        for rec in list {
            let Some(task_id) = rec.task_id else {
                continue;
            };
            match index.positions.get(&task_id) {
                Some(&position) => {
                    if let Some(slot) = index.entries.get_mut(position) {
                        *slot = rec;
                    }
                }
                None => {
                    index.positions.insert(task_id, index.entries.len());
                    index.entries.push(rec);
                }
            }
        }
        index
    }

    /// Returns the recommendation for a task, meaningful or not.
    #[must_use]
    pub fn get(&self, task_id: TaskId) -> Option<&Recommendation> {
        self.positions
            .get(&task_id)
            .and_then(|position| self.entries.get(*position))
    }

    /// Returns the recommendation for a task only when it is meaningful.
    #[must_use]
    pub fn meaningful_for(&self, task_id: TaskId) -> Option<&Recommendation> {
        self.get(task_id).filter(|rec| rec.is_meaningful())
    }

    /// Iterates all recommendations in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> {
        self.entries.iter()
    }

    /// Iterates meaningful recommendations in index order.
    pub fn meaningful(&self) -> impl Iterator<Item = &Recommendation> {
        self.entries.iter().filter(|rec| rec.is_meaningful())
    }

    /// Returns the number of indexed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summarizes the meaningful recommendations.
    #[must_use]
    pub fn summary(&self) -> RecommendationSummary {
        let mut by_status = BTreeMap::new();
        for status in self.meaningful().filter_map(|rec| rec.suggested_status) {
            *by_status.entry(status).or_insert(0) += 1;
        }
        RecommendationSummary {
            total: by_status.values().sum(),
            by_status,
        }
    }
}

/// Counts of meaningful recommendations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationSummary {
    /// Number of meaningful recommendations.
    pub total: usize,
    /// Meaningful recommendations per suggested status.
    pub by_status: BTreeMap<Status, usize>,
}

fn deserialize_confidence<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

fn deserialize_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text),
            _ => None,
        })
        .collect())
}
