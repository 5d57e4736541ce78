//! A single history record.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A completed evaluation, as stored in history.
///
/// The serialized field names are the persisted layout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Creation timestamp (RFC 3339, UTC), unique within the history.
    pub id: String,
    /// The expression as it was typed.
    pub expression: String,
    /// The formatted result.
    pub result: String,
}

impl HistoryEntry {
    /// Create an entry stamped with the current time.
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            id: timestamp_id(Utc::now()),
            expression: expression.into(),
            result: result.into(),
        }
    }

    /// Make sure this entry's id sorts after `previous`.
    ///
    /// Two evaluations inside the same clock tick would otherwise share an id.
    pub(crate) fn ensure_after(&mut self, previous: &str) {
        let (Some(current), Some(previous)) = (parse_id(&self.id), parse_id(previous)) else {
            return;
        };
        if current <= previous {
            self.id = timestamp_id(previous + Duration::microseconds(1));
        }
    }
}

fn timestamp_id(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_id(id: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(id)
        .ok()
        .map(|at| at.with_timezone(&Utc))
}
