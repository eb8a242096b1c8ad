//! Activity log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

/// One executed operation, as written to an activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ULID, sortable by creation time
    pub id: String,

    pub timestamp: DateTime<Utc>,

    /// Canonical op string, e.g. "update lineage"
    pub op: String,

    /// Normalized input parameters
    pub input: Value,

    /// Result value or error message
    pub output: Value,

    /// Who performed the operation, "user_id" or "agent[session]"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    pub duration_ms: u64,
}

impl LogEntry {
    pub fn new(
        op: impl Into<String>,
        input: Value,
        output: Value,
        actor: Option<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            output,
            actor,
            duration_ms,
        }
    }

    /// Build an entry whose duration is measured from `started`
    pub fn since(op: impl Into<String>, input: Value, output: Value, started: Instant) -> Self {
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        Self::new(op, input, output, None, duration_ms)
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}
