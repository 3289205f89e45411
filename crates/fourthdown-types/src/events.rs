use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kinds of dashboard activity shown in the activity pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Submitted,
    Resolved,
    Failed,
    Discarded,
    Anomaly,
}

/// Immutable activity-log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardEvent {
    pub id: Uuid,
    pub kind: EventKind,
    /// Submission the event belongs to.
    pub ticket: u64,
    pub timestamp: DateTime<Utc>,
    pub detail: String,
}

impl DashboardEvent {
    pub fn new(kind: EventKind, ticket: u64, detail: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            ticket,
            timestamp: Utc::now(),
            detail: detail.into(),
        }
    }
}
