//! Automation log model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Append-only audit record of one step execution attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationLog {
    /// Unique identifier for the log entry
    pub id: u64,

    /// ID of the enrollment the attempt belonged to
    pub enrollment_id: u64,

    /// What was attempted: a step kind, or "resolve"/"complete" for
    /// lifecycle transitions
    pub action: String,

    /// Whether the attempt succeeded
    pub success: bool,

    /// Error detail or note, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Timestamp of the attempt (UTC)
    pub logged_at: Timestamp,
}
