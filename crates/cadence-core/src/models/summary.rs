//! Compact sequence summary for list views.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::TriggerType;

/// Summary information about a sequence, backed by the `sequence_overview`
/// view so step and enrollment counts come from one query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SequenceSummary {
    /// Unique identifier for the sequence
    pub id: u64,

    /// Name of the sequence
    pub name: String,

    /// Event that enrolls leads into this sequence
    pub trigger_type: TriggerType,

    /// Whether the sequence currently enrolls
    pub active: bool,

    /// Number of steps in the sequence
    pub total_steps: u64,

    /// Enrollments currently in flight
    pub active_enrollments: u64,

    /// Count of enrollments ever created
    pub total_enrolled: u64,

    /// Count of enrollments that ran to completion
    pub total_completed: u64,

    /// Timestamp when the sequence was created (UTC)
    pub created_at: Timestamp,
}
