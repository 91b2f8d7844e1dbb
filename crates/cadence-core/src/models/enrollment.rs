//! Enrollment model definition.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::EnrollmentStatus;

/// Tracks one lead's progress through one sequence.
///
/// `current_step` only ever grows; once `status` leaves `Active` the row is
/// never mutated again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Enrollment {
    /// Unique identifier for the enrollment
    pub id: u64,

    /// ID of the enrolled lead
    pub lead_id: u64,

    /// ID of the sequence being followed
    pub sequence_id: u64,

    /// Index of the next step to execute (0-indexed)
    pub current_step: u32,

    /// Current status of the enrollment
    #[serde(default)]
    pub status: EnrollmentStatus,

    /// When this enrollment becomes eligible for processing again
    pub next_action_at: Timestamp,

    /// When the scheduler last touched this enrollment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action_at: Option<Timestamp>,

    /// Timestamp when the enrollment was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the enrollment was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Enrollment {
    /// Whether the enrollment is eligible for processing at `now`.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.status == EnrollmentStatus::Active && self.next_action_at <= now
    }
}
