//! Lead model definition and related functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{LeadQuality, LeadStatus};

/// Represents a prospect tracked through the sales pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lead {
    /// Unique identifier for the lead
    pub id: u64,

    /// Display name of the prospect
    pub name: String,

    /// Contact email address
    pub email: Option<String>,

    /// Contact phone number, stored as entered
    pub phone: Option<String>,

    /// Pipeline status
    #[serde(default)]
    pub status: LeadStatus,

    /// Quality grade
    #[serde(default)]
    pub quality: LeadQuality,

    /// Numeric engagement score
    pub score: i64,

    /// When the next follow-up is due, if scheduled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_follow_up_at: Option<Timestamp>,

    /// When the lead was last contacted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contact_at: Option<Timestamp>,

    /// Soft-delete marker; a deleted lead is invisible to automation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,

    /// Timestamp when the lead was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the lead was last updated (UTC)
    pub updated_at: Timestamp,
}

impl Lead {
    /// The moment this lead was last heard from: last contact when one
    /// exists, creation time otherwise. Inactivity triggers measure
    /// against this.
    pub fn last_touch(&self) -> Timestamp {
        self.last_contact_at.unwrap_or(self.created_at)
    }
}

/// An activity entry recorded against a lead (e.g., a sent message).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Activity {
    /// Unique identifier for the activity
    pub id: u64,

    /// ID of the lead the activity belongs to
    pub lead_id: u64,

    /// Kind of activity ("email", "whatsapp", ...)
    pub kind: String,

    /// Free-form content describing what happened
    pub content: String,

    /// Timestamp when the activity was recorded (UTC)
    pub created_at: Timestamp,
}

/// A follow-up task created against a lead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FollowUpTask {
    /// Unique identifier for the task
    pub id: u64,

    /// ID of the lead the task belongs to
    pub lead_id: u64,

    /// Short task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Calendar day the task is due
    pub due_date: jiff::civil::Date,

    /// Timestamp when the task was created (UTC)
    pub created_at: Timestamp,
}
