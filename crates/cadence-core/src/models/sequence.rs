//! Sequence model definition and trigger condition matching.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Lead, LeadQuality, LeadStatus, Step, TriggerType};

/// Represents a named follow-up sequence with its trigger and ordered steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sequence {
    /// Unique identifier for the sequence
    pub id: u64,

    /// Name of the sequence
    pub name: String,

    /// Detailed description of what the sequence is for
    pub description: Option<String>,

    /// Event that enrolls leads into this sequence
    pub trigger_type: TriggerType,

    /// Field conditions a lead must match for the trigger to fire
    #[serde(default)]
    pub trigger_conditions: TriggerConditions,

    /// Inactive sequences never enroll and are skipped by the evaluator
    pub active: bool,

    /// Count of enrollments ever created against this sequence
    pub total_enrolled: u64,

    /// Count of enrollments that ran to completion
    pub total_completed: u64,

    /// Timestamp when the sequence was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the sequence was last modified (UTC)
    pub updated_at: Timestamp,

    /// Ordered steps; index 0 executes first
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// Field conditions attached to a sequence trigger.
///
/// A closed set of optional fields in place of a free-form key/value map.
/// Populated fields must all equal the lead's current value (strict
/// equality); `inactivity_days` is not an equality check: the sweep
/// evaluates it against a cutoff timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TriggerConditions {
    /// Required pipeline status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,

    /// Required quality grade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<LeadQuality>,

    /// Days without contact before an inactivity trigger fires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactivity_days: Option<u32>,
}

impl TriggerConditions {
    /// Whether the lead satisfies every populated equality condition.
    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(status) = self.status {
            if lead.status != status {
                return false;
            }
        }
        if let Some(quality) = self.quality {
            if lead.quality != quality {
                return false;
            }
        }
        true
    }
}
