//! Status enumerations for leads, enrollments, and sequence triggers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of lead pipeline statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    /// Lead has just entered the pipeline
    #[default]
    New,

    /// First contact has been made
    Contacted,

    /// Lead is qualified as a real prospect
    Qualified,

    /// Terms are being negotiated
    Negotiating,

    /// Deal closed successfully
    Won,

    /// Lead dropped out of the pipeline
    Lost,
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "qualified" => Ok(LeadStatus::Qualified),
            "negotiating" => Ok(LeadStatus::Negotiating),
            "won" => Ok(LeadStatus::Won),
            "lost" => Ok(LeadStatus::Lost),
            _ => Err(format!("Invalid lead status: {s}")),
        }
    }
}

impl LeadStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Negotiating => "negotiating",
            LeadStatus::Won => "won",
            LeadStatus::Lost => "lost",
        }
    }
}

/// Type-safe enumeration of lead quality grades.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadQuality {
    /// Ready to buy, follow up immediately
    Hot,

    /// Interested but not committed
    #[default]
    Warm,

    /// Long-shot, low engagement
    Cold,
}

impl FromStr for LeadQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hot" => Ok(LeadQuality::Hot),
            "warm" => Ok(LeadQuality::Warm),
            "cold" => Ok(LeadQuality::Cold),
            _ => Err(format!("Invalid lead quality: {s}")),
        }
    }
}

impl LeadQuality {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadQuality::Hot => "hot",
            LeadQuality::Warm => "warm",
            LeadQuality::Cold => "cold",
        }
    }
}

/// Type-safe enumeration of enrollment statuses.
///
/// `Completed` and `Failed` are terminal: the scheduler never selects or
/// mutates an enrollment once it has left `Active`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// Enrollment is progressing through its sequence
    #[default]
    Active,

    /// All steps have been executed
    Completed,

    /// The referenced lead or sequence could not be resolved
    Failed,
}

impl FromStr for EnrollmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(EnrollmentStatus::Active),
            "completed" => Ok(EnrollmentStatus::Completed),
            "failed" => Ok(EnrollmentStatus::Failed),
            _ => Err(format!("Invalid enrollment status: {s}")),
        }
    }
}

impl EnrollmentStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Completed => "completed",
            EnrollmentStatus::Failed => "failed",
        }
    }

    /// Whether the enrollment can still be processed.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EnrollmentStatus::Active)
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Icons Used
    /// - `➤ Active` - Arrow for enrollments still in flight
    /// - `✓ Completed` - Checkmark for finished enrollments
    /// - `✗ Failed` - Cross for enrollments that lost their lead or sequence
    pub fn with_icon(&self) -> &'static str {
        match self {
            EnrollmentStatus::Active => "➤ Active",
            EnrollmentStatus::Completed => "✓ Completed",
            EnrollmentStatus::Failed => "✗ Failed",
        }
    }
}

/// Type-safe enumeration of sequence trigger types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// Fires when a lead is created
    NewLead,

    /// Fires when a lead's pipeline status changes
    StatusChange,

    /// Fires when a lead has been quiet for a configured number of days;
    /// evaluated by cutoff query, not field equality
    InactivityDays,

    /// Fires when a lead's quality grade changes
    QualityChange,

    /// Fires only on explicit operator enrollment
    Manual,
}

impl FromStr for TriggerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new_lead" | "new-lead" => Ok(TriggerType::NewLead),
            "status_change" | "status-change" => Ok(TriggerType::StatusChange),
            "inactivity_days" | "inactivity-days" => Ok(TriggerType::InactivityDays),
            "quality_change" | "quality-change" => Ok(TriggerType::QualityChange),
            "manual" => Ok(TriggerType::Manual),
            _ => Err(format!("Invalid trigger type: {s}")),
        }
    }
}

impl TriggerType {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerType::NewLead => "new_lead",
            TriggerType::StatusChange => "status_change",
            TriggerType::InactivityDays => "inactivity_days",
            TriggerType::QualityChange => "quality_change",
            TriggerType::Manual => "manual",
        }
    }
}
