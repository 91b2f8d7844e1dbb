//! Parameter structures for cadence operations
//!
//! Shared parameter structures usable from any interface (CLI today,
//! other front ends later) without framework-specific derives. Interface
//! layers wrap these with their own derives and convert via `From`, so
//! argument parsing concerns never leak into the core.
//!
//! Where an interface naturally supplies strings (statuses, trigger types,
//! step kinds), the params keep the string and expose a `validate()` that
//! produces the typed value, mirroring how status updates are validated
//! before they reach the database layer.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    error::{EngineError, Result},
    models::{LeadQuality, LeadStatus, StepAction, TriggerConditions, TriggerType},
};

/// Generic parameters for operations requiring just an ID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new lead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLead {
    /// Display name of the prospect (required)
    pub name: String,
    /// Contact email address
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// Quality grade ('hot', 'warm', or 'cold'); defaults to warm
    pub quality: Option<String>,
    /// Initial engagement score; defaults to 0
    pub score: Option<i64>,
}

impl CreateLead {
    /// Validate and parse the quality grade.
    pub fn validate(&self) -> Result<LeadQuality> {
        match &self.quality {
            Some(quality) => {
                LeadQuality::from_str(quality).map_err(|_| EngineError::InvalidInput {
                    field: "quality".to_string(),
                    reason: format!("Invalid quality: {quality}. Must be 'hot', 'warm', or 'cold'"),
                })
            }
            None => Ok(LeadQuality::default()),
        }
    }
}

/// Parameters for listing leads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListLeads {
    /// Filter by pipeline status
    pub status: Option<LeadStatus>,
    /// Filter by quality grade
    pub quality: Option<LeadQuality>,
    /// Show soft-deleted leads instead of live ones
    #[serde(default)]
    pub deleted: bool,
}

/// Parameters for updating an existing lead.
///
/// All fields are optional; omitted fields keep their current value. A
/// status or quality change feeds the trigger evaluator, so sequences
/// listening for those events enroll as part of the update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLead {
    /// Lead ID to update (required)
    pub id: u64,
    /// New pipeline status ('new', 'contacted', 'qualified', 'negotiating',
    /// 'won', or 'lost')
    pub status: Option<String>,
    /// New quality grade ('hot', 'warm', or 'cold')
    pub quality: Option<String>,
    /// New engagement score
    pub score: Option<i64>,
    /// Updated contact email
    pub email: Option<String>,
    /// Updated contact phone
    pub phone: Option<String>,
}

impl UpdateLead {
    /// Validate and parse the status/quality strings.
    pub fn validate(&self) -> Result<(Option<LeadStatus>, Option<LeadQuality>)> {
        let status = match &self.status {
            Some(status) => {
                Some(LeadStatus::from_str(status).map_err(|_| EngineError::InvalidInput {
                    field: "status".to_string(),
                    reason: format!(
                        "Invalid status: {status}. Must be one of 'new', 'contacted', \
                         'qualified', 'negotiating', 'won', or 'lost'"
                    ),
                })?)
            }
            None => None,
        };
        let quality = match &self.quality {
            Some(quality) => {
                Some(LeadQuality::from_str(quality).map_err(|_| EngineError::InvalidInput {
                    field: "quality".to_string(),
                    reason: format!("Invalid quality: {quality}. Must be 'hot', 'warm', or 'cold'"),
                })?)
            }
            None => None,
        };
        Ok((status, quality))
    }
}

/// Parameters for creating a new sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateSequence {
    /// Name of the sequence (required)
    pub name: String,
    /// Optional detailed description
    pub description: Option<String>,
    /// Trigger type ('new_lead', 'status_change', 'inactivity_days',
    /// 'quality_change', or 'manual')
    pub trigger: String,
    /// Require this pipeline status for the trigger to match
    pub on_status: Option<String>,
    /// Require this quality grade for the trigger to match
    pub on_quality: Option<String>,
    /// Days without contact before an inactivity trigger fires
    pub inactivity_days: Option<u32>,
}

impl CreateSequence {
    /// Validate and parse the trigger type and its conditions.
    pub fn validate(&self) -> Result<(TriggerType, TriggerConditions)> {
        let trigger_type =
            TriggerType::from_str(&self.trigger).map_err(|_| EngineError::InvalidInput {
                field: "trigger".to_string(),
                reason: format!(
                    "Invalid trigger type: {}. Must be one of 'new_lead', 'status_change', \
                     'inactivity_days', 'quality_change', or 'manual'",
                    self.trigger
                ),
            })?;

        if trigger_type == TriggerType::InactivityDays && self.inactivity_days.is_none() {
            return Err(EngineError::InvalidInput {
                field: "inactivity_days".to_string(),
                reason: "An inactivity trigger requires --inactivity-days".to_string(),
            });
        }

        let status = match &self.on_status {
            Some(status) => {
                Some(LeadStatus::from_str(status).map_err(|_| EngineError::InvalidInput {
                    field: "on_status".to_string(),
                    reason: format!("Invalid status condition: {status}"),
                })?)
            }
            None => None,
        };
        let quality = match &self.on_quality {
            Some(quality) => {
                Some(LeadQuality::from_str(quality).map_err(|_| EngineError::InvalidInput {
                    field: "on_quality".to_string(),
                    reason: format!("Invalid quality condition: {quality}"),
                })?)
            }
            None => None,
        };

        Ok((
            trigger_type,
            TriggerConditions {
                status,
                quality,
                inactivity_days: self.inactivity_days,
            },
        ))
    }
}

/// Parameters for appending a step to a sequence.
///
/// The step lands at the end of the sequence; step order is fixed at
/// creation time and the engine never reorders it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddStep {
    /// ID of the sequence to extend
    pub sequence_id: u64,
    /// Step kind ('delay', 'email', 'whatsapp', or 'task')
    pub kind: String,
    /// Hours to wait (delay steps)
    pub hours: Option<i64>,
    /// Template reference (email/whatsapp steps)
    pub template: Option<String>,
    /// Task title (task steps)
    pub title: Option<String>,
    /// Task description (task steps)
    pub description: Option<String>,
}

impl AddStep {
    /// Validate the kind/config combination into a typed action.
    pub fn validate(&self) -> Result<StepAction> {
        let invalid = |reason: String| EngineError::InvalidInput {
            field: "kind".to_string(),
            reason,
        };
        match self.kind.to_lowercase().as_str() {
            "delay" => {
                let hours = self
                    .hours
                    .ok_or_else(|| invalid("A delay step requires --hours".to_string()))?;
                if hours < 0 {
                    return Err(invalid(format!("Delay hours must be non-negative: {hours}")));
                }
                Ok(StepAction::Delay { hours })
            }
            "email" => {
                let template = self
                    .template
                    .clone()
                    .ok_or_else(|| invalid("An email step requires --template".to_string()))?;
                Ok(StepAction::Email { template })
            }
            "whatsapp" => {
                let template = self
                    .template
                    .clone()
                    .ok_or_else(|| invalid("A whatsapp step requires --template".to_string()))?;
                Ok(StepAction::WhatsApp { template })
            }
            "task" => Ok(StepAction::Task {
                title: self.title.clone(),
                description: self.description.clone(),
            }),
            other => Err(invalid(format!(
                "Invalid step kind: {other}. Must be 'delay', 'email', 'whatsapp', or 'task'"
            ))),
        }
    }
}

/// Parameters for manually enrolling a lead into a sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollLead {
    /// ID of the lead to enroll
    pub lead_id: u64,
    /// ID of the sequence to enroll into
    pub sequence_id: u64,
}

/// Parameters for a scheduler pass over due enrollments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunDue {
    /// Upper bound on enrollments processed in one pass; defaults to 50
    pub limit: Option<usize>,
    /// Shared secret presented by the invoking trigger
    pub secret: Option<String>,
}

/// Parameters for listing automation log entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListLogs {
    /// Only entries for this enrollment
    pub enrollment_id: Option<u64>,
    /// Maximum entries returned; defaults to 50, newest first
    pub limit: Option<usize>,
}
