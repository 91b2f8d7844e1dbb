//! Step model definition and the typed step-action union.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents an individual step within a sequence.
///
/// The step's behavior lives in `kind` + `config`, decoded on demand via
/// [`Step::action`]. Keeping the raw pair on the model means a row with an
/// unrecognized kind still loads and lists; only execution treats it as a
/// configuration error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Step {
    /// Unique identifier for the step
    pub id: u64,

    /// ID of the parent sequence
    pub sequence_id: u64,

    /// Step kind tag as stored ("delay", "email", "whatsapp", "task")
    pub kind: String,

    /// Kind-specific configuration
    pub config: Value,

    /// Order of the step within the sequence (0-indexed, fixed at creation)
    pub order: u32,

    /// Timestamp when the step was created (UTC)
    pub created_at: Timestamp,
}

impl Step {
    /// Decode the stored kind/config pair into a typed action.
    ///
    /// Returns `Err` with a human-readable reason when the kind is unknown
    /// or the config does not fit the kind; the scheduler downgrades that
    /// to a warning-level no-op rather than failing the enrollment.
    pub fn action(&self) -> Result<StepAction, String> {
        StepAction::decode(&self.kind, &self.config)
    }
}

/// Closed union of step behaviors.
///
/// One variant per supported step kind with explicit fields, in place of a
/// free-form config map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StepAction {
    /// Wait before the next step; computes a future timestamp and nothing
    /// else; never an external side effect
    Delay {
        /// Hours to wait
        hours: i64,
    },

    /// Send an email built from a template reference
    Email {
        /// Template reference resolved by the messaging collaborator
        template: String,
    },

    /// Send a WhatsApp message built from a template reference
    WhatsApp {
        /// Template reference resolved by the messaging collaborator
        template: String,
    },

    /// Create a follow-up task on the lead, due the day of execution
    Task {
        /// Task title; defaults to "Automated task" when omitted
        title: Option<String>,
        /// Optional longer description
        description: Option<String>,
    },
}

#[derive(Serialize, Deserialize)]
struct DelayConfig {
    hours: i64,
}

#[derive(Serialize, Deserialize)]
struct TemplateConfig {
    template: String,
}

#[derive(Serialize, Deserialize, Default)]
struct TaskConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl StepAction {
    /// The kind tag stored in the database for this action.
    pub fn kind(&self) -> &'static str {
        match self {
            StepAction::Delay { .. } => "delay",
            StepAction::Email { .. } => "email",
            StepAction::WhatsApp { .. } => "whatsapp",
            StepAction::Task { .. } => "task",
        }
    }

    /// The config object stored in the database for this action.
    pub fn config(&self) -> Value {
        match self {
            StepAction::Delay { hours } => {
                serde_json::json!({ "hours": hours })
            }
            StepAction::Email { template } | StepAction::WhatsApp { template } => {
                serde_json::json!({ "template": template })
            }
            StepAction::Task { title, description } => {
                let mut obj = serde_json::Map::new();
                if let Some(title) = title {
                    obj.insert("title".into(), Value::String(title.clone()));
                }
                if let Some(description) = description {
                    obj.insert("description".into(), Value::String(description.clone()));
                }
                Value::Object(obj)
            }
        }
    }

    /// Decode a stored kind/config pair.
    pub fn decode(kind: &str, config: &Value) -> Result<Self, String> {
        match kind {
            "delay" => {
                let cfg: DelayConfig = serde_json::from_value(config.clone())
                    .map_err(|e| format!("invalid delay config: {e}"))?;
                if cfg.hours < 0 {
                    return Err(format!("delay hours must be non-negative: {}", cfg.hours));
                }
                Ok(StepAction::Delay { hours: cfg.hours })
            }
            "email" => {
                let cfg: TemplateConfig = serde_json::from_value(config.clone())
                    .map_err(|e| format!("invalid email config: {e}"))?;
                Ok(StepAction::Email {
                    template: cfg.template,
                })
            }
            "whatsapp" => {
                let cfg: TemplateConfig = serde_json::from_value(config.clone())
                    .map_err(|e| format!("invalid whatsapp config: {e}"))?;
                Ok(StepAction::WhatsApp {
                    template: cfg.template,
                })
            }
            "task" => {
                let cfg: TaskConfig = serde_json::from_value(config.clone())
                    .map_err(|e| format!("invalid task config: {e}"))?;
                Ok(StepAction::Task {
                    title: cfg.title,
                    description: cfg.description,
                })
            }
            other => Err(format!("unrecognized step kind: {other}")),
        }
    }
}
