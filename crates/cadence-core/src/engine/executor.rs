//! Step execution: the messaging seam and per-step side effects.
//!
//! The executor interprets one step against one lead. Real message
//! delivery lives behind the [`Messenger`] trait so deployments plug in
//! actual providers; the bundled [`LogMessenger`] simulates delivery by
//! logging it. Everything else the executor does (activity records,
//! follow-up tasks, contact markers) is a direct database write.

use jiff::{tz::TimeZone, Timestamp};
use log::{debug, info, warn};

use crate::{
    db::Database,
    error::Result,
    models::{Lead, Sequence, StepAction},
};

/// Default title for task steps configured without one.
pub const DEFAULT_TASK_TITLE: &str = "Automated task";

/// Outcome of executing a messaging collaborator call.
pub type SendResult = std::result::Result<(), String>;

/// External messaging collaborator.
///
/// Implementations must be cheap to share across blocking tasks; the
/// engine holds one behind an `Arc` for the life of the process.
pub trait Messenger: Send + Sync {
    /// Deliver an email to the lead from the referenced template.
    fn send_email(&self, lead: &Lead, template: &str) -> SendResult;

    /// Deliver a WhatsApp message to the given (normalized) phone number
    /// from the referenced template.
    fn send_whatsapp(&self, lead: &Lead, phone: &str, template: &str) -> SendResult;
}

/// Simulated messenger: records every send in the log and always
/// succeeds.
pub struct LogMessenger;

impl Messenger for LogMessenger {
    fn send_email(&self, lead: &Lead, template: &str) -> SendResult {
        info!(
            "[simulated] email '{template}' to lead {} <{}>",
            lead.id,
            lead.email.as_deref().unwrap_or("-")
        );
        Ok(())
    }

    fn send_whatsapp(&self, lead: &Lead, phone: &str, template: &str) -> SendResult {
        info!("[simulated] whatsapp '{template}' to lead {} at {phone}", lead.id);
        Ok(())
    }
}

/// What a single step execution attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Whether the side effect succeeded
    pub success: bool,
    /// Error or note attached to the attempt
    pub detail: Option<String>,
}

impl StepOutcome {
    fn ok() -> Self {
        Self {
            success: true,
            detail: None,
        }
    }

    fn ok_with(detail: impl Into<String>) -> Self {
        Self {
            success: true,
            detail: Some(detail.into()),
        }
    }

    fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: Some(detail.into()),
        }
    }
}

/// Executes one non-delay step against a lead.
///
/// Exactly one execution attempt happens per call; the scheduler advances
/// the cursor immediately afterwards, so a step is attempted at most once
/// per eligible pass. Collaborator failures come back as a failed
/// [`StepOutcome`]; only database errors propagate as `Err`, and the
/// scheduler absorbs those into the enrollment's outcome as well.
pub(crate) fn execute_action(
    db: &mut Database,
    messenger: &dyn Messenger,
    lead: &Lead,
    sequence: &Sequence,
    action: &StepAction,
    now: Timestamp,
) -> Result<StepOutcome> {
    match action {
        StepAction::Delay { .. } => {
            // Scheduling is the scheduler's job; a delay reaching the
            // executor performs nothing.
            debug!("delay step reached executor for lead {}; no-op", lead.id);
            Ok(StepOutcome::ok())
        }
        StepAction::Email { template } => {
            let Some(email) = lead.email.as_deref() else {
                return Ok(StepOutcome::failed("lead has no email address"));
            };
            match messenger.send_email(lead, template) {
                Ok(()) => {
                    db.create_activity(
                        lead.id,
                        "email",
                        &format!("Sent '{template}' to {email} (sequence: {})", sequence.name),
                        now,
                    )?;
                    db.touch_last_contact(lead.id, now)?;
                    Ok(StepOutcome::ok())
                }
                Err(e) => Ok(StepOutcome::failed(format!("email send failed: {e}"))),
            }
        }
        StepAction::WhatsApp { template } => {
            let Some(phone) = lead.phone.as_deref() else {
                return Ok(StepOutcome::failed("lead has no phone number"));
            };
            let normalized: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
            match messenger.send_whatsapp(lead, &normalized, template) {
                Ok(()) => {
                    db.create_activity(
                        lead.id,
                        "whatsapp",
                        &format!(
                            "Sent '{template}' to {normalized} (sequence: {})",
                            sequence.name
                        ),
                        now,
                    )?;
                    db.touch_last_contact(lead.id, now)?;
                    Ok(StepOutcome::ok())
                }
                Err(e) => Ok(StepOutcome::failed(format!("whatsapp send failed: {e}"))),
            }
        }
        StepAction::Task { title, description } => {
            let title = title.as_deref().unwrap_or(DEFAULT_TASK_TITLE);
            let due_date = now.to_zoned(TimeZone::system()).date();
            let task = db.create_task(lead.id, title, description.as_deref(), due_date, now)?;
            db.set_next_follow_up(lead.id, now)?;
            Ok(StepOutcome::ok_with(format!(
                "created task {} '{}' due {due_date}",
                task.id, task.title
            )))
        }
    }
}

/// Handles a step row whose kind/config failed to decode: a warning-level
/// no-op, never a batch failure.
pub(crate) fn unrecognized_step(lead: &Lead, kind: &str, reason: &str) -> StepOutcome {
    warn!("skipping step with unrecognized configuration for lead {}: {reason}", lead.id);
    StepOutcome::ok_with(format!("skipped '{kind}' step: {reason}"))
}
