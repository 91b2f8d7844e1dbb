//! The batch scheduler: selects due enrollments and drives each one step
//! forward.
//!
//! One invocation is a synchronous, sequential pass: fetch due
//! enrollments (bounded by the batch cap), then for each one: resolve
//! its sequence and lead, execute the current step, advance the cursor,
//! persist, log. A failure inside one enrollment never aborts the pass;
//! only a failure of the initial due fetch propagates to the caller.
//!
//! Within a single enrollment the order is strict: execute, then advance,
//! then persist. Between enrollments no ordering is guaranteed or needed.

use jiff::{SignedDuration, Timestamp};
use log::{info, warn};
use tokio::task;

use super::{executor, Engine, Messenger};
use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{Enrollment, EnrollmentOutcome, EnrollmentStatus, RunReport, StepAction},
    params::RunDue,
};

/// Bound on enrollments touched in one pass when the caller gives none.
pub const DEFAULT_BATCH_LIMIT: usize = 50;

impl Engine {
    /// Runs one scheduler pass over due enrollments at the current time.
    ///
    /// This is the entry point the periodic external trigger invokes; it
    /// rejects the call when a configured shared secret is missing or
    /// wrong.
    pub async fn run_due(&self, params: &RunDue) -> Result<RunReport> {
        self.run_due_at(params, Timestamp::now()).await
    }

    /// Runs one scheduler pass with an explicit `now`, for callers that
    /// control time (tests, replays).
    pub async fn run_due_at(&self, params: &RunDue, now: Timestamp) -> Result<RunReport> {
        self.authorize(params.secret.as_deref())?;

        let db_path = self.db_path.clone();
        let messenger = self.messenger.clone();
        let limit = params.limit.unwrap_or(DEFAULT_BATCH_LIMIT);

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            run_batch(&mut db, messenger.as_ref(), now, limit)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

/// One full batch pass. Only the initial due fetch can fail the pass;
/// everything after is absorbed into per-enrollment outcomes.
pub(crate) fn run_batch(
    db: &mut Database,
    messenger: &dyn Messenger,
    now: Timestamp,
    limit: usize,
) -> Result<RunReport> {
    let due = db.due_enrollments(now, limit)?;

    let mut report = RunReport {
        processed: due.len(),
        outcomes: Vec::with_capacity(due.len()),
    };

    for enrollment in due {
        let outcome = process_enrollment(db, messenger, &enrollment, now);
        if !outcome.success {
            warn!(
                "enrollment {} ({}): {}",
                outcome.enrollment_id,
                outcome.action,
                outcome.detail.as_deref().unwrap_or("failed")
            );
        }
        report.outcomes.push(outcome);
    }

    info!(
        "scheduler pass touched {} enrollment(s): {} ok, {} failed",
        report.processed,
        report.succeeded(),
        report.failed()
    );

    Ok(report)
}

/// Processes a single enrollment, absorbing every error into the
/// outcome so the rest of the batch keeps going.
fn process_enrollment(
    db: &mut Database,
    messenger: &dyn Messenger,
    enrollment: &Enrollment,
    now: Timestamp,
) -> EnrollmentOutcome {
    advance_enrollment(db, messenger, enrollment, now).unwrap_or_else(|e| EnrollmentOutcome {
        enrollment_id: enrollment.id,
        lead_id: enrollment.lead_id,
        action: "error".to_string(),
        success: false,
        detail: Some(e.to_string()),
    })
}

/// The per-enrollment state machine (execute → advance → persist → log).
fn advance_enrollment(
    db: &mut Database,
    messenger: &dyn Messenger,
    enrollment: &Enrollment,
    now: Timestamp,
) -> Result<EnrollmentOutcome> {
    let outcome = |action: &str, success: bool, detail: Option<String>| EnrollmentOutcome {
        enrollment_id: enrollment.id,
        lead_id: enrollment.lead_id,
        action: action.to_string(),
        success,
        detail,
    };

    // Resolve collaborator rows; a dangling reference fails the
    // enrollment permanently but never the batch.
    let sequence = db.get_sequence(enrollment.sequence_id)?;
    let lead = db.get_lead(enrollment.lead_id)?;

    let (sequence, lead) = match (sequence, lead) {
        (Some(sequence), Some(lead)) if sequence.active => (sequence, lead),
        (sequence, lead) => {
            let reason = if lead.is_none() {
                format!("lead {} missing or deleted", enrollment.lead_id)
            } else if sequence.is_none() {
                format!("sequence {} missing", enrollment.sequence_id)
            } else {
                format!("sequence {} inactive", enrollment.sequence_id)
            };
            db.persist_progress(
                enrollment.id,
                enrollment.current_step,
                EnrollmentStatus::Failed,
                now,
                now,
            )?;
            db.append_log(enrollment.id, "resolve", false, Some(&reason), now)?;
            return Ok(outcome("resolve", false, Some(reason)));
        }
    };

    let step_count = sequence.steps.len() as u32;

    // A cursor at or past the end completes before anything executes.
    if enrollment.current_step >= step_count {
        db.persist_progress(
            enrollment.id,
            enrollment.current_step,
            EnrollmentStatus::Completed,
            now,
            now,
        )?;
        db.append_log(enrollment.id, "complete", true, None, now)?;
        return Ok(outcome("complete", true, None));
    }

    let step = &sequence.steps[enrollment.current_step as usize];

    match step.action() {
        Ok(StepAction::Delay { hours }) => {
            // A delay only computes the next wake-up; no side effect, no
            // messaging, and the enrollment stays active even when the
            // delay is the last step.
            let next_action_at = now
                .checked_add(SignedDuration::from_hours(hours))
                .map_err(|e| EngineError::InvalidInput {
                    field: "hours".to_string(),
                    reason: format!("Delay of {hours}h overflows the timestamp range: {e}"),
                })?;
            db.persist_progress(
                enrollment.id,
                enrollment.current_step + 1,
                EnrollmentStatus::Active,
                next_action_at,
                now,
            )?;
            db.append_log(
                enrollment.id,
                "delay",
                true,
                Some(&format!("next action in {hours}h")),
                now,
            )?;
            Ok(outcome(
                "delay",
                true,
                Some(format!("next action in {hours}h")),
            ))
        }
        decoded => {
            // Execute exactly once, then advance the cursor whether or
            // not the side effect succeeded. Retrying before advancing is
            // a deliberate non-feature of the documented policy.
            let step_outcome = match &decoded {
                Ok(action) => executor::execute_action(db, messenger, &lead, &sequence, action, now)
                    .unwrap_or_else(|e| executor::StepOutcome {
                        success: false,
                        detail: Some(e.to_string()),
                    }),
                Err(reason) => executor::unrecognized_step(&lead, &step.kind, reason),
            };

            let next_step = enrollment.current_step + 1;
            let status = if next_step >= step_count {
                EnrollmentStatus::Completed
            } else {
                EnrollmentStatus::Active
            };
            db.persist_progress(enrollment.id, next_step, status, now, now)?;
            db.append_log(
                enrollment.id,
                &step.kind,
                step_outcome.success,
                step_outcome.detail.as_deref(),
                now,
            )?;
            Ok(outcome(
                &step.kind,
                step_outcome.success,
                step_outcome.detail,
            ))
        }
    }
}
