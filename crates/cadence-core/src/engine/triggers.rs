//! Trigger evaluation: turning lead events and inactivity into
//! enrollments.
//!
//! A sequence matches an event when it is active, its trigger type equals
//! the event, and every populated trigger condition equals the lead's
//! field; strict equality, nothing relative. Inactivity is the one
//! special case: it is evaluated by a cutoff query over last-touch
//! timestamps, swept on its own cadence.

use jiff::{SignedDuration, Timestamp};
use log::{debug, info, warn};
use tokio::task;

use super::Engine;
use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{Enrollment, Lead, TriggerType},
    params::EnrollLead,
};

/// Lead lifecycle events the evaluator reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadEvent {
    /// The lead was just created
    Created,
    /// The lead's pipeline status changed
    StatusChanged,
    /// The lead's quality grade changed
    QualityChanged,
}

impl LeadEvent {
    /// The trigger type this event feeds.
    pub fn trigger_type(&self) -> TriggerType {
        match self {
            LeadEvent::Created => TriggerType::NewLead,
            LeadEvent::StatusChanged => TriggerType::StatusChange,
            LeadEvent::QualityChanged => TriggerType::QualityChange,
        }
    }
}

/// Enrolls `lead` into every active sequence whose trigger matches
/// `event`. An existing active enrollment for a pair is skipped silently.
pub(crate) fn evaluate_event(
    db: &mut Database,
    lead: &Lead,
    event: LeadEvent,
    now: Timestamp,
) -> Result<Vec<Enrollment>> {
    let trigger_type = event.trigger_type();
    let mut created = Vec::new();

    for sequence in db.get_active_sequences()? {
        if sequence.trigger_type != trigger_type || !sequence.trigger_conditions.matches(lead) {
            continue;
        }
        if let Some(enrollment) = db.create_enrollment(lead.id, sequence.id, now)? {
            debug!(
                "enrolled lead {} into sequence {} ({:?})",
                lead.id, sequence.id, event
            );
            created.push(enrollment);
        }
    }

    Ok(created)
}

/// Sweeps every inactivity-triggered sequence, enrolling leads whose
/// last touch is at or before the sequence's cutoff.
pub(crate) fn sweep_inactive_leads(db: &mut Database, now: Timestamp) -> Result<Vec<Enrollment>> {
    let mut created = Vec::new();

    for sequence in db.get_active_sequences()? {
        if sequence.trigger_type != TriggerType::InactivityDays {
            continue;
        }
        let Some(days) = sequence.trigger_conditions.inactivity_days else {
            warn!(
                "sequence {} has an inactivity trigger without a day count; skipping",
                sequence.id
            );
            continue;
        };
        let cutoff = now
            .checked_sub(SignedDuration::from_hours(i64::from(days) * 24))
            .map_err(|e| EngineError::InvalidInput {
                field: "inactivity_days".to_string(),
                reason: format!("Cutoff of {days} days overflows the timestamp range: {e}"),
            })?;

        for lead in db.inactive_leads(cutoff)? {
            // Equality conditions still apply; the day count itself was
            // consumed by the cutoff query.
            if !sequence.trigger_conditions.matches(&lead) {
                continue;
            }
            if let Some(enrollment) = db.create_enrollment(lead.id, sequence.id, now)? {
                created.push(enrollment);
            }
        }
    }

    Ok(created)
}

impl Engine {
    /// Manually enrolls a lead into a sequence, the explicit-operator
    /// path behind `manual` triggers.
    ///
    /// Returns `None` when the pair already has an active enrollment so
    /// the caller can report the skip instead of double-enrolling.
    pub async fn enroll(&self, params: &EnrollLead) -> Result<Option<Enrollment>> {
        self.enroll_at(params, Timestamp::now()).await
    }

    /// Manual enrollment with an explicit `now`.
    pub async fn enroll_at(&self, params: &EnrollLead, now: Timestamp) -> Result<Option<Enrollment>> {
        let db_path = self.db_path.clone();
        let lead_id = params.lead_id;
        let sequence_id = params.sequence_id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.get_lead(lead_id)?
                .ok_or(EngineError::LeadNotFound { id: lead_id })?;
            let sequence = db
                .get_sequence(sequence_id)?
                .ok_or(EngineError::SequenceNotFound { id: sequence_id })?;
            if !sequence.active {
                return Err(EngineError::InvalidInput {
                    field: "sequence_id".to_string(),
                    reason: format!("Sequence {sequence_id} is inactive and cannot enroll"),
                });
            }
            db.create_enrollment(lead_id, sequence_id, now)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Runs one inactivity sweep at the current time.
    pub async fn sweep_inactive(&self) -> Result<Vec<Enrollment>> {
        self.sweep_inactive_at(Timestamp::now()).await
    }

    /// Runs one inactivity sweep with an explicit `now`.
    pub async fn sweep_inactive_at(&self, now: Timestamp) -> Result<Vec<Enrollment>> {
        let db_path = self.db_path.clone();

        let created = task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            sweep_inactive_leads(&mut db, now)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        info!("inactivity sweep created {} enrollment(s)", created.len());
        Ok(created)
    }
}
