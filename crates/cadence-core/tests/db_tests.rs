use cadence_core::{
    Database, EngineError, EnrollmentStatus, LeadFilter, LeadQuality, LeadStatus, StepAction,
    TriggerConditions, TriggerType,
};
use jiff::{SignedDuration, Timestamp};
use tempfile::NamedTempFile;

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn add_sequence(db: &mut Database, name: &str, trigger: TriggerType) -> u64 {
    db.create_sequence(name, None, trigger, &TriggerConditions::default())
        .expect("Failed to create sequence")
        .id
}

#[test]
fn test_database_initialization() {
    let (temp_file, _db) = create_test_db();
    assert!(temp_file.path().exists());
}

#[test]
fn test_create_lead() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead(
            "Ada Prospect",
            Some("ada@example.com"),
            None,
            LeadQuality::Hot,
            25,
        )
        .expect("Failed to create lead");

    assert!(lead.id > 0);
    assert_eq!(lead.status, LeadStatus::New);
    assert_eq!(lead.quality, LeadQuality::Hot);
    assert_eq!(lead.score, 25);
    assert!(lead.deleted_at.is_none());
}

#[test]
fn test_get_lead_excludes_soft_deleted() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Gone Soon", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");

    assert!(db.get_lead(lead.id).expect("query failed").is_some());

    db.soft_delete_lead(lead.id).expect("Failed to delete lead");
    assert!(db.get_lead(lead.id).expect("query failed").is_none());

    db.restore_lead(lead.id).expect("Failed to restore lead");
    assert!(db.get_lead(lead.id).expect("query failed").is_some());
}

#[test]
fn test_soft_delete_missing_lead() {
    let (_temp_file, mut db) = create_test_db();

    match db.soft_delete_lead(999) {
        Err(EngineError::LeadNotFound { id }) => assert_eq!(id, 999),
        other => panic!("Expected LeadNotFound, got {other:?}"),
    }
}

#[test]
fn test_list_leads_with_filters() {
    let (_temp_file, mut db) = create_test_db();

    let hot = db
        .create_lead("Hot Lead", None, None, LeadQuality::Hot, 0)
        .expect("Failed to create lead");
    db.create_lead("Warm Lead", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");

    let all = db.list_leads(None).expect("Failed to list leads");
    assert_eq!(all.len(), 2);

    let filter = LeadFilter {
        quality: Some(LeadQuality::Hot),
        ..Default::default()
    };
    let hot_only = db.list_leads(Some(&filter)).expect("Failed to list leads");
    assert_eq!(hot_only.len(), 1);
    assert_eq!(hot_only[0].id, hot.id);
}

#[test]
fn test_update_lead_preserves_unset_fields() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Keep Email", Some("keep@example.com"), None, LeadQuality::Warm, 5)
        .expect("Failed to create lead");

    let updated = db
        .update_lead(lead.id, Some(LeadStatus::Contacted), None, None, None, None)
        .expect("Failed to update lead");

    assert_eq!(updated.status, LeadStatus::Contacted);
    assert_eq!(updated.quality, LeadQuality::Warm);
    assert_eq!(updated.email.as_deref(), Some("keep@example.com"));
    assert_eq!(updated.score, 5);
}

#[test]
fn test_sequence_with_ordered_steps() {
    let (_temp_file, mut db) = create_test_db();

    let sequence_id = add_sequence(&mut db, "Welcome", TriggerType::NewLead);

    db.add_step(sequence_id, &StepAction::Delay { hours: 24 })
        .expect("Failed to add step");
    db.add_step(
        sequence_id,
        &StepAction::Email {
            template: "welcome".to_string(),
        },
    )
    .expect("Failed to add step");

    let sequence = db
        .get_sequence(sequence_id)
        .expect("Failed to get sequence")
        .expect("Sequence should exist");

    assert_eq!(sequence.steps.len(), 2);
    assert_eq!(sequence.steps[0].order, 0);
    assert_eq!(sequence.steps[0].kind, "delay");
    assert_eq!(sequence.steps[1].order, 1);
    assert_eq!(sequence.steps[1].kind, "email");
}

#[test]
fn test_add_step_to_missing_sequence() {
    let (_temp_file, mut db) = create_test_db();

    match db.add_step(42, &StepAction::Delay { hours: 1 }) {
        Err(EngineError::SequenceNotFound { id }) => assert_eq!(id, 42),
        other => panic!("Expected SequenceNotFound, got {other:?}"),
    }
}

#[test]
fn test_enrollment_dedup_on_active_pair() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Dedup", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    let sequence_id = add_sequence(&mut db, "Once", TriggerType::Manual);

    let now = Timestamp::now();
    let first = db
        .create_enrollment(lead.id, sequence_id, now)
        .expect("Failed to enroll");
    assert!(first.is_some());

    // Second attempt on the same pair is silently skipped
    let second = db
        .create_enrollment(lead.id, sequence_id, now)
        .expect("Failed to enroll");
    assert!(second.is_none());

    // Once the first enrollment is terminal, re-enrollment is allowed
    let enrollment = first.expect("checked above");
    db.persist_progress(
        enrollment.id,
        enrollment.current_step,
        EnrollmentStatus::Completed,
        now,
        now,
    )
    .expect("Failed to persist");

    let third = db
        .create_enrollment(lead.id, sequence_id, now)
        .expect("Failed to enroll");
    assert!(third.is_some());
}

#[test]
fn test_enrollment_counter_tracking() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Counted", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    let sequence_id = add_sequence(&mut db, "Counters", TriggerType::Manual);

    let now = Timestamp::now();
    let enrollment = db
        .create_enrollment(lead.id, sequence_id, now)
        .expect("Failed to enroll")
        .expect("Should enroll");

    let sequence = db
        .get_sequence(sequence_id)
        .expect("query failed")
        .expect("Sequence should exist");
    assert_eq!(sequence.total_enrolled, 1);
    assert_eq!(sequence.total_completed, 0);

    db.persist_progress(enrollment.id, 0, EnrollmentStatus::Completed, now, now)
        .expect("Failed to persist");

    let sequence = db
        .get_sequence(sequence_id)
        .expect("query failed")
        .expect("Sequence should exist");
    assert_eq!(sequence.total_completed, 1);
}

#[test]
fn test_due_selection_respects_eligibility_gate() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Due", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    let seq_a = add_sequence(&mut db, "A", TriggerType::Manual);
    let seq_b = add_sequence(&mut db, "B", TriggerType::Manual);

    let now = Timestamp::now();
    let later = now + SignedDuration::from_hours(4);

    let due_now = db
        .create_enrollment(lead.id, seq_a, now)
        .expect("Failed to enroll")
        .expect("Should enroll");
    let due_later = db
        .create_enrollment(lead.id, seq_b, later)
        .expect("Failed to enroll")
        .expect("Should enroll");

    let due = db.due_enrollments(now, 50).expect("Failed to query due");
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].id, due_now.id);

    let due = db.due_enrollments(later, 50).expect("Failed to query due");
    assert_eq!(due.len(), 2);
    let _ = due_later;
}

#[test]
fn test_due_selection_is_idempotent_before_mutation() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Stable", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    for name in ["S1", "S2", "S3"] {
        let sequence_id = add_sequence(&mut db, name, TriggerType::Manual);
        db.create_enrollment(lead.id, sequence_id, Timestamp::now())
            .expect("Failed to enroll");
    }

    let now = Timestamp::now();
    let first = db.due_enrollments(now, 50).expect("Failed to query due");
    let second = db.due_enrollments(now, 50).expect("Failed to query due");
    assert_eq!(first, second);
}

#[test]
fn test_due_selection_honors_batch_limit() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Capped", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    for i in 0..5 {
        let sequence_id = add_sequence(&mut db, &format!("S{i}"), TriggerType::Manual);
        db.create_enrollment(lead.id, sequence_id, Timestamp::now())
            .expect("Failed to enroll");
    }

    let due = db
        .due_enrollments(Timestamp::now(), 2)
        .expect("Failed to query due");
    assert_eq!(due.len(), 2);
}

#[test]
fn test_persist_progress_never_rewrites_terminal_rows() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Terminal", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    let sequence_id = add_sequence(&mut db, "T", TriggerType::Manual);

    let now = Timestamp::now();
    let enrollment = db
        .create_enrollment(lead.id, sequence_id, now)
        .expect("Failed to enroll")
        .expect("Should enroll");

    db.persist_progress(enrollment.id, 1, EnrollmentStatus::Failed, now, now)
        .expect("Failed to persist");

    // The guarded update refuses to touch a terminal row
    match db.persist_progress(enrollment.id, 2, EnrollmentStatus::Active, now, now) {
        Err(EngineError::EnrollmentNotFound { id }) => assert_eq!(id, enrollment.id),
        other => panic!("Expected EnrollmentNotFound, got {other:?}"),
    }

    let reloaded = db
        .get_enrollment(enrollment.id)
        .expect("query failed")
        .expect("Enrollment should exist");
    assert_eq!(reloaded.status, EnrollmentStatus::Failed);
    assert_eq!(reloaded.current_step, 1);
}

#[test]
fn test_automation_log_append_and_list() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Logged", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    let sequence_id = add_sequence(&mut db, "L", TriggerType::Manual);
    let now = Timestamp::now();
    let enrollment = db
        .create_enrollment(lead.id, sequence_id, now)
        .expect("Failed to enroll")
        .expect("Should enroll");

    db.append_log(enrollment.id, "email", true, None, now)
        .expect("Failed to append log");
    db.append_log(enrollment.id, "whatsapp", false, Some("no phone"), now)
        .expect("Failed to append log");

    let entries = db.list_logs(Some(enrollment.id), 10).expect("query failed");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "email");
    assert!(entries[0].success);
    assert_eq!(entries[1].action, "whatsapp");
    assert!(!entries[1].success);
    assert_eq!(entries[1].detail.as_deref(), Some("no phone"));

    let all = db.list_logs(None, 1).expect("query failed");
    assert_eq!(all.len(), 1);
}

#[test]
fn test_inactive_leads_cutoff() {
    let (_temp_file, mut db) = create_test_db();

    let quiet = db
        .create_lead("Quiet", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    let chatty = db
        .create_lead("Chatty", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");

    let now = Timestamp::now();
    db.touch_last_contact(chatty.id, now + SignedDuration::from_hours(48))
        .expect("Failed to touch");

    // Cutoff sits between creation time and the chatty lead's last contact
    let cutoff = now + SignedDuration::from_hours(24);
    let inactive = db.inactive_leads(cutoff).expect("Failed to query");
    let ids: Vec<u64> = inactive.iter().map(|l| l.id).collect();
    assert!(ids.contains(&quiet.id));
    assert!(!ids.contains(&chatty.id));
}

#[test]
fn test_activities_and_tasks() {
    let (_temp_file, mut db) = create_test_db();

    let lead = db
        .create_lead("Tracked", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");

    let now = Timestamp::now();
    db.create_activity(lead.id, "email", "Sent 'welcome'", now)
        .expect("Failed to create activity");
    let due = jiff::civil::date(2026, 8, 6);
    db.create_task(lead.id, "Call back", None, due, now)
        .expect("Failed to create task");

    let activities = db.get_activities(lead.id).expect("query failed");
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].kind, "email");

    let tasks = db.get_tasks(lead.id).expect("query failed");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Call back");
    assert_eq!(tasks[0].due_date, due);
}

#[test]
fn test_sequence_summaries_view() {
    let (_temp_file, mut db) = create_test_db();

    let sequence_id = add_sequence(&mut db, "Overview", TriggerType::NewLead);
    db.add_step(sequence_id, &StepAction::Delay { hours: 1 })
        .expect("Failed to add step");

    let lead = db
        .create_lead("Viewed", None, None, LeadQuality::Warm, 0)
        .expect("Failed to create lead");
    db.create_enrollment(lead.id, sequence_id, Timestamp::now())
        .expect("Failed to enroll");

    let summaries = db.list_sequence_summaries().expect("query failed");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].total_steps, 1);
    assert_eq!(summaries[0].active_enrollments, 1);
    assert_eq!(summaries[0].total_enrolled, 1);
}
