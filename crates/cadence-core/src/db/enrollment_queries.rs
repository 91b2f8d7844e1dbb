//! Enrollment queries: creation with dedup, due selection, and progress
//! persistence.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use super::{optional_timestamp_column, timestamp_column};
use crate::{
    error::{DatabaseResultExt, EngineError, Result},
    models::{Enrollment, EnrollmentStatus},
};

// Optimized SQL queries as const strings for compile-time optimization
const CHECK_ACTIVE_PAIR_SQL: &str = "SELECT EXISTS(SELECT 1 FROM enrollments WHERE lead_id = ?1 AND sequence_id = ?2 AND status = 'active')";
const INSERT_ENROLLMENT_SQL: &str = "INSERT INTO enrollments (lead_id, sequence_id, current_step, status, next_action_at, created_at, updated_at) VALUES (?1, ?2, 0, 'active', ?3, ?4, ?4)";
const INCREMENT_ENROLLED_SQL: &str =
    "UPDATE sequences SET total_enrolled = total_enrolled + 1 WHERE id = ?1";
const SELECT_ENROLLMENT_SQL: &str = "SELECT id, lead_id, sequence_id, current_step, status, next_action_at, last_action_at, created_at, updated_at FROM enrollments WHERE id = ?1";
const SELECT_DUE_SQL: &str = "SELECT id, lead_id, sequence_id, current_step, status, next_action_at, last_action_at, created_at, updated_at FROM enrollments WHERE status = 'active' AND next_action_at <= ?1 ORDER BY next_action_at, id LIMIT ?2";
const UPDATE_PROGRESS_SQL: &str = "UPDATE enrollments SET current_step = ?1, status = ?2, next_action_at = ?3, last_action_at = ?4, updated_at = ?4 WHERE id = ?5 AND status = 'active'";
const INCREMENT_COMPLETED_SQL: &str = "UPDATE sequences SET total_completed = total_completed + 1 WHERE id = (SELECT sequence_id FROM enrollments WHERE id = ?1)";

impl super::Database {
    /// Helper function to construct an Enrollment from a database row
    fn build_enrollment_from_row(row: &rusqlite::Row) -> rusqlite::Result<Enrollment> {
        let status_str: String = row.get(4)?;
        let status = status_str.parse::<EnrollmentStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("Invalid status: {status_str}").into(),
            )
        })?;

        Ok(Enrollment {
            id: row.get::<_, i64>(0)? as u64,
            lead_id: row.get::<_, i64>(1)? as u64,
            sequence_id: row.get::<_, i64>(2)? as u64,
            current_step: row.get::<_, i64>(3)? as u32,
            status,
            next_action_at: timestamp_column(row, 5)?,
            last_action_at: optional_timestamp_column(row, 6)?,
            created_at: timestamp_column(row, 7)?,
            updated_at: timestamp_column(row, 8)?,
        })
    }

    /// Creates an enrollment at step 0, immediately eligible.
    ///
    /// Returns `None` without touching the database when an active
    /// enrollment already links this lead to this sequence; the skip is
    /// silent, matching the dedup contract. Completed or failed history
    /// does not block re-enrollment.
    pub fn create_enrollment(
        &mut self,
        lead_id: u64,
        sequence_id: u64,
        now: Timestamp,
    ) -> Result<Option<Enrollment>> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let already_active: bool = tx
            .query_row(
                CHECK_ACTIVE_PAIR_SQL,
                params![lead_id as i64, sequence_id as i64],
                |row| row.get(0),
            )
            .map_err(|e| EngineError::database_error("Failed to check existing enrollment", e))?;

        if already_active {
            return Ok(None);
        }

        let now_str = now.to_string();
        tx.execute(
            INSERT_ENROLLMENT_SQL,
            params![lead_id as i64, sequence_id as i64, &now_str, &now_str],
        )
        .map_err(|e| EngineError::database_error("Failed to insert enrollment", e))?;

        let id = tx.last_insert_rowid() as u64;

        tx.execute(INCREMENT_ENROLLED_SQL, params![sequence_id as i64])
            .map_err(|e| EngineError::database_error("Failed to update sequence counters", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Some(Enrollment {
            id,
            lead_id,
            sequence_id,
            current_step: 0,
            status: EnrollmentStatus::Active,
            next_action_at: now,
            last_action_at: None,
            created_at: now,
            updated_at: now,
        }))
    }

    /// Retrieves a single enrollment by its ID.
    pub fn get_enrollment(&self, id: u64) -> Result<Option<Enrollment>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ENROLLMENT_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let enrollment = stmt
            .query_row(params![id as i64], Self::build_enrollment_from_row)
            .optional()
            .map_err(|e| EngineError::database_error("Failed to query enrollment", e))?;

        Ok(enrollment)
    }

    /// Selects due enrollments: active with `next_action_at <= now`, up to
    /// `limit` rows.
    ///
    /// This is a pure read. Repeating it with the same `now` before any
    /// mutation returns the same set, which the batch summary and tests
    /// rely on. Ordering by due time then ID is deterministic but carries
    /// no priority meaning.
    pub fn due_enrollments(&self, now: Timestamp, limit: usize) -> Result<Vec<Enrollment>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_DUE_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let enrollments = stmt
            .query_map(
                params![now.to_string(), limit as i64],
                Self::build_enrollment_from_row,
            )
            .map_err(|e| EngineError::database_error("Failed to query due enrollments", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EngineError::database_error("Failed to fetch due enrollments", e))?;

        Ok(enrollments)
    }

    /// Persists one processing pass over an enrollment as a single atomic
    /// row update.
    ///
    /// The update is guarded on `status = 'active'`, so a row that has
    /// already reached a terminal state is never rewritten. When the pass
    /// completes the enrollment, the owning sequence's completion counter
    /// moves in the same transaction.
    pub fn persist_progress(
        &mut self,
        id: u64,
        current_step: u32,
        status: EnrollmentStatus,
        next_action_at: Timestamp,
        now: Timestamp,
    ) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let changed = tx
            .execute(
                UPDATE_PROGRESS_SQL,
                params![
                    current_step as i64,
                    status.as_str(),
                    next_action_at.to_string(),
                    now.to_string(),
                    id as i64
                ],
            )
            .map_err(|e| EngineError::database_error("Failed to update enrollment", e))?;

        if changed == 0 {
            return Err(EngineError::EnrollmentNotFound { id });
        }

        if status == EnrollmentStatus::Completed {
            tx.execute(INCREMENT_COMPLETED_SQL, params![id as i64])
                .map_err(|e| {
                    EngineError::database_error("Failed to update sequence counters", e)
                })?;
        }

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(())
    }
}
