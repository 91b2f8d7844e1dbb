//! Automation log queries. Entries are append-only.

use jiff::Timestamp;
use rusqlite::params;

use super::timestamp_column;
use crate::{
    error::{EngineError, Result},
    models::AutomationLog,
};

const INSERT_LOG_SQL: &str = "INSERT INTO automation_logs (enrollment_id, action, success, detail, logged_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_LOGS_SQL: &str = "SELECT id, enrollment_id, action, success, detail, logged_at FROM automation_logs ORDER BY id DESC LIMIT ?1";
const SELECT_LOGS_BY_ENROLLMENT_SQL: &str = "SELECT id, enrollment_id, action, success, detail, logged_at FROM automation_logs WHERE enrollment_id = ?1 ORDER BY id DESC LIMIT ?2";

impl super::Database {
    fn build_log_from_row(row: &rusqlite::Row) -> rusqlite::Result<AutomationLog> {
        Ok(AutomationLog {
            id: row.get::<_, i64>(0)? as u64,
            enrollment_id: row.get::<_, i64>(1)? as u64,
            action: row.get(2)?,
            success: row.get(3)?,
            detail: row.get(4)?,
            logged_at: timestamp_column(row, 5)?,
        })
    }

    /// Appends one audit entry for a step execution attempt.
    pub fn append_log(
        &mut self,
        enrollment_id: u64,
        action: &str,
        success: bool,
        detail: Option<&str>,
        now: Timestamp,
    ) -> Result<AutomationLog> {
        self.connection
            .execute(
                INSERT_LOG_SQL,
                params![
                    enrollment_id as i64,
                    action,
                    success,
                    detail,
                    now.to_string()
                ],
            )
            .map_err(|e| EngineError::database_error("Failed to insert log entry", e))?;

        let id = self.connection.last_insert_rowid() as u64;

        Ok(AutomationLog {
            id,
            enrollment_id,
            action: action.into(),
            success,
            detail: detail.map(String::from),
            logged_at: now,
        })
    }

    /// Lists log entries newest-first, optionally scoped to one enrollment.
    pub fn list_logs(
        &self,
        enrollment_id: Option<u64>,
        limit: usize,
    ) -> Result<Vec<AutomationLog>> {
        let mut entries = match enrollment_id {
            Some(enrollment_id) => {
                let mut stmt = self
                    .connection
                    .prepare(SELECT_LOGS_BY_ENROLLMENT_SQL)
                    .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;
                let rows = stmt
                    .query_map(
                        params![enrollment_id as i64, limit as i64],
                        Self::build_log_from_row,
                    )
                    .map_err(|e| EngineError::database_error("Failed to query log entries", e))?
                    .collect::<std::result::Result<Vec<_>, _>>();
                rows
            }
            None => {
                let mut stmt = self
                    .connection
                    .prepare(SELECT_LOGS_SQL)
                    .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;
                let rows = stmt
                    .query_map(params![limit as i64], Self::build_log_from_row)
                    .map_err(|e| EngineError::database_error("Failed to query log entries", e))?
                    .collect::<std::result::Result<Vec<_>, _>>();
                rows
            }
        }
        .map_err(|e| EngineError::database_error("Failed to fetch log entries", e))?;

        entries.reverse(); // chronological order for display
        Ok(entries)
    }
}
