//! Enrollment inspection and automation-log operations for the Engine.

use tokio::task;

use super::Engine;
use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{AutomationLog, Enrollment},
    params::{Id, ListLogs},
};

/// Default number of log entries returned by a listing.
const DEFAULT_LOG_LIMIT: usize = 50;

impl Engine {
    /// Retrieves a single enrollment by its ID.
    pub async fn get_enrollment(&self, params: &Id) -> Result<Option<Enrollment>> {
        let db_path = self.db_path.clone();
        let enrollment_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_enrollment(enrollment_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists automation log entries, optionally scoped to one enrollment.
    pub async fn list_logs(&self, params: &ListLogs) -> Result<Vec<AutomationLog>> {
        let db_path = self.db_path.clone();
        let enrollment_id = params.enrollment_id;
        let limit = params.limit.unwrap_or(DEFAULT_LOG_LIMIT);

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_logs(enrollment_id, limit)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
