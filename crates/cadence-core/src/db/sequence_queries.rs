//! Sequence and step CRUD operations and queries.

use jiff::Timestamp;
use rusqlite::{params, types::Type, OptionalExtension};

use super::timestamp_column;
use crate::{
    error::{DatabaseResultExt, EngineError, Result},
    models::{Sequence, SequenceSummary, Step, StepAction, TriggerConditions, TriggerType},
};

// Optimized SQL queries as const strings for compile-time optimization
const INSERT_SEQUENCE_SQL: &str = "INSERT INTO sequences (name, description, trigger_type, trigger_conditions, active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const SELECT_SEQUENCE_SQL: &str = "SELECT id, name, description, trigger_type, trigger_conditions, active, total_enrolled, total_completed, created_at, updated_at FROM sequences WHERE id = ?1";
const SELECT_ACTIVE_SEQUENCES_SQL: &str = "SELECT id, name, description, trigger_type, trigger_conditions, active, total_enrolled, total_completed, created_at, updated_at FROM sequences WHERE active = 1 ORDER BY id";
const SELECT_SEQUENCE_SUMMARIES_SQL: &str = "SELECT id, name, trigger_type, active, total_steps, active_enrollments, total_enrolled, total_completed, created_at FROM sequence_overview ORDER BY created_at DESC";
const UPDATE_SEQUENCE_ACTIVE_SQL: &str =
    "UPDATE sequences SET active = ?1, updated_at = ?2 WHERE id = ?3";
const CHECK_SEQUENCE_EXISTS_SQL: &str = "SELECT EXISTS(SELECT 1 FROM sequences WHERE id = ?1)";
const GET_MAX_STEP_ORDER_SQL: &str =
    "SELECT COALESCE(MAX(step_order), -1) + 1 FROM steps WHERE sequence_id = ?1";
const INSERT_STEP_SQL: &str = "INSERT INTO steps (sequence_id, kind, config, step_order, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_SEQUENCE_TIMESTAMP_SQL: &str = "UPDATE sequences SET updated_at = ?1 WHERE id = ?2";
const SELECT_STEPS_BY_SEQUENCE_SQL: &str = "SELECT id, sequence_id, kind, config, step_order, created_at FROM steps WHERE sequence_id = ?1 ORDER BY step_order";

impl super::Database {
    /// Helper function to construct a Sequence (without steps) from a
    /// database row
    fn build_sequence_from_row(row: &rusqlite::Row) -> rusqlite::Result<Sequence> {
        let trigger_str: String = row.get(3)?;
        let trigger_type = trigger_str.parse::<TriggerType>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                3,
                Type::Text,
                format!("Invalid trigger type: {trigger_str}").into(),
            )
        })?;

        let conditions_str: String = row.get(4)?;
        let trigger_conditions: TriggerConditions = serde_json::from_str(&conditions_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

        Ok(Sequence {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            description: row.get(2)?,
            trigger_type,
            trigger_conditions,
            active: row.get(5)?,
            total_enrolled: row.get::<_, i64>(6)? as u64,
            total_completed: row.get::<_, i64>(7)? as u64,
            created_at: timestamp_column(row, 8)?,
            updated_at: timestamp_column(row, 9)?,
            steps: Vec::new(),
        })
    }

    /// Helper function to construct a Step from a database row
    fn build_step_from_row(row: &rusqlite::Row) -> rusqlite::Result<Step> {
        let config_str: String = row.get(3)?;
        let config = serde_json::from_str(&config_str)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(Step {
            id: row.get::<_, i64>(0)? as u64,
            sequence_id: row.get::<_, i64>(1)? as u64,
            kind: row.get(2)?,
            config,
            order: row.get::<_, i64>(4)? as u32,
            created_at: timestamp_column(row, 5)?,
        })
    }

    /// Creates a new sequence with no steps yet.
    pub fn create_sequence(
        &mut self,
        name: &str,
        description: Option<&str>,
        trigger_type: TriggerType,
        trigger_conditions: &TriggerConditions,
    ) -> Result<Sequence> {
        let now = Timestamp::now();
        let now_str = now.to_string();
        let conditions_json = serde_json::to_string(trigger_conditions)?;

        self.connection
            .execute(
                INSERT_SEQUENCE_SQL,
                params![
                    name,
                    description,
                    trigger_type.as_str(),
                    &conditions_json,
                    true,
                    &now_str,
                    &now_str
                ],
            )
            .map_err(|e| EngineError::database_error("Failed to insert sequence", e))?;

        let id = self.connection.last_insert_rowid() as u64;

        Ok(Sequence {
            id,
            name: name.into(),
            description: description.map(String::from),
            trigger_type,
            trigger_conditions: trigger_conditions.clone(),
            active: true,
            total_enrolled: 0,
            total_completed: 0,
            created_at: now,
            updated_at: now,
            steps: Vec::new(),
        })
    }

    /// Retrieves a sequence by its ID with its steps eagerly loaded.
    pub fn get_sequence(&self, id: u64) -> Result<Option<Sequence>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SEQUENCE_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let mut sequence = stmt
            .query_row(params![id as i64], Self::build_sequence_from_row)
            .optional()
            .map_err(|e| EngineError::database_error("Failed to query sequence", e))?;

        if let Some(ref mut sequence) = sequence {
            sequence.steps = self.get_steps(sequence.id)?;
        }

        Ok(sequence)
    }

    /// Retrieves every active sequence, steps not loaded. The trigger
    /// evaluator only needs the trigger type and conditions.
    pub fn get_active_sequences(&self) -> Result<Vec<Sequence>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ACTIVE_SEQUENCES_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let sequences = stmt
            .query_map([], Self::build_sequence_from_row)
            .map_err(|e| EngineError::database_error("Failed to query sequences", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EngineError::database_error("Failed to fetch sequences", e))?;

        Ok(sequences)
    }

    /// Lists all sequences as summaries via the overview view.
    pub fn list_sequence_summaries(&self) -> Result<Vec<SequenceSummary>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_SEQUENCE_SUMMARIES_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let summaries = stmt
            .query_map([], |row| {
                let trigger_str: String = row.get(2)?;
                let trigger_type = trigger_str.parse::<TriggerType>().map_err(|_| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        Type::Text,
                        format!("Invalid trigger type: {trigger_str}").into(),
                    )
                })?;
                Ok(SequenceSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    name: row.get(1)?,
                    trigger_type,
                    active: row.get(3)?,
                    total_steps: row.get::<_, i64>(4)? as u64,
                    active_enrollments: row.get::<_, i64>(5)? as u64,
                    total_enrolled: row.get::<_, i64>(6)? as u64,
                    total_completed: row.get::<_, i64>(7)? as u64,
                    created_at: timestamp_column(row, 8)?,
                })
            })
            .map_err(|e| EngineError::database_error("Failed to query sequence summaries", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EngineError::database_error("Failed to fetch sequence summaries", e))?;

        Ok(summaries)
    }

    /// Activates or deactivates a sequence. An inactive sequence never
    /// enrolls; in-flight enrollments fail at resolution time.
    pub fn set_sequence_active(&mut self, id: u64, active: bool) -> Result<()> {
        let now_str = Timestamp::now().to_string();
        let changed = self
            .connection
            .execute(
                UPDATE_SEQUENCE_ACTIVE_SQL,
                params![active, &now_str, id as i64],
            )
            .map_err(|e| EngineError::database_error("Failed to update sequence", e))?;

        if changed == 0 {
            return Err(EngineError::SequenceNotFound { id });
        }
        Ok(())
    }

    /// Appends a step to the end of a sequence. Step order is fixed here
    /// and never reordered afterwards.
    pub fn add_step(&mut self, sequence_id: u64, action: &StepAction) -> Result<Step> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let sequence_exists: bool = tx
            .query_row(
                CHECK_SEQUENCE_EXISTS_SQL,
                params![sequence_id as i64],
                |row| row.get(0),
            )
            .map_err(|e| EngineError::database_error("Failed to check sequence existence", e))?;

        if !sequence_exists {
            return Err(EngineError::SequenceNotFound { id: sequence_id });
        }

        let next_order: i64 = tx
            .query_row(GET_MAX_STEP_ORDER_SQL, params![sequence_id as i64], |row| {
                row.get(0)
            })
            .map_err(|e| EngineError::database_error("Failed to get next step order", e))?;

        let now = Timestamp::now();
        let now_str = now.to_string();
        let config = action.config();
        let config_json = serde_json::to_string(&config)?;

        tx.execute(
            INSERT_STEP_SQL,
            params![
                sequence_id as i64,
                action.kind(),
                &config_json,
                next_order,
                &now_str
            ],
        )
        .map_err(|e| EngineError::database_error("Failed to insert step", e))?;

        let id = tx.last_insert_rowid() as u64;

        tx.execute(
            UPDATE_SEQUENCE_TIMESTAMP_SQL,
            params![&now_str, sequence_id as i64],
        )
        .map_err(|e| EngineError::database_error("Failed to update sequence timestamp", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Step {
            id,
            sequence_id,
            kind: action.kind().into(),
            config,
            order: next_order as u32,
            created_at: now,
        })
    }

    /// Retrieves all steps for a given sequence, in execution order.
    pub fn get_steps(&self, sequence_id: u64) -> Result<Vec<Step>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_STEPS_BY_SEQUENCE_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let steps = stmt
            .query_map(params![sequence_id as i64], Self::build_step_from_row)
            .map_err(|e| EngineError::database_error("Failed to query steps", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EngineError::database_error("Failed to fetch steps", e))?;

        Ok(steps)
    }
}
