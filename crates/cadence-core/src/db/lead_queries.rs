//! Lead CRUD operations and lead-owned side-effect records.

use jiff::{civil::Date, Timestamp};
use rusqlite::{params, types::Type, OptionalExtension};

use super::{optional_timestamp_column, timestamp_column};
use crate::{
    error::{DatabaseResultExt, EngineError, Result},
    models::{Activity, FollowUpTask, Lead, LeadFilter, LeadQuality, LeadStatus},
};

// Optimized SQL queries as const strings for compile-time optimization
const LEAD_COLUMNS: &str = "id, name, email, phone, status, quality, score, next_follow_up_at, last_contact_at, deleted_at, created_at, updated_at";
const INSERT_LEAD_SQL: &str = "INSERT INTO leads (name, email, phone, status, quality, score, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_LEAD_SQL: &str = "SELECT id, name, email, phone, status, quality, score, next_follow_up_at, last_contact_at, deleted_at, created_at, updated_at FROM leads WHERE id = ?1 AND deleted_at IS NULL";
const UPDATE_LEAD_SQL: &str = "UPDATE leads SET name = ?1, email = ?2, phone = ?3, status = ?4, quality = ?5, score = ?6, updated_at = ?7 WHERE id = ?8 AND deleted_at IS NULL";
const SOFT_DELETE_LEAD_SQL: &str =
    "UPDATE leads SET deleted_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL";
const RESTORE_LEAD_SQL: &str =
    "UPDATE leads SET deleted_at = NULL, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NOT NULL";
const TOUCH_LAST_CONTACT_SQL: &str =
    "UPDATE leads SET last_contact_at = ?1, updated_at = ?1 WHERE id = ?2 AND deleted_at IS NULL";
const SET_NEXT_FOLLOW_UP_SQL: &str =
    "UPDATE leads SET next_follow_up_at = ?1, updated_at = ?2 WHERE id = ?3 AND deleted_at IS NULL";
const SELECT_INACTIVE_LEADS_SQL: &str = "SELECT id, name, email, phone, status, quality, score, next_follow_up_at, last_contact_at, deleted_at, created_at, updated_at FROM leads WHERE deleted_at IS NULL AND COALESCE(last_contact_at, created_at) <= ?1 ORDER BY id";
const INSERT_ACTIVITY_SQL: &str =
    "INSERT INTO activities (lead_id, kind, content, created_at) VALUES (?1, ?2, ?3, ?4)";
const INSERT_TASK_SQL: &str = "INSERT INTO tasks (lead_id, title, description, due_date, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_TASKS_BY_LEAD_SQL: &str = "SELECT id, lead_id, title, description, due_date, created_at FROM tasks WHERE lead_id = ?1 ORDER BY id";
const SELECT_ACTIVITIES_BY_LEAD_SQL: &str = "SELECT id, lead_id, kind, content, created_at FROM activities WHERE lead_id = ?1 ORDER BY id";

impl super::Database {
    /// Helper function to construct a Lead from a database row
    pub(crate) fn build_lead_from_row(row: &rusqlite::Row) -> rusqlite::Result<Lead> {
        let status_str: String = row.get(4)?;
        let status = status_str.parse::<LeadStatus>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                4,
                Type::Text,
                format!("Invalid status: {status_str}").into(),
            )
        })?;

        let quality_str: String = row.get(5)?;
        let quality = quality_str.parse::<LeadQuality>().map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                Type::Text,
                format!("Invalid quality: {quality_str}").into(),
            )
        })?;

        Ok(Lead {
            id: row.get::<_, i64>(0)? as u64,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            status,
            quality,
            score: row.get(6)?,
            next_follow_up_at: optional_timestamp_column(row, 7)?,
            last_contact_at: optional_timestamp_column(row, 8)?,
            deleted_at: optional_timestamp_column(row, 9)?,
            created_at: timestamp_column(row, 10)?,
            updated_at: timestamp_column(row, 11)?,
        })
    }

    /// Creates a new lead entering the pipeline as `new`.
    pub fn create_lead(
        &mut self,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        quality: LeadQuality,
        score: i64,
    ) -> Result<Lead> {
        let now = Timestamp::now();
        let now_str = now.to_string();

        self.connection
            .execute(
                INSERT_LEAD_SQL,
                params![
                    name,
                    email,
                    phone,
                    LeadStatus::New.as_str(),
                    quality.as_str(),
                    score,
                    &now_str,
                    &now_str
                ],
            )
            .map_err(|e| EngineError::database_error("Failed to insert lead", e))?;

        let id = self.connection.last_insert_rowid() as u64;

        Ok(Lead {
            id,
            name: name.into(),
            email: email.map(String::from),
            phone: phone.map(String::from),
            status: LeadStatus::New,
            quality,
            score,
            next_follow_up_at: None,
            last_contact_at: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Retrieves a live (non-deleted) lead by its ID.
    pub fn get_lead(&self, id: u64) -> Result<Option<Lead>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_LEAD_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let lead = stmt
            .query_row(params![id as i64], Self::build_lead_from_row)
            .optional()
            .map_err(|e| EngineError::database_error("Failed to query lead", e))?;

        Ok(lead)
    }

    /// Lists leads with optional filtering.
    pub fn list_leads(&self, filter: Option<&LeadFilter>) -> Result<Vec<Lead>> {
        let mut query = format!("SELECT {LEAD_COLUMNS} FROM leads");

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if filter.is_some_and(|f| f.include_deleted) {
            conditions.push("deleted_at IS NOT NULL");
        } else {
            conditions.push("deleted_at IS NULL");
        }

        if let Some(f) = filter {
            if let Some(ref name) = f.name_contains {
                conditions.push("name LIKE ?");
                params_vec.push(Box::new(format!("%{name}%")));
            }

            if let Some(ref status) = f.status {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str().to_string()));
            }

            if let Some(ref quality) = f.quality {
                conditions.push("quality = ?");
                params_vec.push(Box::new(quality.as_str().to_string()));
            }
        }

        query.push_str(" WHERE ");
        query.push_str(&conditions.join(" AND "));
        query.push_str(" ORDER BY created_at DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let leads = stmt
            .query_map(&params_refs[..], Self::build_lead_from_row)
            .map_err(|e| EngineError::database_error("Failed to query leads", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EngineError::database_error("Failed to fetch leads", e))?;

        Ok(leads)
    }

    /// Updates lead fields, preserving anything not provided. Returns the
    /// updated lead.
    pub fn update_lead(
        &mut self,
        id: u64,
        status: Option<LeadStatus>,
        quality: Option<LeadQuality>,
        score: Option<i64>,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Lead> {
        let tx = self
            .connection
            .transaction()
            .db_context("Failed to begin transaction")?;

        let current = {
            let mut stmt = tx
                .prepare(SELECT_LEAD_SQL)
                .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;
            stmt.query_row(params![id as i64], Self::build_lead_from_row)
                .optional()
                .map_err(|e| EngineError::database_error("Failed to query lead", e))?
                .ok_or(EngineError::LeadNotFound { id })?
        };

        let now = Timestamp::now();
        let now_str = now.to_string();

        let new_status = status.unwrap_or(current.status);
        let new_quality = quality.unwrap_or(current.quality);
        let new_score = score.unwrap_or(current.score);
        let new_email = email.map(String::from).or(current.email);
        let new_phone = phone.map(String::from).or(current.phone);

        tx.execute(
            UPDATE_LEAD_SQL,
            params![
                &current.name,
                new_email.as_deref(),
                new_phone.as_deref(),
                new_status.as_str(),
                new_quality.as_str(),
                new_score,
                &now_str,
                id as i64
            ],
        )
        .map_err(|e| EngineError::database_error("Failed to update lead", e))?;

        tx.commit().db_context("Failed to commit transaction")?;

        Ok(Lead {
            status: new_status,
            quality: new_quality,
            score: new_score,
            email: new_email,
            phone: new_phone,
            updated_at: now,
            ..current
        })
    }

    /// Soft-deletes a lead; it disappears from every automation path.
    pub fn soft_delete_lead(&mut self, id: u64) -> Result<()> {
        let now_str = Timestamp::now().to_string();
        let changed = self
            .connection
            .execute(SOFT_DELETE_LEAD_SQL, params![&now_str, id as i64])
            .map_err(|e| EngineError::database_error("Failed to delete lead", e))?;

        if changed == 0 {
            return Err(EngineError::LeadNotFound { id });
        }
        Ok(())
    }

    /// Restores a soft-deleted lead.
    pub fn restore_lead(&mut self, id: u64) -> Result<()> {
        let now_str = Timestamp::now().to_string();
        let changed = self
            .connection
            .execute(RESTORE_LEAD_SQL, params![&now_str, id as i64])
            .map_err(|e| EngineError::database_error("Failed to restore lead", e))?;

        if changed == 0 {
            return Err(EngineError::LeadNotFound { id });
        }
        Ok(())
    }

    /// Refreshes the lead's last-contact marker after an outbound message.
    pub fn touch_last_contact(&mut self, id: u64, now: Timestamp) -> Result<()> {
        self.connection
            .execute(TOUCH_LAST_CONTACT_SQL, params![now.to_string(), id as i64])
            .map_err(|e| EngineError::database_error("Failed to update last contact", e))?;
        Ok(())
    }

    /// Moves the lead's next follow-up marker.
    pub fn set_next_follow_up(&mut self, id: u64, at: Timestamp) -> Result<()> {
        let now_str = Timestamp::now().to_string();
        self.connection
            .execute(
                SET_NEXT_FOLLOW_UP_SQL,
                params![at.to_string(), &now_str, id as i64],
            )
            .map_err(|e| EngineError::database_error("Failed to update next follow-up", e))?;
        Ok(())
    }

    /// Leads whose last touch (contact, or creation when never contacted)
    /// is at or before the cutoff. Inactivity triggers select on this.
    pub fn inactive_leads(&self, cutoff: Timestamp) -> Result<Vec<Lead>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_INACTIVE_LEADS_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let leads = stmt
            .query_map(params![cutoff.to_string()], Self::build_lead_from_row)
            .map_err(|e| EngineError::database_error("Failed to query inactive leads", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EngineError::database_error("Failed to fetch inactive leads", e))?;

        Ok(leads)
    }

    /// Records an activity entry against a lead.
    pub fn create_activity(
        &mut self,
        lead_id: u64,
        kind: &str,
        content: &str,
        now: Timestamp,
    ) -> Result<Activity> {
        self.connection
            .execute(
                INSERT_ACTIVITY_SQL,
                params![lead_id as i64, kind, content, now.to_string()],
            )
            .map_err(|e| EngineError::database_error("Failed to insert activity", e))?;

        let id = self.connection.last_insert_rowid() as u64;

        Ok(Activity {
            id,
            lead_id,
            kind: kind.into(),
            content: content.into(),
            created_at: now,
        })
    }

    /// Creates a follow-up task against a lead.
    pub fn create_task(
        &mut self,
        lead_id: u64,
        title: &str,
        description: Option<&str>,
        due_date: Date,
        now: Timestamp,
    ) -> Result<FollowUpTask> {
        self.connection
            .execute(
                INSERT_TASK_SQL,
                params![
                    lead_id as i64,
                    title,
                    description,
                    due_date.to_string(),
                    now.to_string()
                ],
            )
            .map_err(|e| EngineError::database_error("Failed to insert task", e))?;

        let id = self.connection.last_insert_rowid() as u64;

        Ok(FollowUpTask {
            id,
            lead_id,
            title: title.into(),
            description: description.map(String::from),
            due_date,
            created_at: now,
        })
    }

    /// Retrieves all tasks recorded against a lead.
    pub fn get_tasks(&self, lead_id: u64) -> Result<Vec<FollowUpTask>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_TASKS_BY_LEAD_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let tasks = stmt
            .query_map(params![lead_id as i64], |row| {
                let due_str: String = row.get(4)?;
                let due_date = due_str.parse::<Date>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e))
                })?;
                Ok(FollowUpTask {
                    id: row.get::<_, i64>(0)? as u64,
                    lead_id: row.get::<_, i64>(1)? as u64,
                    title: row.get(2)?,
                    description: row.get(3)?,
                    due_date,
                    created_at: timestamp_column(row, 5)?,
                })
            })
            .map_err(|e| EngineError::database_error("Failed to query tasks", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EngineError::database_error("Failed to fetch tasks", e))?;

        Ok(tasks)
    }

    /// Retrieves all activities recorded against a lead.
    pub fn get_activities(&self, lead_id: u64) -> Result<Vec<Activity>> {
        let mut stmt = self
            .connection
            .prepare(SELECT_ACTIVITIES_BY_LEAD_SQL)
            .map_err(|e| EngineError::database_error("Failed to prepare query", e))?;

        let activities = stmt
            .query_map(params![lead_id as i64], |row| {
                Ok(Activity {
                    id: row.get::<_, i64>(0)? as u64,
                    lead_id: row.get::<_, i64>(1)? as u64,
                    kind: row.get(2)?,
                    content: row.get(3)?,
                    created_at: timestamp_column(row, 4)?,
                })
            })
            .map_err(|e| EngineError::database_error("Failed to query activities", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| EngineError::database_error("Failed to fetch activities", e))?;

        Ok(activities)
    }
}
