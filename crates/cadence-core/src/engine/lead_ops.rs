//! Lead operations for the Engine.
//!
//! Mutations here double as trigger sources: creating a lead fires the
//! `new_lead` event, and updates fire `status_change` / `quality_change`
//! when those fields actually move, so matching sequences enroll as part
//! of the same blocking call.

use jiff::Timestamp;
use log::info;
use tokio::task;

use super::{triggers, Engine, LeadEvent};
use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{Activity, FollowUpTask, Lead, LeadFilter},
    params::{CreateLead, Id, ListLeads, UpdateLead},
};

impl Engine {
    /// Creates a new lead and evaluates `new_lead` triggers against it.
    pub async fn create_lead(&self, params: &CreateLead) -> Result<Lead> {
        let quality = params.validate()?;
        let db_path = self.db_path.clone();
        let name = params.name.clone();
        let email = params.email.clone();
        let phone = params.phone.clone();
        let score = params.score.unwrap_or(0);

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let lead = db.create_lead(&name, email.as_deref(), phone.as_deref(), quality, score)?;
            let enrolled =
                triggers::evaluate_event(&mut db, &lead, LeadEvent::Created, Timestamp::now())?;
            if !enrolled.is_empty() {
                info!(
                    "lead {} enrolled into {} sequence(s) on creation",
                    lead.id,
                    enrolled.len()
                );
            }
            Ok(lead)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a live lead by its ID.
    pub async fn get_lead(&self, params: &Id) -> Result<Option<Lead>> {
        let db_path = self.db_path.clone();
        let lead_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_lead(lead_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a lead together with its recorded activities and tasks.
    #[allow(clippy::type_complexity)]
    pub async fn lead_details(
        &self,
        params: &Id,
    ) -> Result<Option<(Lead, Vec<Activity>, Vec<FollowUpTask>)>> {
        let db_path = self.db_path.clone();
        let lead_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            let Some(lead) = db.get_lead(lead_id)? else {
                return Ok(None);
            };
            let activities = db.get_activities(lead_id)?;
            let tasks = db.get_tasks(lead_id)?;
            Ok(Some((lead, activities, tasks)))
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists leads with optional status/quality filtering.
    pub async fn list_leads(&self, params: &ListLeads) -> Result<Vec<Lead>> {
        let db_path = self.db_path.clone();
        let filter = LeadFilter::from(params);

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_leads(Some(&filter))
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Updates a lead, firing status/quality change triggers for fields
    /// that actually changed.
    pub async fn update_lead(&self, params: &UpdateLead) -> Result<Lead> {
        let (status, quality) = params.validate()?;
        let db_path = self.db_path.clone();
        let lead_id = params.id;
        let score = params.score;
        let email = params.email.clone();
        let phone = params.phone.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            let before = db
                .get_lead(lead_id)?
                .ok_or(EngineError::LeadNotFound { id: lead_id })?;

            let lead = db.update_lead(
                lead_id,
                status,
                quality,
                score,
                email.as_deref(),
                phone.as_deref(),
            )?;

            let now = Timestamp::now();
            if lead.status != before.status {
                triggers::evaluate_event(&mut db, &lead, LeadEvent::StatusChanged, now)?;
            }
            if lead.quality != before.quality {
                triggers::evaluate_event(&mut db, &lead, LeadEvent::QualityChanged, now)?;
            }

            Ok(lead)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Soft-deletes a lead, removing it from every automation path.
    pub async fn delete_lead(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let lead_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.soft_delete_lead(lead_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Restores a soft-deleted lead.
    pub async fn restore_lead(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let lead_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.restore_lead(lead_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
