//! Sequence and step operations for the Engine.

use tokio::task;

use super::Engine;
use crate::{
    db::Database,
    error::{EngineError, Result},
    models::{Sequence, SequenceSummary, Step},
    params::{AddStep, CreateSequence, Id},
};

impl Engine {
    /// Creates a new sequence with its trigger; steps are appended
    /// separately.
    pub async fn create_sequence(&self, params: &CreateSequence) -> Result<Sequence> {
        let (trigger_type, conditions) = params.validate()?;
        let db_path = self.db_path.clone();
        let name = params.name.clone();
        let description = params.description.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_sequence(&name, description.as_deref(), trigger_type, &conditions)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a sequence with its steps.
    pub async fn get_sequence(&self, params: &Id) -> Result<Option<Sequence>> {
        let db_path = self.db_path.clone();
        let sequence_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_sequence(sequence_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists all sequences as summaries.
    pub async fn list_sequences(&self) -> Result<Vec<SequenceSummary>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_sequence_summaries()
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Activates or deactivates a sequence.
    pub async fn set_sequence_active(&self, params: &Id, active: bool) -> Result<()> {
        let db_path = self.db_path.clone();
        let sequence_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_sequence_active(sequence_id, active)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Appends a step to a sequence.
    pub async fn add_step(&self, params: &AddStep) -> Result<Step> {
        let action = params.validate()?;
        let db_path = self.db_path.clone();
        let sequence_id = params.sequence_id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.add_step(sequence_id, &action)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves the steps of a sequence in execution order.
    pub async fn get_steps(&self, params: &Id) -> Result<Vec<Step>> {
        let db_path = self.db_path.clone();
        let sequence_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_steps(sequence_id)
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}
