//! Builder for creating and configuring Engine instances.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task;

use super::{executor::LogMessenger, Engine, Messenger};
use crate::{
    db::Database,
    error::{EngineError, Result},
};

/// Builder for creating and configuring Engine instances.
#[derive(Default)]
pub struct EngineBuilder {
    database_path: Option<PathBuf>,
    messenger: Option<Arc<dyn Messenger>>,
    run_secret: Option<String>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/cadence/cadence.db` or
    /// `~/.local/share/cadence/cadence.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Injects the messaging collaborator used by email and WhatsApp
    /// steps. Defaults to [`LogMessenger`], which simulates sends by
    /// logging them.
    pub fn with_messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    /// Sets the shared secret the scheduler entry point requires. When
    /// unset, `run` accepts any invocation.
    pub fn with_run_secret(mut self, secret: Option<String>) -> Self {
        self.run_secret = secret;
        self
    }

    /// Builds the configured engine instance.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FileSystem` if the database path is invalid
    /// Returns `EngineError::Database` if database initialization fails
    pub async fn build(self) -> Result<Engine> {
        let db_path = if let Some(path) = self.database_path {
            path
        } else {
            Self::default_database_path()?
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| EngineError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), EngineError>(())
        })
        .await
        .map_err(|e| EngineError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        let messenger = self.messenger.unwrap_or_else(|| Arc::new(LogMessenger));

        Ok(Engine::new(db_path, messenger, self.run_secret))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("cadence")
            .place_data_file("cadence.db")
            .map_err(|e| EngineError::XdgDirectory(e.to_string()))
    }
}
