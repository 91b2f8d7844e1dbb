//! High-level automation engine API.
//!
//! This module provides the main [`Engine`] interface for the cadence
//! system: lead and sequence management, enrollment creation through the
//! trigger evaluator, and the batch scheduler that drives due enrollments.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Operations    │    │  Scheduler &     │    │    Database     │
//! │ (lead_ops,      │───▶│  Trigger logic   │───▶│   (via db/)     │
//! │  sequence_ops)  │    │ (scheduler,      │    │                 │
//! │                 │    │  triggers,       │    │                 │
//! │                 │    │  executor)       │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//!   Interface facade       Engine semantics       Data persistence
//! ```
//!
//! Every public operation is async and runs its blocking database work on
//! the tokio blocking pool, opening a connection per call. The engine holds
//! no open handle and no global state; everything it needs (database
//! path, messaging collaborator, scheduler secret) is injected through
//! [`EngineBuilder`].
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Engine`] instances
//! - [`executor`]: The [`Messenger`] seam and per-step execution
//! - [`scheduler`]: The due-enrollment batch loop and state machine
//! - [`triggers`]: Enrollment creation from lead events and inactivity
//! - [`lead_ops`] / [`sequence_ops`] / [`enrollment_ops`]: CRUD facades

use std::path::PathBuf;
use std::sync::Arc;

// Module declarations
pub mod builder;
pub mod enrollment_ops;
pub mod executor;
pub mod lead_ops;
pub mod scheduler;
pub mod sequence_ops;
pub mod triggers;

// Re-export the main types
pub use builder::EngineBuilder;
pub use executor::{LogMessenger, Messenger};
pub use triggers::LeadEvent;

use crate::error::{EngineError, Result};

/// Main engine interface for leads, sequences, and automation runs.
pub struct Engine {
    pub(crate) db_path: PathBuf,
    pub(crate) messenger: Arc<dyn Messenger>,
    pub(crate) run_secret: Option<String>,
}

impl Engine {
    /// Creates a new engine with the given configuration.
    pub(crate) fn new(
        db_path: PathBuf,
        messenger: Arc<dyn Messenger>,
        run_secret: Option<String>,
    ) -> Self {
        Self {
            db_path,
            messenger,
            run_secret,
        }
    }

    /// Checks a presented scheduler secret against the configured one.
    ///
    /// With no secret configured every invocation is accepted (single-user
    /// local setup); once configured, a missing or wrong secret is
    /// rejected.
    pub(crate) fn authorize(&self, presented: Option<&str>) -> Result<()> {
        match &self.run_secret {
            None => Ok(()),
            Some(expected) if presented == Some(expected.as_str()) => Ok(()),
            Some(_) => Err(EngineError::Unauthorized),
        }
    }
}
