//! Core library for the cadence lead follow-up automation engine.
//!
//! This crate provides the business logic for tracking leads through a
//! sales pipeline and automating their follow-up: sequence definitions,
//! per-lead enrollments, the batch scheduler that drives due enrollments
//! one step forward, and the trigger evaluator that creates enrollments
//! from lead events.
//!
//! # Architecture
//!
//! - **Domain Models** ([`models`]): Leads, sequences, steps, enrollments,
//!   and the automation log, with typed step actions and trigger
//!   conditions
//! - **Persistence** ([`db`]): SQLite-backed storage opened per call
//! - **Engine** ([`engine`]): The async facade with CRUD operations, the
//!   scheduler, the step executor behind the [`Messenger`] seam, and
//!   trigger evaluation
//! - **Display** ([`display`]): Markdown formatting for terminal output
//!
//! # Quick Start
//!
//! ```rust
//! use cadence_core::{EngineBuilder, params::{CreateLead, RunDue}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create an engine instance
//! let engine = EngineBuilder::new()
//!     .with_database_path(Some("test.db"))
//!     .build()
//!     .await?;
//!
//! // Create a lead; sequences triggered on new leads enroll it
//! let lead = engine
//!     .create_lead(&CreateLead {
//!         name: "Ada Prospect".to_string(),
//!         email: Some("ada@example.com".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("Created lead: {}", lead);
//!
//! // One scheduler pass over everything that is due
//! let report = engine.run_due(&RunDue::default()).await?;
//! println!("{}", report);
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CreateResult, LeadDetails, Leads, LocalDateTime, LogEntries, OperationStatus,
    SequenceSummaries, Steps, UpdateResult,
};
pub use engine::{Engine, EngineBuilder, LeadEvent, LogMessenger, Messenger};
pub use error::{EngineError, Result};
pub use models::{
    Activity, AutomationLog, Enrollment, EnrollmentOutcome, EnrollmentStatus, FollowUpTask, Lead,
    LeadFilter, LeadQuality, LeadStatus, RunReport, Sequence, SequenceSummary, Step, StepAction,
    TriggerConditions, TriggerType,
};
pub use params::{
    AddStep, CreateLead, CreateSequence, EnrollLead, Id, ListLeads, ListLogs, RunDue, UpdateLead,
};
