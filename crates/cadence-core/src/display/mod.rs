//! Display formatting for domain models and collections.
//!
//! Domain models implement [`std::fmt::Display`] directly (in
//! [`models`]) for standalone markdown formatting; newtype wrappers in
//! [`collections`] format lists with empty-state messages. Interface
//! layers render the resulting markdown (rich or plain) without knowing
//! anything about the underlying types.
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (Leads, SequenceSummaries,
//!   Steps, LogEntries, LeadDetails)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models
//! - [`results`]: Operation result types (CreateResult, UpdateResult,
//!   OperationStatus)

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;

pub use collections::{LeadDetails, Leads, LogEntries, SequenceSummaries, Steps};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, OperationStatus, UpdateResult};
