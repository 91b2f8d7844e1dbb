//! Batch run reporting types.

use serde::{Deserialize, Serialize};

/// What happened to a single enrollment during a scheduler pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrollmentOutcome {
    /// ID of the processed enrollment
    pub enrollment_id: u64,

    /// ID of the lead the enrollment belongs to
    pub lead_id: u64,

    /// Action taken ("delay", "email", "complete", "resolve", ...)
    pub action: String,

    /// Whether the action succeeded
    pub success: bool,

    /// Error detail or note, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Structured summary of one scheduler invocation.
///
/// Intended for logging and monitoring; individual failures are absorbed
/// here rather than raised out of the batch loop.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RunReport {
    /// Number of enrollments touched in this pass
    pub processed: usize,

    /// Per-enrollment outcomes, in processing order
    pub outcomes: Vec<EnrollmentOutcome>,
}

impl RunReport {
    /// Count of outcomes that succeeded.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    /// Count of outcomes that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}
