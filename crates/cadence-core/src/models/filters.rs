//! Filter types for querying leads.

use super::{LeadQuality, LeadStatus};

/// Filter options for querying leads.
///
/// Soft-deleted leads are excluded unless `include_deleted` is set; no
/// automation path ever sets it.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    /// Filter by lead name (case-insensitive partial match)
    pub name_contains: Option<String>,

    /// Filter by pipeline status
    pub status: Option<LeadStatus>,

    /// Filter by quality grade
    pub quality: Option<LeadQuality>,

    /// Include soft-deleted leads (operator views only)
    pub include_deleted: bool,
}

impl From<&crate::params::ListLeads> for LeadFilter {
    fn from(params: &crate::params::ListLeads) -> Self {
        Self {
            name_contains: None,
            status: params.status,
            quality: params.quality,
            include_deleted: params.deleted,
        }
    }
}
