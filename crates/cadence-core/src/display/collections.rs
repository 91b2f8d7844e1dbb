//! Newtype wrappers for displaying collections.
//!
//! These wrappers give collections a `Display` implementation with
//! graceful empty-state messages, so interface layers print one value
//! instead of looping.

use std::fmt;

use crate::models::{Activity, AutomationLog, FollowUpTask, Lead, SequenceSummary, Step};

use super::datetime::LocalDateTime;

/// Newtype wrapper for displaying a list of leads.
pub struct Leads(pub Vec<Lead>);

impl fmt::Display for Leads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No leads found.");
        }
        for lead in &self.0 {
            writeln!(
                f,
                "## {} (ID: {}) [{} / {}]",
                lead.name, lead.id, lead.status, lead.quality
            )?;
            writeln!(f)?;
            if let Some(email) = &lead.email {
                writeln!(f, "- **Email**: {email}")?;
            }
            writeln!(f, "- **Score**: {}", lead.score)?;
            if let Some(at) = &lead.next_follow_up_at {
                writeln!(f, "- **Next follow-up**: {}", LocalDateTime(at))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying sequence summaries.
pub struct SequenceSummaries(pub Vec<SequenceSummary>);

impl fmt::Display for SequenceSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No sequences found.")
        } else {
            for summary in &self.0 {
                write!(f, "{summary}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying the steps of a sequence.
pub struct Steps(pub Vec<Step>);

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No steps in this sequence.")
        } else {
            for step in &self.0 {
                write!(f, "{step}")?;
            }
            Ok(())
        }
    }
}

/// Newtype wrapper for displaying automation log entries.
pub struct LogEntries(pub Vec<AutomationLog>);

impl fmt::Display for LogEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No automation log entries.")
        } else {
            for entry in &self.0 {
                write!(f, "{entry}")?;
            }
            Ok(())
        }
    }
}

/// A lead together with its recorded activities and follow-up tasks.
pub struct LeadDetails {
    pub lead: Lead,
    pub activities: Vec<Activity>,
    pub tasks: Vec<FollowUpTask>,
}

impl fmt::Display for LeadDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.lead)?;

        if !self.activities.is_empty() {
            writeln!(f, "\n## Activities")?;
            writeln!(f)?;
            for activity in &self.activities {
                writeln!(
                    f,
                    "- {} [{}] {}",
                    LocalDateTime(&activity.created_at),
                    activity.kind,
                    activity.content
                )?;
            }
        }

        if !self.tasks.is_empty() {
            writeln!(f, "\n## Tasks")?;
            writeln!(f)?;
            for task in &self.tasks {
                write!(f, "- {} (due {})", task.title, task.due_date)?;
                if let Some(desc) = &task.description {
                    write!(f, ": {desc}")?;
                }
                writeln!(f)?;
            }
        }

        Ok(())
    }
}
