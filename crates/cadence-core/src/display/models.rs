//! Display implementations for domain models.
//!
//! Markdown-formatted output for terminal display, separated from the
//! model definitions to keep data and presentation apart.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::models::{
    AutomationLog, Enrollment, EnrollmentStatus, Lead, LeadQuality, LeadStatus, RunReport,
    Sequence, SequenceSummary, Step, StepAction, TriggerType,
};

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for LeadQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Lead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;

        writeln!(f, "- Status: {} ({})", self.status, self.quality)?;
        writeln!(f, "- Score: {}", self.score)?;
        if let Some(email) = &self.email {
            writeln!(f, "- Email: {email}")?;
        }
        if let Some(phone) = &self.phone {
            writeln!(f, "- Phone: {phone}")?;
        }
        if let Some(at) = &self.next_follow_up_at {
            writeln!(f, "- Next follow-up: {}", LocalDateTime(at))?;
        }
        if let Some(at) = &self.last_contact_at {
            writeln!(f, "- Last contact: {}", LocalDateTime(at))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        Ok(())
    }
}

impl Step {
    /// Short human description of what the step does.
    fn describe(&self) -> String {
        match self.action() {
            Ok(StepAction::Delay { hours }) => format!("wait {hours}h"),
            Ok(StepAction::Email { template }) => format!("email '{template}'"),
            Ok(StepAction::WhatsApp { template }) => format!("whatsapp '{template}'"),
            Ok(StepAction::Task { title, .. }) => match title {
                Some(title) => format!("task '{title}'"),
                None => "task".to_string(),
            },
            Err(_) => format!("{} (unrecognized)", self.kind),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}. {}", self.order + 1, self.describe())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;

        writeln!(
            f,
            "- Status: {}",
            if self.active { "active" } else { "inactive" }
        )?;
        writeln!(f, "- Trigger: {}", self.trigger_type)?;
        if let Some(status) = self.trigger_conditions.status {
            writeln!(f, "- Requires status: {status}")?;
        }
        if let Some(quality) = self.trigger_conditions.quality {
            writeln!(f, "- Requires quality: {quality}")?;
        }
        if let Some(days) = self.trigger_conditions.inactivity_days {
            writeln!(f, "- After inactivity: {days} day(s)")?;
        }
        writeln!(
            f,
            "- Enrolled: {} total, {} completed",
            self.total_enrolled, self.total_completed
        )?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;

        if let Some(desc) = &self.description {
            writeln!(f)?;
            writeln!(f, "{desc}")?;
        }

        if !self.steps.is_empty() {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        } else {
            writeln!(f, "\nNo steps in this sequence.")?;
        }

        Ok(())
    }
}

impl fmt::Display for SequenceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.active { "" } else { " [inactive]" };
        writeln!(f, "## {} (ID: {}){state}", self.name, self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Trigger**: {}", self.trigger_type)?;
        writeln!(f, "- **Steps**: {}", self.total_steps)?;
        writeln!(
            f,
            "- **Enrollments**: {} active, {} total, {} completed",
            self.active_enrollments, self.total_enrolled, self.total_completed
        )?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for Enrollment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Enrollment {}: lead {} in sequence {} ({})",
            self.id,
            self.lead_id,
            self.sequence_id,
            self.status.with_icon()
        )?;
        writeln!(f, "- Step index: {}", self.current_step)?;
        writeln!(f, "- Next action: {}", LocalDateTime(&self.next_action_at))?;
        if let Some(at) = &self.last_action_at {
            writeln!(f, "- Last action: {}", LocalDateTime(at))?;
        }
        Ok(())
    }
}

impl fmt::Display for AutomationLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.success { "ok" } else { "FAILED" };
        write!(
            f,
            "- {} enrollment {} {} [{marker}]",
            LocalDateTime(&self.logged_at),
            self.enrollment_id,
            self.action
        )?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.processed == 0 {
            return writeln!(f, "No due enrollments.");
        }

        writeln!(
            f,
            "# Scheduler pass: {} processed, {} ok, {} failed",
            self.processed,
            self.succeeded(),
            self.failed()
        )?;
        writeln!(f)?;
        for outcome in &self.outcomes {
            let marker = if outcome.success { "ok" } else { "FAILED" };
            write!(
                f,
                "- enrollment {} (lead {}): {} [{marker}]",
                outcome.enrollment_id, outcome.lead_id, outcome.action
            )?;
            if let Some(detail) = &outcome.detail {
                write!(f, ": {detail}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
