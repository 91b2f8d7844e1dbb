//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure using clap's derive API with the
//! parameter wrapper pattern: each command gets a clap `Args` struct that
//! converts into the core parameter type via `From`, so argument parsing
//! concerns (flags, aliases, help text) stay here and the core params stay
//! framework-free.

use anyhow::{Context, Result};
use cadence_core::{
    display::{
        CreateResult, LeadDetails, Leads, LogEntries, OperationStatus, SequenceSummaries, Steps,
        UpdateResult,
    },
    params::{
        AddStep, CreateLead, CreateSequence, EnrollLead, Id, ListLeads, ListLogs, RunDue,
        UpdateLead,
    },
    Engine, LeadQuality, LeadStatus,
};
use clap::{Args, Subcommand, ValueEnum};

use crate::renderer::TerminalRenderer;

/// Operations on leads in the pipeline
#[derive(Subcommand)]
pub enum LeadCommands {
    /// Create a new lead
    #[command(alias = "c")]
    Create(CreateLeadArgs),
    /// List leads
    #[command(aliases = ["l", "ls"])]
    List(ListLeadsArgs),
    /// Show a lead with its activities and tasks
    #[command(alias = "s")]
    Show(IdArg),
    /// Update a lead's fields
    #[command(alias = "u")]
    Update(UpdateLeadArgs),
    /// Soft-delete a lead (hides it from all automation)
    #[command(aliases = ["d", "rm"])]
    Delete(IdArg),
    /// Restore a soft-deleted lead
    Restore(IdArg),
}

/// Operations on follow-up sequences
#[derive(Subcommand)]
pub enum SequenceCommands {
    /// Create a new sequence
    #[command(alias = "c")]
    Create(CreateSequenceArgs),
    /// List all sequences
    #[command(aliases = ["l", "ls"])]
    List,
    /// Show a sequence with its steps
    #[command(alias = "s")]
    Show(IdArg),
    /// Activate a sequence
    Activate(IdArg),
    /// Deactivate a sequence (stops enrollment; in-flight enrollments fail)
    Deactivate(IdArg),
}

/// Operations on the steps of a sequence
#[derive(Subcommand)]
pub enum StepCommands {
    /// Append a step to a sequence
    #[command(alias = "a")]
    Add(AddStepArgs),
    /// List the steps of a sequence in execution order
    #[command(aliases = ["l", "ls"])]
    List(IdArg),
}

/// Generic ID argument for show/delete/activate style commands
#[derive(Args)]
pub struct IdArg {
    /// Unique identifier of the resource
    pub id: u64,
}

impl From<IdArg> for Id {
    fn from(val: IdArg) -> Self {
        Id { id: val.id }
    }
}

/// Command-line argument representation of lead quality grades
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum QualityArg {
    Hot,
    Warm,
    Cold,
}

impl QualityArg {
    fn as_str(self) -> &'static str {
        match self {
            QualityArg::Hot => "hot",
            QualityArg::Warm => "warm",
            QualityArg::Cold => "cold",
        }
    }
}

impl From<QualityArg> for LeadQuality {
    fn from(val: QualityArg) -> Self {
        match val {
            QualityArg::Hot => LeadQuality::Hot,
            QualityArg::Warm => LeadQuality::Warm,
            QualityArg::Cold => LeadQuality::Cold,
        }
    }
}

/// Command-line argument representation of lead pipeline statuses
#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    New,
    Contacted,
    Qualified,
    Negotiating,
    Won,
    Lost,
}

impl StatusArg {
    fn as_str(self) -> &'static str {
        match self {
            StatusArg::New => "new",
            StatusArg::Contacted => "contacted",
            StatusArg::Qualified => "qualified",
            StatusArg::Negotiating => "negotiating",
            StatusArg::Won => "won",
            StatusArg::Lost => "lost",
        }
    }
}

impl From<StatusArg> for LeadStatus {
    fn from(val: StatusArg) -> Self {
        match val {
            StatusArg::New => LeadStatus::New,
            StatusArg::Contacted => LeadStatus::Contacted,
            StatusArg::Qualified => LeadStatus::Qualified,
            StatusArg::Negotiating => LeadStatus::Negotiating,
            StatusArg::Won => LeadStatus::Won,
            StatusArg::Lost => LeadStatus::Lost,
        }
    }
}

/// Create a new lead
#[derive(Args)]
pub struct CreateLeadArgs {
    /// Name of the prospect
    pub name: String,
    /// Contact email address
    #[arg(short, long)]
    pub email: Option<String>,
    /// Contact phone number
    #[arg(short, long)]
    pub phone: Option<String>,
    /// Quality grade; defaults to warm
    #[arg(short, long, value_enum)]
    pub quality: Option<QualityArg>,
    /// Initial engagement score
    #[arg(long)]
    pub score: Option<i64>,
}

impl From<CreateLeadArgs> for CreateLead {
    fn from(val: CreateLeadArgs) -> Self {
        CreateLead {
            name: val.name,
            email: val.email,
            phone: val.phone,
            quality: val.quality.map(|q| q.as_str().to_string()),
            score: val.score,
        }
    }
}

/// List leads with optional filters
#[derive(Args)]
pub struct ListLeadsArgs {
    /// Only leads with this pipeline status
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    /// Only leads with this quality grade
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,
    /// Show soft-deleted leads instead of live ones
    #[arg(long)]
    pub deleted: bool,
}

impl From<ListLeadsArgs> for ListLeads {
    fn from(val: ListLeadsArgs) -> Self {
        ListLeads {
            status: val.status.map(LeadStatus::from),
            quality: val.quality.map(LeadQuality::from),
            deleted: val.deleted,
        }
    }
}

/// Update fields on an existing lead
#[derive(Args)]
pub struct UpdateLeadArgs {
    /// Unique identifier of the lead to update
    pub id: u64,
    /// New pipeline status (fires status-change triggers)
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
    /// New quality grade (fires quality-change triggers)
    #[arg(long, value_enum)]
    pub quality: Option<QualityArg>,
    /// New engagement score
    #[arg(long)]
    pub score: Option<i64>,
    /// Updated contact email
    #[arg(short, long)]
    pub email: Option<String>,
    /// Updated contact phone
    #[arg(short, long)]
    pub phone: Option<String>,
}

impl From<UpdateLeadArgs> for UpdateLead {
    fn from(val: UpdateLeadArgs) -> Self {
        UpdateLead {
            id: val.id,
            status: val.status.map(|s| s.as_str().to_string()),
            quality: val.quality.map(|q| q.as_str().to_string()),
            score: val.score,
            email: val.email,
            phone: val.phone,
        }
    }
}

/// Create a new follow-up sequence
#[derive(Args)]
pub struct CreateSequenceArgs {
    /// Name of the sequence
    pub name: String,
    /// Optional description of what the sequence is for
    #[arg(short, long)]
    pub description: Option<String>,
    /// Trigger that enrolls leads (new-lead, status-change,
    /// inactivity-days, quality-change, manual)
    #[arg(short, long)]
    pub trigger: String,
    /// Require this pipeline status for the trigger to match
    #[arg(long, value_enum)]
    pub on_status: Option<StatusArg>,
    /// Require this quality grade for the trigger to match
    #[arg(long, value_enum)]
    pub on_quality: Option<QualityArg>,
    /// Days without contact before an inactivity trigger fires
    #[arg(long)]
    pub inactivity_days: Option<u32>,
}

impl From<CreateSequenceArgs> for CreateSequence {
    fn from(val: CreateSequenceArgs) -> Self {
        CreateSequence {
            name: val.name,
            description: val.description,
            trigger: val.trigger,
            on_status: val.on_status.map(|s| s.as_str().to_string()),
            on_quality: val.on_quality.map(|q| q.as_str().to_string()),
            inactivity_days: val.inactivity_days,
        }
    }
}

/// Append a step to a sequence
#[derive(Args)]
pub struct AddStepArgs {
    /// Unique identifier of the sequence to extend
    pub sequence_id: u64,
    /// Step kind (delay, email, whatsapp, task)
    pub kind: String,
    /// Hours to wait (delay steps)
    #[arg(long)]
    pub hours: Option<i64>,
    /// Template reference (email/whatsapp steps)
    #[arg(long)]
    pub template: Option<String>,
    /// Task title (task steps)
    #[arg(long)]
    pub title: Option<String>,
    /// Task description (task steps)
    #[arg(long)]
    pub description: Option<String>,
}

impl From<AddStepArgs> for AddStep {
    fn from(val: AddStepArgs) -> Self {
        AddStep {
            sequence_id: val.sequence_id,
            kind: val.kind,
            hours: val.hours,
            template: val.template,
            title: val.title,
            description: val.description,
        }
    }
}

/// Manually enroll a lead into a sequence
#[derive(Args)]
pub struct EnrollArgs {
    /// Unique identifier of the lead to enroll
    pub lead_id: u64,
    /// Unique identifier of the sequence to enroll into
    pub sequence_id: u64,
}

impl From<EnrollArgs> for EnrollLead {
    fn from(val: EnrollArgs) -> Self {
        EnrollLead {
            lead_id: val.lead_id,
            sequence_id: val.sequence_id,
        }
    }
}

/// One scheduler pass over due enrollments
#[derive(Args)]
pub struct RunArgs {
    /// Upper bound on enrollments processed in this pass
    #[arg(long)]
    pub limit: Option<usize>,
    /// Shared secret expected by the engine (see CADENCE_RUN_SECRET)
    #[arg(long)]
    pub secret: Option<String>,
}

impl From<RunArgs> for RunDue {
    fn from(val: RunArgs) -> Self {
        RunDue {
            limit: val.limit,
            secret: val.secret,
        }
    }
}

/// Show automation log entries
#[derive(Args)]
pub struct LogsArgs {
    /// Only entries for this enrollment
    #[arg(long)]
    pub enrollment: Option<u64>,
    /// Maximum entries shown
    #[arg(long)]
    pub limit: Option<usize>,
}

impl From<LogsArgs> for ListLogs {
    fn from(val: LogsArgs) -> Self {
        ListLogs {
            enrollment_id: val.enrollment,
            limit: val.limit,
        }
    }
}

/// Command handlers binding the engine to terminal output.
pub struct Cli {
    engine: Engine,
    renderer: TerminalRenderer,
}

impl Cli {
    /// Create a new CLI handler.
    pub fn new(engine: Engine, renderer: TerminalRenderer) -> Self {
        Self { engine, renderer }
    }

    fn render(&self, text: &str) -> Result<()> {
        self.renderer.render(text)
    }

    /// Dispatch a `lead` subcommand.
    pub async fn handle_lead_command(&self, command: LeadCommands) -> Result<()> {
        match command {
            LeadCommands::Create(args) => {
                let lead = self
                    .engine
                    .create_lead(&args.into())
                    .await
                    .context("Failed to create lead")?;
                self.render(&CreateResult::new(lead).to_string())
            }
            LeadCommands::List(args) => self.list_leads(&args.into()).await,
            LeadCommands::Show(args) => {
                let details = self
                    .engine
                    .lead_details(&args.into())
                    .await
                    .context("Failed to load lead")?;
                match details {
                    Some((lead, activities, tasks)) => self.render(
                        &LeadDetails {
                            lead,
                            activities,
                            tasks,
                        }
                        .to_string(),
                    ),
                    None => self.render("Lead not found.\n"),
                }
            }
            LeadCommands::Update(args) => {
                let lead = self
                    .engine
                    .update_lead(&args.into())
                    .await
                    .context("Failed to update lead")?;
                self.render(&UpdateResult::new(lead).to_string())
            }
            LeadCommands::Delete(args) => {
                let id = args.id;
                self.engine
                    .delete_lead(&args.into())
                    .await
                    .context("Failed to delete lead")?;
                self.render(&OperationStatus::new(format!("Deleted lead {id}")).to_string())
            }
            LeadCommands::Restore(args) => {
                let id = args.id;
                self.engine
                    .restore_lead(&args.into())
                    .await
                    .context("Failed to restore lead")?;
                self.render(&OperationStatus::new(format!("Restored lead {id}")).to_string())
            }
        }
    }

    /// List leads with the given filters (also the default command).
    pub async fn list_leads(&self, params: &ListLeads) -> Result<()> {
        let leads = self
            .engine
            .list_leads(params)
            .await
            .context("Failed to list leads")?;
        let heading = if params.deleted {
            "# Deleted Leads\n\n"
        } else {
            "# Leads\n\n"
        };
        self.render(&format!("{heading}{}", Leads(leads)))
    }

    /// Dispatch a `sequence` subcommand.
    pub async fn handle_sequence_command(&self, command: SequenceCommands) -> Result<()> {
        match command {
            SequenceCommands::Create(args) => {
                let sequence = self
                    .engine
                    .create_sequence(&args.into())
                    .await
                    .context("Failed to create sequence")?;
                self.render(&CreateResult::new(sequence).to_string())
            }
            SequenceCommands::List => {
                let summaries = self
                    .engine
                    .list_sequences()
                    .await
                    .context("Failed to list sequences")?;
                self.render(&format!("# Sequences\n\n{}", SequenceSummaries(summaries)))
            }
            SequenceCommands::Show(args) => {
                let sequence = self
                    .engine
                    .get_sequence(&args.into())
                    .await
                    .context("Failed to load sequence")?;
                match sequence {
                    Some(sequence) => self.render(&sequence.to_string()),
                    None => self.render("Sequence not found.\n"),
                }
            }
            SequenceCommands::Activate(args) => {
                let id = args.id;
                self.engine
                    .set_sequence_active(&args.into(), true)
                    .await
                    .context("Failed to activate sequence")?;
                self.render(&OperationStatus::new(format!("Activated sequence {id}")).to_string())
            }
            SequenceCommands::Deactivate(args) => {
                let id = args.id;
                self.engine
                    .set_sequence_active(&args.into(), false)
                    .await
                    .context("Failed to deactivate sequence")?;
                self.render(
                    &OperationStatus::new(format!("Deactivated sequence {id}")).to_string(),
                )
            }
        }
    }

    /// Dispatch a `step` subcommand.
    pub async fn handle_step_command(&self, command: StepCommands) -> Result<()> {
        match command {
            StepCommands::Add(args) => {
                let step = self
                    .engine
                    .add_step(&args.into())
                    .await
                    .context("Failed to add step")?;
                self.render(&CreateResult::new(step).to_string())
            }
            StepCommands::List(args) => {
                let steps = self
                    .engine
                    .get_steps(&args.into())
                    .await
                    .context("Failed to list steps")?;
                self.render(&Steps(steps).to_string())
            }
        }
    }

    /// Manually enroll a lead into a sequence.
    pub async fn enroll(&self, args: EnrollArgs) -> Result<()> {
        let enrollment = self
            .engine
            .enroll(&args.into())
            .await
            .context("Failed to enroll lead")?;
        match enrollment {
            Some(enrollment) => self.render(&CreateResult::new(enrollment).to_string()),
            None => self.render("Lead is already enrolled in this sequence.\n"),
        }
    }

    /// Run one scheduler pass over due enrollments.
    pub async fn run(&self, args: RunArgs) -> Result<()> {
        let report = self
            .engine
            .run_due(&args.into())
            .await
            .context("Scheduler pass failed")?;
        self.render(&report.to_string())
    }

    /// Run one inactivity sweep.
    pub async fn sweep(&self) -> Result<()> {
        let created = self
            .engine
            .sweep_inactive()
            .await
            .context("Inactivity sweep failed")?;
        if created.is_empty() {
            self.render("No leads crossed an inactivity threshold.\n")
        } else {
            let mut out = format!("Enrolled {} lead(s):\n\n", created.len());
            for enrollment in created {
                out.push_str(&enrollment.to_string());
                out.push('\n');
            }
            self.render(&out)
        }
    }

    /// Show automation log entries.
    pub async fn logs(&self, args: LogsArgs) -> Result<()> {
        let entries = self
            .engine
            .list_logs(&args.into())
            .await
            .context("Failed to list log entries")?;
        self.render(&format!("# Automation Log\n\n{}", LogEntries(entries)))
    }
}
