use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{EnrollArgs, LeadCommands, LogsArgs, RunArgs, SequenceCommands, StepCommands};

/// Main command-line interface for the cadence automation tool
///
/// Cadence tracks sales leads through a pipeline and automates their
/// follow-up with sequences of timed steps (delays, emails, WhatsApp
/// messages, tasks). A periodic caller invokes `cadence run` to drive due
/// enrollments one step forward; everything else is operator tooling for
/// leads, sequences, and the automation audit trail.
#[derive(Parser)]
#[command(version, about, name = "cadence")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/cadence/cadence.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the cadence CLI
///
/// The CLI is organized into command categories:
/// - `lead`: Manage leads in the pipeline (create, list, update, etc.)
/// - `sequence`: Manage follow-up sequences and their triggers
/// - `step`: Manage the ordered steps within a sequence
/// - `enroll`: Manually enroll a lead into a sequence
/// - `run`: One scheduler pass over due enrollments (cron entry point)
/// - `sweep`: One pass of the inactivity triggers
/// - `logs`: Inspect the automation audit trail
#[derive(Subcommand)]
pub enum Commands {
    /// Manage leads
    #[command(alias = "l")]
    Lead {
        #[command(subcommand)]
        command: LeadCommands,
    },
    /// Manage follow-up sequences
    #[command(alias = "seq")]
    Sequence {
        #[command(subcommand)]
        command: SequenceCommands,
    },
    /// Manage steps within sequences
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
    /// Enroll a lead into a sequence
    Enroll(EnrollArgs),
    /// Process due enrollments (invoked by the periodic scheduler)
    Run(RunArgs),
    /// Enroll leads that crossed an inactivity threshold
    Sweep,
    /// Show automation log entries
    Logs(LogsArgs),
}
