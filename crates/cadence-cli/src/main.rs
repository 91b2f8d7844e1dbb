//! Cadence CLI Application
//!
//! Command-line interface for the cadence lead follow-up automation tool.
//! The `run` subcommand is the scheduler entry point a periodic caller
//! (cron or similar) invokes; the expected shared secret comes from the
//! CADENCE_RUN_SECRET environment variable.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use cadence_core::{params::ListLeads, EngineBuilder};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args { database_file, no_color, command } = Args::parse();

    let engine = EngineBuilder::new()
        .with_database_path(database_file)
        .with_run_secret(std::env::var("CADENCE_RUN_SECRET").ok())
        .build()
        .await
        .context("Failed to initialize engine")?;

    let renderer = TerminalRenderer::new(!no_color);

    info!("Cadence started");

    let cli = Cli::new(engine, renderer);
    match command {
        Some(Lead { command }) => cli.handle_lead_command(command).await,
        Some(Sequence { command }) => cli.handle_sequence_command(command).await,
        Some(Step { command }) => cli.handle_step_command(command).await,
        Some(Enroll(enroll_args)) => cli.enroll(enroll_args).await,
        Some(Run(run_args)) => cli.run(run_args).await,
        Some(Sweep) => cli.sweep().await,
        Some(Logs(logs_args)) => cli.logs(logs_args).await,
        None => cli.list_leads(&ListLeads::default()).await,
    }
}
