// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! labq - laboratory protocol scheduler CLI

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{catalog, schedule, submit, timeline, validate};
use labq_engine::EngineConfig;
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "labq",
    version,
    about = "labq - schedule and validate laboratory protocols"
)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a protocol against a capability catalog
    Validate(validate::ValidateArgs),
    /// Validate protocols and queue the valid ones
    Submit(submit::SubmitArgs),
    /// Show the per-resource schedule of a protocol
    Schedule(schedule::ScheduleArgs),
    /// Show the per-resource timeline of a protocol
    Timeline(timeline::TimelineArgs),
    /// List the resources and actions in a catalog
    Catalog(catalog::CatalogArgs),
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Validate(args) => validate::handle(args, &config, cli.format),
        Commands::Submit(args) => submit::handle(args, &config, cli.format),
        Commands::Schedule(args) => schedule::handle(args, &config, cli.format),
        Commands::Timeline(args) => timeline::handle(args, &config, cli.format),
        Commands::Catalog(args) => catalog::handle(args, cli.format),
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
