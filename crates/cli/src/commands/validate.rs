// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `labq validate <protocol> --catalog <file>`

use super::ProtocolArgs;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use clap::Args;
use labq_engine::{EngineConfig, Validator};
use labq_protocol::load_catalog_file;
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub protocol: ProtocolArgs,

    /// Capability catalog (TOML)
    #[arg(long)]
    pub catalog: PathBuf,
}

pub fn handle(args: ValidateArgs, config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let catalog = load_catalog_file(&args.catalog)?;
    let job = args.protocol.load(config)?;

    let result = Validator::new(&catalog)
        .with_conflict_window(config.conflict_window)
        .validate(&job)?;
    output::print(&result, format)?;

    if !result.validation_success {
        bail!("{} problem(s) found in {}", result.errors.len(), job.name());
    }
    Ok(())
}
