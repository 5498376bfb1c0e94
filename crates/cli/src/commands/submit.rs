// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `labq submit <protocol>... --catalog <file>`

use super::load_started;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use labq_core::SystemClock;
use labq_engine::{EngineConfig, MemoryQueue, Submitter};
use labq_protocol::load_catalog_file;
use std::path::PathBuf;

#[derive(Args)]
pub struct SubmitArgs {
    /// Protocol files, submitted in order
    #[arg(required = true)]
    pub protocols: Vec<PathBuf>,

    /// Capability catalog (TOML)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Root start time for every protocol (RFC 3339)
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,
}

pub fn handle(args: SubmitArgs, config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let catalog = load_catalog_file(&args.catalog)?;
    let queue = config
        .queue_capacity
        .map_or_else(MemoryQueue::new, MemoryQueue::with_capacity);
    let mut submitter = Submitter::from_config(&catalog, config, queue, SystemClock);

    let mut results = Vec::with_capacity(args.protocols.len());
    for path in &args.protocols {
        let job = load_started(path, args.start, config)?;
        results.push(submitter.submit(job)?);
    }
    output::print_list(&results, format)?;

    let refused = results.iter().filter(|r| !r.success).count();
    if refused > 0 {
        bail!("{} of {} job(s) not queued", refused, results.len());
    }
    Ok(())
}
