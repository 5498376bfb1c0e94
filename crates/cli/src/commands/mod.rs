// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod catalog;
pub mod schedule;
pub mod submit;
pub mod timeline;
pub mod validate;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use labq_core::clock::shift;
use labq_core::{Clock, Job, SystemClock};
use labq_engine::EngineConfig;
use labq_protocol::load_protocol_file;
use std::path::{Path, PathBuf};

/// A protocol file and when to start it
#[derive(Args)]
pub struct ProtocolArgs {
    /// Protocol file (TOML)
    pub protocol: PathBuf,

    /// Root start time (RFC 3339); defaults to now plus the configured lead
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,
}

impl ProtocolArgs {
    pub fn load(&self, config: &EngineConfig) -> Result<Job> {
        load_started(&self.protocol, self.start, config)
    }
}

/// Load a protocol and assign its root start
pub fn load_started(
    path: &Path,
    start: Option<DateTime<Utc>>,
    config: &EngineConfig,
) -> Result<Job> {
    let mut job = load_protocol_file(path)?;
    let clock = SystemClock;
    let start = start.unwrap_or_else(|| shift(clock.now(), config.default_lead));
    job.set_time_start_within(start, &clock, config.start_tolerance)
        .with_context(|| format!("cannot start {}", path.display()))?;
    tracing::debug!(path = %path.display(), job = job.name(), %start, "loaded protocol");
    Ok(job)
}
