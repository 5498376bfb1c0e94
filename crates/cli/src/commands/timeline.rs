// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `labq timeline <protocol>` - Per-resource time blocks

use super::ProtocolArgs;
use crate::output::{self, clock_time, OutputFormat};
use anyhow::Result;
use clap::Args;
use labq_core::{timeline, Lane, Schedule};
use labq_engine::EngineConfig;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct TimelineArgs {
    #[command(flatten)]
    pub protocol: ProtocolArgs,
}

#[derive(Serialize)]
#[serde(transparent)]
struct TimelineView(Vec<Lane>);

impl fmt::Display for TimelineView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lane) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", lane.resource)?;
            for block in &lane.blocks {
                let end = match block.end {
                    Some(_) => clock_time(block.end),
                    None => "...".to_string(),
                };
                write!(
                    f,
                    "\n  [{}, {}) {}",
                    clock_time(block.start),
                    end,
                    block.label
                )?;
            }
        }
        Ok(())
    }
}

pub fn handle(args: TimelineArgs, config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let job = args.protocol.load(config)?;
    let lanes = timeline(&Schedule::from_job(&job));
    output::print(&TimelineView(lanes), format)?;
    Ok(())
}
