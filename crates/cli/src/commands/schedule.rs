// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `labq schedule <protocol>` - Per-resource event lists

use super::ProtocolArgs;
use crate::output::{self, clock_time, OutputFormat};
use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use labq_core::{Args as ActionArgs, Schedule};
use labq_engine::EngineConfig;
use serde::Serialize;
use std::fmt;

#[derive(Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub protocol: ProtocolArgs,
}

#[derive(Serialize)]
struct ScheduleView {
    id: String,
    resources: Vec<ResourceView>,
}

#[derive(Serialize)]
struct ResourceView {
    resource: String,
    events: Vec<EventView>,
}

#[derive(Serialize)]
struct EventView {
    index: usize,
    job: String,
    action: String,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    duration: String,
    args: ActionArgs,
}

impl ScheduleView {
    fn new(schedule: &Schedule) -> Self {
        let resources = schedule
            .resources()
            .iter()
            .map(|resource| ResourceView {
                resource: resource.id().to_string(),
                events: resource
                    .events()
                    .iter()
                    .enumerate()
                    .map(|(index, event)| EventView {
                        index,
                        job: event
                            .parent()
                            .and_then(|id| schedule.job_name(id))
                            .unwrap_or("-")
                            .to_string(),
                        action: event.action().to_string(),
                        start: event.time_start().ok(),
                        end: event.time_end().ok(),
                        duration: humantime::format_duration(event.duration()).to_string(),
                        args: event.args().clone(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            id: schedule.id().to_string(),
            resources,
        }
    }
}

impl fmt::Display for ScheduleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schedule {}", self.id)?;
        for resource in &self.resources {
            write!(f, "\n{}", resource.resource)?;
            for event in &resource.events {
                write!(
                    f,
                    "\n  {:<3} {} - {} {:>8}  {:<12} {:<16}",
                    event.index,
                    clock_time(event.start),
                    clock_time(event.end),
                    event.duration,
                    event.action,
                    format!("[{}]", event.job),
                )?;
                for (name, value) in &event.args {
                    write!(f, " {}={}", name, value)?;
                }
            }
        }
        Ok(())
    }
}

pub fn handle(args: ScheduleArgs, config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let job = args.protocol.load(config)?;
    let schedule = Schedule::from_job(&job);
    output::print(&ScheduleView::new(&schedule), format)?;
    Ok(())
}
