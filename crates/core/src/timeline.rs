// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Visual projection of a schedule into per-resource time blocks.
//!
//! The projection is lossy and one-way; it cannot rebuild a schedule.

use crate::clock::Timestamp;
use crate::event::Event;
use crate::schedule::Schedule;
use serde::Serialize;

/// One block on a resource lane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBlock {
    pub start: Option<Timestamp>,
    /// `None` when the block is open-ended
    pub end: Option<Timestamp>,
    pub label: String,
    pub hover: String,
}

/// All blocks for one resource
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lane {
    pub resource: String,
    pub blocks: Vec<TimeBlock>,
}

pub fn timeline(schedule: &Schedule) -> Vec<Lane> {
    schedule
        .resources()
        .iter()
        .map(|resource| Lane {
            resource: resource.id().to_string(),
            blocks: resource
                .events()
                .iter()
                .map(|event| block(schedule, event))
                .collect(),
        })
        .collect()
}

fn block(schedule: &Schedule, event: &Event) -> TimeBlock {
    // Without an estimate the block stays open until the device reports back
    let open = event.estimated_duration().is_none() && !event.is_completed();
    let job = event
        .parent()
        .and_then(|id| schedule.job_name(id))
        .unwrap_or("-");

    let mut hover = format!("job: {}", job);
    for (name, value) in event.args() {
        hover.push_str(&format!("\n{} = {}", name, value));
    }

    TimeBlock {
        start: event.time_start().ok(),
        end: if open { None } else { event.time_end().ok() },
        label: event.action().to_string(),
        hover,
    }
}
