// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Text and JSON rendering for command results

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn render<T: Serialize + Display>(self, value: &T) -> Result<String> {
        Ok(match self {
            OutputFormat::Text => value.to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
        })
    }

    /// Text puts one item per line; JSON emits a single array
    pub fn render_list<T: Serialize + Display>(self, items: &[T]) -> Result<String> {
        Ok(match self {
            OutputFormat::Text => items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Json => serde_json::to_string_pretty(items)?,
        })
    }
}

pub fn print<T: Serialize + Display>(value: &T, format: OutputFormat) -> Result<()> {
    println!("{}", format.render(value)?);
    Ok(())
}

pub fn print_list<T: Serialize + Display>(items: &[T], format: OutputFormat) -> Result<()> {
    let rendered = format.render_list(items)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }
    Ok(())
}

/// Wall-clock time of day with milliseconds, or `-` when unknown
pub fn clock_time(at: Option<DateTime<Utc>>) -> String {
    at.map_or_else(|| "-".to_string(), |t| t.format("%H:%M:%S%.3f").to_string())
}
