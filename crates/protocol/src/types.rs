// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw TOML shapes, before conversion into catalog and job types

use labq_core::{ArgKind, ArgValue, Args, Mode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawCatalog {
    pub resource: BTreeMap<String, RawResource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawResource {
    pub action: BTreeMap<String, RawAction>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawAction {
    pub param: Vec<RawParam>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawParam {
    pub name: String,
    #[serde(rename = "type", default)]
    pub types: RawTypes,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub options: Option<Vec<ArgValue>>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

/// `type = "float"` or `type = ["int", "float"]`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTypes {
    One(ArgKind),
    Many(Vec<ArgKind>),
}

impl Default for RawTypes {
    fn default() -> Self {
        RawTypes::Many(Vec::new())
    }
}

impl RawTypes {
    pub fn into_vec(self) -> Vec<ArgKind> {
        match self {
            RawTypes::One(kind) => vec![kind],
            RawTypes::Many(kinds) => kinds,
        }
    }
}

/// A protocol step: an event when `resource` is set, a nested job otherwise.
/// The protocol root uses the same shape.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RawStep {
    // event fields
    pub resource: Option<String>,
    pub action: Option<String>,
    pub args: Args,
    #[serde(with = "humantime_serde", default)]
    pub duration: Option<Duration>,
    pub trigger: Option<RawTrigger>,
    pub priority: i32,
    pub signal: Option<String>,

    // job fields
    pub name: Option<String>,
    pub mode: Option<Mode>,
    #[serde(with = "humantime_serde", default)]
    pub delay: Option<Duration>,
    pub step: Vec<RawStep>,
}

/// `trigger = "now"` or a single-key table
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawTrigger {
    Keyword(String),
    Table(RawTriggerTable),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct RawTriggerTable {
    #[serde(with = "humantime_serde", default)]
    pub after: Option<Duration>,
    pub at: Option<RawInstant>,
    pub signal: Option<String>,
    pub all: Option<Vec<RawTrigger>>,
    pub any: Option<Vec<RawTrigger>>,
}

/// `at = 2030-01-01T09:00:00Z` or the quoted `at = "2030-01-01T09:00:00Z"`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawInstant {
    Native(toml::value::Datetime),
    Text(String),
}

impl RawInstant {
    pub fn into_text(self) -> String {
        match self {
            RawInstant::Native(datetime) => datetime.to_string(),
            RawInstant::Text(text) => text,
        }
    }
}
