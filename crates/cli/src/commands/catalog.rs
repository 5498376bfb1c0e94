// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `labq catalog <file>` - List resources, actions and parameters

use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Args;
use labq_protocol::{load_catalog_file, Catalog, ParamRange, ParamSpec};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Args)]
pub struct CatalogArgs {
    /// Capability catalog (TOML)
    pub catalog: PathBuf,
}

#[derive(Serialize)]
struct ResourceInfo {
    resource: String,
    actions: Vec<ActionInfo>,
}

#[derive(Serialize)]
struct ActionInfo {
    name: String,
    params: Vec<ParamInfo>,
}

#[derive(Serialize)]
struct ParamInfo {
    name: String,
    types: Vec<String>,
    range: Option<String>,
    required: bool,
}

impl ParamInfo {
    fn new(spec: &ParamSpec) -> Self {
        let range = spec.range.as_ref().map(|range| match range {
            ParamRange::Numeric {
                min,
                max,
                step: Some(step),
            } => format!("{}..={} step {}", min, max, step),
            ParamRange::Numeric { min, max, .. } => format!("{}..={}", min, max),
            ParamRange::Options(options) => options
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | "),
        });
        Self {
            name: spec.name.clone(),
            types: spec.types.iter().map(ToString::to_string).collect(),
            range,
            required: spec.required,
        }
    }
}

fn resources(catalog: &Catalog) -> Vec<ResourceInfo> {
    catalog
        .resource_ids()
        .into_iter()
        .filter_map(|id| {
            let capability = catalog.resource(id.as_str())?;
            let actions = capability
                .action_names()
                .into_iter()
                .filter_map(|name| capability.action(name))
                .map(|action| ActionInfo {
                    name: action.name.clone(),
                    params: action.params.iter().map(ParamInfo::new).collect(),
                })
                .collect();
            Some(ResourceInfo {
                resource: id.to_string(),
                actions,
            })
        })
        .collect()
}

impl fmt::Display for ResourceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for action in &self.actions {
            let params: Vec<String> = action.params.iter().map(ToString::to_string).collect();
            write!(f, "\n  {}({})", action.name, params.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for ParamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.required {
            write!(f, "?")?;
        }
        if !self.types.is_empty() {
            write!(f, ": {}", self.types.join(" | "))?;
        }
        if let Some(range) = &self.range {
            write!(f, " [{}]", range)?;
        }
        Ok(())
    }
}

pub fn handle(args: CatalogArgs, format: OutputFormat) -> Result<()> {
    let catalog = load_catalog_file(&args.catalog)?;
    output::print_list(&resources(&catalog), format)?;
    Ok(())
}
