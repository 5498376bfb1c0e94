// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Catalog and protocol TOML parsing

use crate::catalog::{ActionSpec, Capability, Catalog, ParamSpec};
use crate::types::{RawCatalog, RawInstant, RawParam, RawStep, RawTrigger, RawTriggerTable};
use labq_core::{Event, IdGen, Item, Job, StructuralError, Timestamp, Trigger, UuidIdGen};
use thiserror::Error;

/// Errors that can occur while parsing catalog or protocol files
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid job structure: {0}")]
    Structure(#[from] StructuralError),
}

/// Parse a capability catalog from TOML content
///
/// ```toml
/// [resource.pump.action.pump]
/// [[resource.pump.action.pump.param]]
/// name = "flow_rate"
/// type = "float"
/// min = 0.0
/// max = 10.0
/// ```
pub fn parse_catalog(content: &str) -> Result<Catalog, ParseError> {
    let raw: RawCatalog = toml::from_str(content)?;

    let mut catalog = Catalog::new();
    for (resource, raw_resource) in raw.resource {
        let mut capability = Capability::new();
        for (action, raw_action) in raw_resource.action {
            let mut spec = ActionSpec::new(action.as_str());
            for raw_param in raw_action.param {
                let path = format!(
                    "resource.{}.action.{}.param.{}",
                    resource, action, raw_param.name
                );
                if spec.param(&raw_param.name).is_some() {
                    return Err(ParseError::InvalidFormat(format!(
                        "{}: declared twice",
                        path
                    )));
                }
                spec = spec.with_param(parse_param(raw_param, &path)?);
            }
            capability.insert(spec);
        }
        catalog.insert(resource, capability);
    }
    Ok(catalog)
}

fn parse_param(raw: RawParam, path: &str) -> Result<ParamSpec, ParseError> {
    let invalid = |msg: &str| ParseError::InvalidFormat(format!("{}: {}", path, msg));

    let mut spec = ParamSpec::new(raw.name).with_types(raw.types.into_vec());
    spec.required = raw.required;

    match (raw.min, raw.max, raw.options) {
        (None, None, None) => {
            if raw.step.is_some() {
                return Err(invalid("step requires min and max"));
            }
        }
        (Some(min), Some(max), None) => {
            if min > max {
                return Err(invalid("min is greater than max"));
            }
            if raw.step.is_some_and(|step| step <= 0.0) {
                return Err(invalid("step must be positive"));
            }
            spec = spec.with_range(min, max, raw.step);
        }
        (None, None, Some(options)) => {
            if raw.step.is_some() {
                return Err(invalid("step cannot be combined with options"));
            }
            if options.is_empty() {
                return Err(invalid("options must not be empty"));
            }
            spec = spec.with_options(options);
        }
        (_, _, Some(_)) => return Err(invalid("options cannot be combined with min/max")),
        _ => return Err(invalid("min and max must be given together")),
    }
    Ok(spec)
}

/// Parse a protocol file into a job tree with freshly generated ids
pub fn parse_protocol(content: &str) -> Result<Job, ParseError> {
    parse_protocol_with(content, &UuidIdGen)
}

/// Parse a protocol file, drawing node ids from `id_gen`
///
/// ```toml
/// name = "prime"
/// mode = "sequence"
///
/// [[step]]
/// resource = "pump"
/// action = "pump"
/// duration = "10s"
/// args = { flow_rate = 1.0 }
/// ```
pub fn parse_protocol_with(content: &str, id_gen: &impl IdGen) -> Result<Job, ParseError> {
    let raw: RawStep = toml::from_str(content)?;
    if raw.resource.is_some() {
        return Err(ParseError::InvalidFormat(
            "protocol root must be a job, not an event".to_string(),
        ));
    }
    let name = raw
        .name
        .clone()
        .ok_or_else(|| ParseError::MissingField("name".to_string()))?;
    build_job(raw, name, "", id_gen)
}

fn build_item(raw: RawStep, at: &str, id_gen: &impl IdGen) -> Result<Item, ParseError> {
    if raw.resource.is_some() {
        return build_event(raw, at, id_gen).map(Item::from);
    }
    let name = raw.name.clone().unwrap_or_else(|| at.to_string());
    build_job(raw, name, at, id_gen).map(Item::from)
}

fn build_job(
    raw: RawStep,
    name: String,
    at: &str,
    id_gen: &impl IdGen,
) -> Result<Job, ParseError> {
    if let Some(field) = event_field(&raw) {
        return Err(ParseError::InvalidFormat(format!(
            "{}: '{}' requires 'resource'",
            location(at),
            field
        )));
    }

    let prefix = if at.is_empty() {
        "step".to_string()
    } else {
        format!("{}.step", at)
    };

    let items = raw
        .step
        .into_iter()
        .enumerate()
        .map(|(i, step)| build_item(step, &format!("{}[{}]", prefix, i), id_gen))
        .collect::<Result<Vec<_>, _>>()?;

    let mut job = Job::new_in(id_gen, raw.mode.unwrap_or_default(), name)
        .with_delay(raw.delay.unwrap_or_default());
    job.extend(items)?;
    Ok(job)
}

fn build_event(raw: RawStep, at: &str, id_gen: &impl IdGen) -> Result<Event, ParseError> {
    if let Some(field) = job_field(&raw) {
        return Err(ParseError::InvalidFormat(format!(
            "{}: '{}' is not allowed on an event step",
            at, field
        )));
    }

    let resource = raw
        .resource
        .ok_or_else(|| ParseError::MissingField(format!("{}.resource", at)))?;
    let action = raw
        .action
        .ok_or_else(|| ParseError::MissingField(format!("{}.action", at)))?;

    let mut event = Event::new_in(id_gen, resource, action)
        .with_args(raw.args)
        .with_priority(raw.priority);
    if let Some(duration) = raw.duration {
        event = event.with_duration(duration);
    }
    if let Some(trigger) = raw.trigger {
        event = event.with_trigger(parse_trigger(trigger, &format!("{}.trigger", at))?);
    }
    if let Some(signal) = raw.signal {
        event = event.with_completion_signal(signal);
    }
    Ok(event)
}

fn parse_trigger(raw: RawTrigger, at: &str) -> Result<Trigger, ParseError> {
    match raw {
        RawTrigger::Keyword(word) if word == "now" => Ok(Trigger::Now),
        RawTrigger::Keyword(word) => Err(ParseError::InvalidFormat(format!(
            "{}: unknown trigger '{}'",
            at, word
        ))),
        RawTrigger::Table(table) => parse_trigger_table(table, at),
    }
}

fn parse_trigger_table(table: RawTriggerTable, at: &str) -> Result<Trigger, ParseError> {
    let keys = [
        table.after.is_some(),
        table.at.is_some(),
        table.signal.is_some(),
        table.all.is_some(),
        table.any.is_some(),
    ];
    if keys.iter().filter(|set| **set).count() != 1 {
        return Err(ParseError::InvalidFormat(format!(
            "{}: expected exactly one of after, at, signal, all, any",
            at
        )));
    }

    let children = |list: Vec<RawTrigger>, key: &str| {
        list.into_iter()
            .enumerate()
            .map(|(i, t)| parse_trigger(t, &format!("{}.{}[{}]", at, key, i)))
            .collect::<Result<Vec<_>, _>>()
    };

    if let Some(offset) = table.after {
        Ok(Trigger::after(offset))
    } else if let Some(instant) = table.at {
        Ok(Trigger::at(parse_instant(instant, at)?))
    } else if let Some(token) = table.signal {
        Ok(Trigger::signal(token))
    } else if let Some(all) = table.all {
        Ok(Trigger::And(children(all, "all")?))
    } else if let Some(any) = table.any {
        Ok(Trigger::Or(children(any, "any")?))
    } else {
        Err(ParseError::InvalidFormat(format!("{}: empty trigger", at)))
    }
}

/// Instants need an explicit offset; local TOML datetimes are rejected
fn parse_instant(raw: RawInstant, at: &str) -> Result<Timestamp, ParseError> {
    let text = raw.into_text();
    text.parse::<Timestamp>().map_err(|e| {
        ParseError::InvalidFormat(format!("{}.at: '{}' is not an instant: {}", at, text, e))
    })
}

fn event_field(raw: &RawStep) -> Option<&'static str> {
    if raw.action.is_some() {
        Some("action")
    } else if !raw.args.is_empty() {
        Some("args")
    } else if raw.duration.is_some() {
        Some("duration")
    } else if raw.trigger.is_some() {
        Some("trigger")
    } else if raw.signal.is_some() {
        Some("signal")
    } else if raw.priority != 0 {
        Some("priority")
    } else {
        None
    }
}

fn job_field(raw: &RawStep) -> Option<&'static str> {
    if raw.name.is_some() {
        Some("name")
    } else if raw.mode.is_some() {
        Some("mode")
    } else if raw.delay.is_some() {
        Some("delay")
    } else if !raw.step.is_empty() {
        Some("step")
    } else {
        None
    }
}

fn location(at: &str) -> &str {
    if at.is_empty() {
        "protocol"
    } else {
        at
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
