// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Schedule validation against the capability catalog.
//!
//! Two passes run over a flattened schedule and accumulate into one
//! [`JobSubmitResult`]:
//! - Capability: every event names a known resource, action and parameters
//! - Conflicts: no resource does two things at once

use labq_core::{
    ConflictError, ConflictSide, Event, Job, JobId, JobSubmitResult, Schedule, TimeError,
    Timestamp, ValidationError,
};
use labq_protocol::{ActionSpec, Catalog};

/// Number of following events each event is compared against
pub const DEFAULT_CONFLICT_WINDOW: usize = 2;

/// Checks schedules against a read-only catalog
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    catalog: &'a Catalog,
    conflict_window: usize,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            conflict_window: DEFAULT_CONFLICT_WINDOW,
        }
    }

    pub fn with_conflict_window(mut self, window: usize) -> Self {
        self.conflict_window = window;
        self
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn conflict_window(&self) -> usize {
        self.conflict_window
    }

    /// Flatten `job` and validate the resulting schedule
    pub fn validate(&self, job: &Job) -> Result<JobSubmitResult, TimeError> {
        let schedule = Schedule::from_job(job);
        let mut result = self.validate_schedule(&schedule)?;
        result.job_id = job.id().clone();
        Ok(result)
    }

    /// Run both passes over an already flattened schedule.
    ///
    /// Fails only when event times are unresolved; every other problem is
    /// recorded in the returned result.
    pub fn validate_schedule(&self, schedule: &Schedule) -> Result<JobSubmitResult, TimeError> {
        let job_id = schedule
            .jobs()
            .first()
            .map(|job| job.id().clone())
            .unwrap_or_else(|| JobId::new(schedule.id().as_str()));
        let mut result = JobSubmitResult::new(job_id);
        result.time_start = schedule
            .jobs()
            .iter()
            .filter_map(|job| job.time_start().ok())
            .min();

        let conflicts = self.validate_conflicts(schedule)?;
        for error in self.validate_capabilities(schedule) {
            result.push(error);
        }
        for conflict in conflicts {
            result.push(conflict);
        }

        let valid = result.finish_validation();
        tracing::debug!(
            schedule = %schedule.id(),
            events = schedule.len(),
            errors = result.errors.len(),
            valid,
            "validated schedule"
        );
        Ok(result)
    }

    /// Check every event's resource, action and arguments
    pub fn validate_capabilities(&self, schedule: &Schedule) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for resource in schedule.resources() {
            let Some(capability) = self.catalog.resource(resource.id().as_str()) else {
                errors.push(ValidationError::UnknownResource {
                    resource: resource.id().clone(),
                    events: resource.len(),
                });
                continue;
            };

            for event in resource.events() {
                match capability.action(event.action()) {
                    Some(action) => check_args(event, action, &mut errors),
                    None => errors.push(ValidationError::UnknownAction {
                        resource: event.resource().clone(),
                        action: event.action().to_string(),
                        event: event.id().clone(),
                    }),
                }
            }
        }
        errors
    }

    /// Compare each event with the next `conflict_window` events on its resource
    pub fn validate_conflicts(&self, schedule: &Schedule) -> Result<Vec<ConflictError>, TimeError> {
        let mut conflicts = Vec::new();
        for resource in schedule.resources() {
            let events = resource.events();
            let windows = events
                .iter()
                .map(|event| Ok((event.time_start()?, event.time_end()?)))
                .collect::<Result<Vec<(Timestamp, Timestamp)>, TimeError>>()?;

            for i in 0..events.len() {
                let last = events.len().min(i + 1 + self.conflict_window);
                for j in i + 1..last {
                    if windows[i].1 > windows[j].0 {
                        let conflict = ConflictError {
                            resource: resource.id().clone(),
                            first: side(schedule, &events[i], i, windows[i]),
                            second: side(schedule, &events[j], j, windows[j]),
                        };
                        tracing::debug!(%conflict, "resource conflict");
                        conflicts.push(conflict);
                    }
                }
            }
        }
        Ok(conflicts)
    }
}

fn check_args(event: &Event, action: &ActionSpec, errors: &mut Vec<ValidationError>) {
    for (name, value) in event.args() {
        match action.param(name) {
            None => errors.push(ValidationError::UnknownParam {
                resource: event.resource().clone(),
                action: action.name.clone(),
                param: name.clone(),
            }),
            Some(spec) => {
                if let Err(problem) = spec.check(value) {
                    errors.push(ValidationError::InvalidArgument {
                        resource: event.resource().clone(),
                        action: action.name.clone(),
                        param: name.clone(),
                        problem,
                    });
                }
            }
        }
    }

    let missing: Vec<String> = action
        .required_params()
        .filter(|param| !event.args().contains_key(&param.name))
        .map(|param| param.name.clone())
        .collect();
    if !missing.is_empty() {
        errors.push(ValidationError::MissingParams {
            resource: event.resource().clone(),
            action: action.name.clone(),
            event: event.id().clone(),
            params: missing,
        });
    }
}

fn side(
    schedule: &Schedule,
    event: &Event,
    index: usize,
    (start, end): (Timestamp, Timestamp),
) -> ConflictSide {
    let job = event
        .parent()
        .and_then(|parent| schedule.job_name(parent))
        .unwrap_or("?")
        .to_string();
    ConflictSide {
        job,
        index,
        event: event.id().clone(),
        start,
        end,
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
