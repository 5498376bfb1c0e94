// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job submission: resolve, validate, then hand off to a sink

use crate::config::EngineConfig;
use crate::validator::Validator;
use labq_core::clock::shift;
use labq_core::{
    Clock, Job, JobSubmitResult, StructuralError, SubmitError, TimeError, Timestamp,
};
use labq_protocol::Catalog;
use std::time::Duration;
use thiserror::Error;

/// Acknowledgment returned by a sink for an accepted job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack {
    pub position_in_queue: usize,
    pub length_of_queue: usize,
}

/// Reasons a sink refuses a job
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    #[error("queue is full ({capacity} jobs)")]
    Full { capacity: usize },
    #[error("{0}")]
    Rejected(String),
}

/// Destination for validated jobs
pub trait SubmitSink {
    fn submit(&mut self, job: Job, start: Timestamp) -> Result<Ack, SinkError>;
}

/// Fatal errors that stop a submission before a result exists
#[derive(Debug, Error)]
pub enum SubmitterError {
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error(transparent)]
    Structure(#[from] StructuralError),
}

/// A job waiting in a [`MemoryQueue`]
#[derive(Debug, Clone)]
pub struct QueuedJob {
    pub job: Job,
    pub start: Timestamp,
}

/// In-process sink ordering jobs by start time
#[derive(Debug, Clone, Default)]
pub struct MemoryQueue {
    jobs: Vec<QueuedJob>,
    capacity: Option<usize>,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            jobs: Vec::new(),
            capacity: Some(capacity),
        }
    }

    pub fn jobs(&self) -> &[QueuedJob] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Remove and return the job with the earliest start
    pub fn pop(&mut self) -> Option<QueuedJob> {
        if self.jobs.is_empty() {
            None
        } else {
            Some(self.jobs.remove(0))
        }
    }
}

impl SubmitSink for MemoryQueue {
    fn submit(&mut self, job: Job, start: Timestamp) -> Result<Ack, SinkError> {
        if let Some(capacity) = self.capacity {
            if self.jobs.len() >= capacity {
                return Err(SinkError::Full { capacity });
            }
        }
        // Equal starts keep submission order
        let position = self.jobs.partition_point(|queued| queued.start <= start);
        self.jobs.insert(position, QueuedJob { job, start });
        Ok(Ack {
            position_in_queue: position,
            length_of_queue: self.jobs.len(),
        })
    }
}

/// Runs resolve, flatten, validate and submit for each job
pub struct Submitter<'a, S, C> {
    validator: Validator<'a>,
    sink: S,
    clock: C,
    start_tolerance: Duration,
}

impl<'a, S: SubmitSink, C: Clock> Submitter<'a, S, C> {
    pub fn new(validator: Validator<'a>, sink: S, clock: C) -> Self {
        Self {
            validator,
            sink,
            clock,
            start_tolerance: Duration::ZERO,
        }
    }

    pub fn from_config(catalog: &'a Catalog, config: &EngineConfig, sink: S, clock: C) -> Self {
        let validator = Validator::new(catalog).with_conflict_window(config.conflict_window);
        Self::new(validator, sink, clock).with_start_tolerance(config.start_tolerance)
    }

    pub fn with_start_tolerance(mut self, tolerance: Duration) -> Self {
        self.start_tolerance = tolerance;
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Validate `job` and, if it is valid, hand it to the sink.
    ///
    /// Validation and sink failures are recorded in the result. Only an
    /// unresolvable tree or a start that has already passed is fatal.
    pub fn submit(&mut self, mut job: Job) -> Result<JobSubmitResult, SubmitterError> {
        job.resolve_times()?;
        let start = job.time_start()?;

        let now = self.clock.now();
        if let Some(at) = job.scheduled_start() {
            if shift(at, self.start_tolerance) < now {
                return Err(StructuralError::StartInPast { at, now }.into());
            }
        }

        let mut result = self.validator.validate(&job)?;
        if !result.validation_success {
            tracing::warn!(
                job_id = %result.job_id,
                errors = result.errors.len(),
                "job failed validation"
            );
            return Ok(result);
        }

        let job_id = job.id().clone();
        match self.sink.submit(job, start) {
            Ok(ack) => {
                result.success = true;
                result.position_in_queue = Some(ack.position_in_queue);
                result.length_of_queue = Some(ack.length_of_queue);
                tracing::info!(
                    %job_id,
                    %start,
                    position = ack.position_in_queue,
                    length = ack.length_of_queue,
                    "job submitted"
                );
            }
            Err(e) => {
                tracing::warn!(%job_id, error = %e, "sink rejected job");
                result.push(SubmitError::Rejected {
                    reason: e.to_string(),
                });
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "submit_tests.rs"]
mod tests;
