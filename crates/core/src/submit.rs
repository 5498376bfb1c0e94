// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outcome of validating and submitting a job

use crate::clock::Timestamp;
use crate::error::SubmitError;
use crate::id::JobId;
use serde::{Serialize, Serializer};

/// Accumulated outcome of a validation or submission attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSubmitResult {
    pub job_id: JobId,
    pub success: bool,
    pub validation_success: bool,
    pub time_start: Option<Timestamp>,
    pub position_in_queue: Option<usize>,
    pub length_of_queue: Option<usize>,
    #[serde(serialize_with = "errors_as_messages")]
    pub errors: Vec<SubmitError>,
}

impl JobSubmitResult {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            success: false,
            validation_success: false,
            time_start: None,
            position_in_queue: None,
            length_of_queue: None,
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, error: impl Into<SubmitError>) {
        self.errors.push(error.into());
    }

    /// Set `validation_success` from the accumulated errors
    pub fn finish_validation(&mut self) -> bool {
        self.validation_success = self.errors.is_empty();
        self.validation_success
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &SubmitError> {
        self.errors.iter().filter(|e| e.is_conflict())
    }
}

impl std::fmt::Display for JobSubmitResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.success {
            "accepted"
        } else if self.validation_success {
            "valid"
        } else {
            "invalid"
        };
        write!(f, "Job {}: {}", self.job_id, status)?;
        if let Some(start) = self.time_start {
            write!(f, " (start {})", start.to_rfc3339())?;
        }
        if let (Some(pos), Some(len)) = (self.position_in_queue, self.length_of_queue) {
            write!(f, " [queue {}/{}]", pos + 1, len)?;
        }
        for (i, error) in self.errors.iter().enumerate() {
            write!(f, "\n  {}: {}", i + 1, error)?;
        }
        Ok(())
    }
}

fn errors_as_messages<S: Serializer>(errors: &[SubmitError], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(errors.iter().map(ToString::to_string))
}
