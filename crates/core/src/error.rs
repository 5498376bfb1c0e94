// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for job construction, time resolution, and validation
//!
//! Structural and time errors are fatal and returned immediately.
//! Validation and conflict errors are accumulated into a
//! [`JobSubmitResult`](crate::JobSubmitResult) so every problem with a
//! protocol can be reported at once.

use crate::args::{ArgKind, ArgValue};
use crate::clock::Timestamp;
use crate::id::{EventId, NodeId, ResourceId};
use thiserror::Error;

/// Errors raised while building or re-timing a job tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("{id} already exists in job '{job}'")]
    DuplicateIdentity { id: NodeId, job: String },
    #[error("job '{job}' has an explicit start time and cannot be nested")]
    StartOnNonRoot { job: String },
    #[error("start time {at} is before now ({now})")]
    StartInPast { at: Timestamp, now: Timestamp },
    #[error("{0} not found in tree")]
    UnknownNode(NodeId),
}

/// Errors raised when reading times that cannot be resolved yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("time of {node} is unresolved: root start time is not set")]
    Unresolved { node: NodeId },
}

/// What is wrong with a supplied argument value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgProblem {
    #[error("expected {}, got {found}", kinds(.expected))]
    WrongType { expected: Vec<ArgKind>, found: ArgKind },
    #[error("{value} is outside [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
    #[error("{value} is not a multiple of step {step} from {min}")]
    OffStep { value: f64, min: f64, step: f64 },
    #[error("{value} is not one of [{}]", values(.options))]
    NotAnOption {
        value: ArgValue,
        options: Vec<ArgValue>,
    },
}

fn kinds(kinds: &[ArgKind]) -> String {
    kinds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" or ")
}

fn values(values: &[ArgValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// A capability violation found while checking a schedule against the catalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown resource '{resource}' ({events} event(s) skipped)")]
    UnknownResource { resource: ResourceId, events: usize },
    #[error("resource '{resource}' has no action '{action}' (event {event})")]
    UnknownAction {
        resource: ResourceId,
        action: String,
        event: EventId,
    },
    #[error("action '{action}' on '{resource}' has no parameter '{param}'")]
    UnknownParam {
        resource: ResourceId,
        action: String,
        param: String,
    },
    #[error("invalid argument '{param}' for '{resource}.{action}': {problem}")]
    InvalidArgument {
        resource: ResourceId,
        action: String,
        param: String,
        problem: ArgProblem,
    },
    #[error("'{resource}.{action}' is missing required parameter(s): {}", .params.join(", "))]
    MissingParams {
        resource: ResourceId,
        action: String,
        event: EventId,
        params: Vec<String>,
    },
}

/// One side of a temporal conflict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSide {
    pub job: String,
    pub index: usize,
    pub event: EventId,
    pub start: Timestamp,
    pub end: Timestamp,
}

impl std::fmt::Display for ConflictSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "event #{} of job '{}' [{}, {})",
            self.index,
            self.job,
            self.start.format("%H:%M:%S%.3f"),
            self.end.format("%H:%M:%S%.3f")
        )
    }
}

/// Two events on one resource whose time windows overlap
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("conflict on '{resource}': {first} overlaps {second}")]
pub struct ConflictError {
    pub resource: ResourceId,
    pub first: ConflictSide,
    pub second: ConflictSide,
}

/// Any recoverable problem accumulated into a submission result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    #[error("submission rejected: {reason}")]
    Rejected { reason: String },
}

impl SubmitError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, SubmitError::Conflict(_))
    }
}
