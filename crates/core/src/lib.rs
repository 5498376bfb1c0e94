// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! labq-core: Job and trigger model for laboratory protocol scheduling
//!
//! This crate provides:
//! - Triggers gating when an action may run
//! - Events (atomic actions) composed into sequential and concurrent job trees
//! - Time resolution over job trees
//! - Per-resource schedules and their timeline projection
//! - The error taxonomy and submission result shared by validation

pub mod args;
pub mod clock;
pub mod error;
pub mod id;

pub mod event;
pub mod job;
pub mod schedule;
pub mod submit;
pub mod timeline;
pub mod trigger;

pub use args::{ArgKind, ArgValue, Args};
pub use clock::{Clock, FakeClock, SystemClock, Timestamp};
pub use error::{
    ArgProblem, ConflictError, ConflictSide, StructuralError, SubmitError, TimeError,
    ValidationError,
};
pub use event::{Dispatch, Event};
pub use id::{
    EventId, IdGen, JobId, NodeId, ResourceId, ScheduleId, SequentialIdGen, SignalToken,
    UuidIdGen,
};
pub use job::{Item, Job, Mode, NodeRef, Span};
pub use schedule::{Resource, Schedule};
pub use submit::JobSubmitResult;
pub use timeline::{timeline, Lane, TimeBlock};
pub use trigger::{SignalBoard, Trigger};
