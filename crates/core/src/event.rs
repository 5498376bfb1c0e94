// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic hardware actions

use crate::args::{ArgValue, Args};
use crate::clock::Timestamp;
use crate::error::TimeError;
use crate::id::{EventId, IdGen, JobId, ResourceId, SignalToken, UuidIdGen};
use crate::trigger::Trigger;
use serde::Serialize;
use std::time::Duration;

/// One action against one resource
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    id: EventId,
    resource: ResourceId,
    action: String,
    args: Args,
    trigger: Trigger,
    priority: i32,
    completion_signal: Option<SignalToken>,
    estimated_duration: Option<Duration>,
    parent: Option<JobId>,
    time_start: Option<Timestamp>,
    time_end: Option<Timestamp>,
    completed: bool,
}

/// What the dispatch layer should invoke for an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dispatch {
    pub event: EventId,
    pub resource: ResourceId,
    pub action: String,
    pub args: Args,
}

impl Event {
    /// Create an event with a freshly generated id
    pub fn new(resource: impl Into<ResourceId>, action: impl Into<String>) -> Self {
        Self::with_id(EventId::generate(&UuidIdGen), resource, action)
    }

    /// Create an event with an id drawn from `id_gen`
    pub fn new_in(
        id_gen: &impl IdGen,
        resource: impl Into<ResourceId>,
        action: impl Into<String>,
    ) -> Self {
        Self::with_id(EventId::generate(id_gen), resource, action)
    }

    pub fn with_id(
        id: EventId,
        resource: impl Into<ResourceId>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id,
            resource: resource.into(),
            action: action.into(),
            args: Args::new(),
            trigger: Trigger::Now,
            priority: 0,
            completion_signal: None,
            estimated_duration: None,
            parent: None,
            time_start: None,
            time_end: None,
            completed: false,
        }
    }

    pub fn with_args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_completion_signal(mut self, token: impl Into<SignalToken>) -> Self {
        self.completion_signal = Some(token.into());
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.estimated_duration = Some(duration);
        self
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    pub fn resource(&self) -> &ResourceId {
        &self.resource
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn completion_signal(&self) -> Option<&SignalToken> {
        self.completion_signal.as_ref()
    }

    pub fn estimated_duration(&self) -> Option<Duration> {
        self.estimated_duration
    }

    /// Projected run time; zero when no estimate was given
    pub fn duration(&self) -> Duration {
        self.estimated_duration.unwrap_or(Duration::ZERO)
    }

    /// Owning job, once the event has been added to a tree
    pub fn parent(&self) -> Option<&JobId> {
        self.parent.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Resolved start time
    pub fn time_start(&self) -> Result<Timestamp, TimeError> {
        self.time_start.ok_or_else(|| self.unresolved())
    }

    /// Resolved end time
    pub fn time_end(&self) -> Result<Timestamp, TimeError> {
        self.time_end.ok_or_else(|| self.unresolved())
    }

    pub fn is_resolved(&self) -> bool {
        self.time_start.is_some() && self.time_end.is_some()
    }

    /// Describe the call the dispatch layer would make for this event
    pub fn run(&self) -> Dispatch {
        Dispatch {
            event: self.id.clone(),
            resource: self.resource.clone(),
            action: self.action.clone(),
            args: self.args.clone(),
        }
    }

    fn unresolved(&self) -> TimeError {
        TimeError::Unresolved {
            node: self.id.clone().into(),
        }
    }

    pub(crate) fn set_parent(&mut self, parent: JobId) {
        self.parent = Some(parent);
    }

    pub(crate) fn set_times(&mut self, start: Timestamp, end: Timestamp) {
        self.time_start = Some(start);
        self.time_end = Some(end);
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }

    pub(crate) fn trigger_mut(&mut self) -> &mut Trigger {
        &mut self.trigger
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
