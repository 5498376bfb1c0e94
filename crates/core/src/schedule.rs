// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-resource flattening of job trees
//!
//! A schedule snapshots a job tree into one ordered event list per resource.
//! The order within a resource is the order events were discovered by a
//! depth-first walk of the tree, and is the order an executor must honor.

use crate::event::Event;
use crate::id::{IdGen, JobId, NodeId, ResourceId, ScheduleId, UuidIdGen};
use crate::job::Job;

/// A resource and the events assigned to it, in execution order
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    id: ResourceId,
    events: Vec<Event>,
}

impl Resource {
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Source jobs flattened into per-resource event lists
#[derive(Debug, Clone)]
pub struct Schedule {
    id: ScheduleId,
    jobs: Vec<Job>,
    resources: Vec<Resource>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::new_in(&UuidIdGen)
    }

    pub fn new_in(id_gen: &impl IdGen) -> Self {
        Self {
            id: ScheduleId::generate(id_gen),
            jobs: Vec::new(),
            resources: Vec::new(),
        }
    }

    /// Build a fresh schedule from a single job tree
    pub fn from_job(job: &Job) -> Self {
        let mut schedule = Self::new();
        schedule.add_job(job);
        schedule
    }

    /// Flatten a job into this schedule.
    ///
    /// Events are copied with their resolved windows when the job has a root
    /// start; the source tree is never modified.
    pub fn add_job(&mut self, job: &Job) {
        let timings = job.timings().ok();
        for event in job.events() {
            let mut event = event.clone();
            if let Some(span) = timings
                .as_ref()
                .and_then(|t| t.get(&NodeId::Event(event.id().clone())))
            {
                event.set_times(span.start, span.end);
            }
            self.bucket(event.resource().clone()).events.push(event);
        }
        self.jobs.push(job.clone());
    }

    fn bucket(&mut self, id: ResourceId) -> &mut Resource {
        let pos = match self.resources.iter().position(|r| r.id == id) {
            Some(pos) => pos,
            None => {
                self.resources.push(Resource::new(id));
                self.resources.len() - 1
            }
        };
        &mut self.resources[pos]
    }

    pub fn id(&self) -> &ScheduleId {
        &self.id
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Resources in the order they were first referenced
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn get_resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id.as_str() == name)
    }

    pub fn resources_labels(&self) -> Vec<&str> {
        self.resources.iter().map(|r| r.id.as_str()).collect()
    }

    /// Name of any job node in the source trees
    pub fn job_name(&self, id: &JobId) -> Option<&str> {
        self.jobs.iter().find_map(|job| job.job_name(id))
    }

    /// Total number of scheduled events
    pub fn len(&self) -> usize {
        self.resources.iter().map(Resource::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
