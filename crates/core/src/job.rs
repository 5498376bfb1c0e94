// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job trees: sequential and concurrent composition of events
//!
//! A [`Job`] owns its whole tree as an arena. Child links point down into the
//! arena and parent links point back up by index, so ownership only flows from
//! the root to the leaves. Adding a sub-job moves its arena into the parent,
//! which makes self-containment and double insertion impossible.
//!
//! Times are never cached on job nodes. Every query derives its answer from
//! the root start time, so re-timing the root re-times every descendant.

use crate::clock::{shift, Clock, Timestamp};
use crate::error::{StructuralError, TimeError};
use crate::event::Event;
use crate::id::{EventId, IdGen, JobId, NodeId, SignalToken, UuidIdGen};
use crate::trigger::SignalBoard;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// How a job orders its children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Children run back to back
    #[default]
    Sequence,
    /// Children all start with the job
    Concurrent,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Sequence => write!(f, "sequence"),
            Mode::Concurrent => write!(f, "concurrent"),
        }
    }
}

/// Resolved `[start, end)` window of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Timestamp,
    pub end: Timestamp,
}

/// Something that can be appended to a job
#[derive(Debug, Clone)]
pub enum Item {
    Event(Event),
    Job(Job),
}

impl From<Event> for Item {
    fn from(event: Event) -> Self {
        Item::Event(event)
    }
}

impl From<Job> for Item {
    fn from(job: Job) -> Self {
        Item::Job(job)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Job(usize),
    Event(usize),
}

#[derive(Debug, Clone)]
struct JobNode {
    id: JobId,
    name: String,
    mode: Mode,
    delay: Duration,
    parent: Option<usize>,
    children: Vec<Slot>,
}

#[derive(Debug, Clone)]
struct EventNode {
    event: Event,
    parent: usize,
}

/// A tree of events composed in sequence or concurrently
#[derive(Debug, Clone)]
pub struct Job {
    jobs: Vec<JobNode>,
    events: Vec<EventNode>,
    index: HashMap<NodeId, Slot>,
    start: Option<Timestamp>,
    signals: SignalBoard,
}

const ROOT: usize = 0;

impl Job {
    pub fn new(mode: Mode, name: impl Into<String>) -> Self {
        Self::with_id(JobId::generate(&UuidIdGen), mode, name)
    }

    pub fn new_in(id_gen: &impl IdGen, mode: Mode, name: impl Into<String>) -> Self {
        Self::with_id(JobId::generate(id_gen), mode, name)
    }

    pub fn with_id(id: JobId, mode: Mode, name: impl Into<String>) -> Self {
        let mut index = HashMap::new();
        index.insert(NodeId::Job(id.clone()), Slot::Job(ROOT));
        Self {
            jobs: vec![JobNode {
                id,
                name: name.into(),
                mode,
                delay: Duration::ZERO,
                parent: None,
                children: Vec::new(),
            }],
            events: Vec::new(),
            index,
            start: None,
            signals: SignalBoard::new(),
        }
    }

    pub fn sequence(name: impl Into<String>) -> Self {
        Self::new(Mode::Sequence, name)
    }

    pub fn concurrent(name: impl Into<String>) -> Self {
        Self::new(Mode::Concurrent, name)
    }

    /// Offset this job's start from the start its parent gives it
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.jobs[ROOT].delay = delay;
        self
    }

    /// Append a child, consuming and returning the job
    pub fn with_child(mut self, item: impl Into<Item>) -> Result<Self, StructuralError> {
        self.add(item)?;
        Ok(self)
    }

    pub fn id(&self) -> &JobId {
        &self.jobs[ROOT].id
    }

    pub fn name(&self) -> &str {
        &self.jobs[ROOT].name
    }

    pub fn mode(&self) -> Mode {
        self.jobs[ROOT].mode
    }

    pub fn delay(&self) -> Duration {
        self.jobs[ROOT].delay
    }

    /// Number of leaf events in the whole tree
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn add_event(&mut self, event: Event) -> Result<(), StructuralError> {
        self.extend([Item::Event(event)])
    }

    pub fn add_job(&mut self, job: Job) -> Result<(), StructuralError> {
        self.extend([Item::Job(job)])
    }

    pub fn add(&mut self, item: impl Into<Item>) -> Result<(), StructuralError> {
        self.extend([item.into()])
    }

    /// Append several children at once.
    ///
    /// Every incoming id, including ids nested inside incoming jobs, must be
    /// new to this tree and to the batch. Nothing is appended if any check fails.
    pub fn extend<I>(&mut self, items: I) -> Result<(), StructuralError>
    where
        I: IntoIterator,
        I::Item: Into<Item>,
    {
        let items: Vec<Item> = items.into_iter().map(Into::into).collect();

        let mut incoming = HashSet::new();
        for item in &items {
            match item {
                Item::Event(event) => {
                    self.check_new(NodeId::Event(event.id().clone()), &mut incoming)?;
                }
                Item::Job(job) => {
                    if job.start.is_some() {
                        return Err(StructuralError::StartOnNonRoot {
                            job: job.name().to_string(),
                        });
                    }
                    // Root first so a re-added job reports its own id
                    let root = NodeId::Job(job.id().clone());
                    self.check_new(root.clone(), &mut incoming)?;
                    for id in job.index.keys().filter(|id| **id != root) {
                        self.check_new(id.clone(), &mut incoming)?;
                    }
                }
            }
        }

        for item in items {
            match item {
                Item::Event(event) => self.attach_event(event),
                Item::Job(job) => self.attach_job(job),
            }
        }
        Ok(())
    }

    /// Ids are unique per tree regardless of kind: an event may not reuse a job's id
    fn check_new(
        &self,
        id: NodeId,
        incoming: &mut HashSet<String>,
    ) -> Result<(), StructuralError> {
        let raw = id.as_str();
        let taken = self.index.contains_key(&NodeId::Event(EventId::new(raw)))
            || self.index.contains_key(&NodeId::Job(JobId::new(raw)));
        if taken || !incoming.insert(raw.to_string()) {
            return Err(StructuralError::DuplicateIdentity {
                id,
                job: self.name().to_string(),
            });
        }
        Ok(())
    }

    fn attach_event(&mut self, mut event: Event) {
        let slot = Slot::Event(self.events.len());
        event.set_parent(self.id().clone());
        self.index.insert(NodeId::Event(event.id().clone()), slot);
        self.events.push(EventNode {
            event,
            parent: ROOT,
        });
        self.jobs[ROOT].children.push(slot);
        self.arm(self.events.len() - 1);
    }

    fn attach_job(&mut self, other: Job) {
        let fired: Vec<SignalToken> = other.signals.fired().cloned().collect();
        let job_offset = self.jobs.len();
        let event_offset = self.events.len();
        let remap = |slot: Slot| match slot {
            Slot::Job(i) => Slot::Job(i + job_offset),
            Slot::Event(i) => Slot::Event(i + event_offset),
        };

        for mut node in other.jobs {
            node.parent = Some(node.parent.map_or(ROOT, |p| p + job_offset));
            node.children = node.children.into_iter().map(remap).collect();
            self.jobs.push(node);
        }
        for mut node in other.events {
            node.parent += job_offset;
            self.events.push(node);
        }
        for (id, slot) in other.index {
            self.index.insert(id, remap(slot));
        }
        self.jobs[ROOT].children.push(Slot::Job(job_offset));

        self.signals.absorb(other.signals);
        // Fires buffered in the sub-job release waiters already in this tree
        for node in &mut self.events[..event_offset] {
            for token in &fired {
                node.event.trigger_mut().fire(token);
            }
        }
        for i in event_offset..self.events.len() {
            self.arm(i);
        }
    }

    /// Register an event's signal triggers, applying any buffered fires
    fn arm(&mut self, event: usize) {
        let tokens: Vec<SignalToken> = self.events[event]
            .event
            .trigger()
            .signal_tokens()
            .into_iter()
            .cloned()
            .collect();
        for token in tokens {
            if self.signals.arm(token.clone()) {
                self.events[event].event.trigger_mut().fire(&token);
            }
        }
    }

    // ------------------------------------------------------------------
    // Timing
    // ------------------------------------------------------------------

    /// Explicit root start, if assigned
    pub fn scheduled_start(&self) -> Option<Timestamp> {
        self.start
    }

    /// Assign the root start time. Fails if `at` is already in the past.
    pub fn set_time_start(
        &mut self,
        at: Timestamp,
        clock: &impl Clock,
    ) -> Result<(), StructuralError> {
        self.set_time_start_within(at, clock, Duration::ZERO)
    }

    /// Assign the root start time, accepting starts up to `tolerance` in the past.
    pub fn set_time_start_within(
        &mut self,
        at: Timestamp,
        clock: &impl Clock,
        tolerance: Duration,
    ) -> Result<(), StructuralError> {
        let now = clock.now();
        if shift(at, tolerance) < now {
            return Err(StructuralError::StartInPast { at, now });
        }
        self.start = Some(at);
        Ok(())
    }

    /// Start of the root job (explicit start plus the root's delay)
    pub fn time_start(&self) -> Result<Timestamp, TimeError> {
        self.start_of(Slot::Job(ROOT))
    }

    /// End of the root job, derived from the whole tree
    pub fn time_end(&self) -> Result<Timestamp, TimeError> {
        self.end_of(Slot::Job(ROOT))
    }

    /// Windows of every node, computed in one top-down pass
    pub fn timings(&self) -> Result<HashMap<NodeId, Span>, TimeError> {
        let anchor = self.root_anchor()?;
        let mut spans = HashMap::with_capacity(self.index.len());
        self.lay_out(Slot::Job(ROOT), anchor, &mut |slot, span| {
            spans.insert(self.node_id(slot), span);
        });
        Ok(spans)
    }

    /// Write resolved start and end times onto every event in the tree
    pub fn resolve_times(&mut self) -> Result<(), TimeError> {
        let anchor = self.root_anchor()?;
        let mut resolved = Vec::with_capacity(self.events.len());
        self.lay_out(Slot::Job(ROOT), anchor, &mut |slot, span| {
            if let Slot::Event(i) = slot {
                resolved.push((i, span));
            }
        });
        for (i, span) in resolved {
            self.events[i].event.set_times(span.start, span.end);
        }
        tracing::debug!(job_id = %self.id(), events = self.events.len(), "resolved event times");
        Ok(())
    }

    fn root_anchor(&self) -> Result<Timestamp, TimeError> {
        self.start.ok_or_else(|| TimeError::Unresolved {
            node: NodeId::Job(self.id().clone()),
        })
    }

    /// Lay out the subtree at `slot` from `anchor`, visiting each node's window
    fn lay_out(&self, slot: Slot, anchor: Timestamp, visit: &mut dyn FnMut(Slot, Span)) -> Span {
        let span = match slot {
            Slot::Event(i) => {
                let event = &self.events[i].event;
                let start = event.trigger().projected_start(anchor);
                Span {
                    start,
                    end: shift(start, event.duration()),
                }
            }
            Slot::Job(i) => {
                let job = &self.jobs[i];
                let start = shift(anchor, job.delay);
                let end = match job.mode {
                    Mode::Sequence => job
                        .children
                        .iter()
                        .fold(start, |cursor, &child| self.lay_out(child, cursor, visit).end),
                    Mode::Concurrent => job
                        .children
                        .iter()
                        .map(|&child| self.lay_out(child, start, visit).end)
                        .fold(start, Timestamp::max),
                };
                Span { start, end }
            }
        };
        visit(slot, span);
        span
    }

    fn parent_of(&self, slot: Slot) -> Option<usize> {
        match slot {
            Slot::Job(i) => self.jobs[i].parent,
            Slot::Event(i) => Some(self.events[i].parent),
        }
    }

    /// The start a node's parent hands it, before its own delay or trigger
    fn anchor_of(&self, slot: Slot) -> Result<Timestamp, TimeError> {
        match self.parent_of(slot) {
            None => self.start.ok_or_else(|| TimeError::Unresolved {
                node: self.node_id(slot),
            }),
            Some(parent) => self.start_for_child(parent, slot),
        }
    }

    fn start_for_child(&self, parent: usize, child: Slot) -> Result<Timestamp, TimeError> {
        let job = &self.jobs[parent];
        let start = self.start_of(Slot::Job(parent))?;
        match job.mode {
            Mode::Concurrent => Ok(start),
            Mode::Sequence => Ok(job
                .children
                .iter()
                .take_while(|&&c| c != child)
                .fold(start, |cursor, &prev| self.span_at(prev, cursor).end)),
        }
    }

    fn span_at(&self, slot: Slot, anchor: Timestamp) -> Span {
        self.lay_out(slot, anchor, &mut |_, _| {})
    }

    fn start_of(&self, slot: Slot) -> Result<Timestamp, TimeError> {
        let anchor = self.anchor_of(slot)?;
        Ok(match slot {
            Slot::Job(i) => shift(anchor, self.jobs[i].delay),
            Slot::Event(i) => self.events[i].event.trigger().projected_start(anchor),
        })
    }

    fn end_of(&self, slot: Slot) -> Result<Timestamp, TimeError> {
        let anchor = self.anchor_of(slot)?;
        Ok(self.span_at(slot, anchor).end)
    }

    // ------------------------------------------------------------------
    // Signals and completion
    // ------------------------------------------------------------------

    pub fn signals(&self) -> &SignalBoard {
        &self.signals
    }

    /// Fire a completion signal across the tree.
    ///
    /// Returns true if some event was waiting on it. Unclaimed fires stay
    /// buffered and satisfy events added later.
    pub fn fire_signal(&mut self, token: impl Into<SignalToken>) -> bool {
        let token = token.into();
        let waiting = self.signals.fire(token.clone());
        let mut released = 0;
        for node in &mut self.events {
            if node.event.trigger_mut().fire(&token) {
                released += 1;
            }
        }
        tracing::debug!(job_id = %self.id(), %token, waiting, released, "signal fired");
        waiting
    }

    /// Mark an event completed and fire its completion signal, if it has one
    pub fn complete_event(
        &mut self,
        id: &EventId,
    ) -> Result<Option<SignalToken>, StructuralError> {
        let node_id = NodeId::Event(id.clone());
        let Some(&Slot::Event(i)) = self.index.get(&node_id) else {
            return Err(StructuralError::UnknownNode(node_id));
        };
        let event = &mut self.events[i].event;
        event.mark_completed();
        let signal = event.completion_signal().cloned();
        if let Some(token) = &signal {
            self.fire_signal(token.clone());
        }
        Ok(signal)
    }

    /// Events that may be dispatched at `now`.
    ///
    /// An event is ready when it is not completed, every earlier sibling under
    /// each sequence ancestor has completed, `now` has reached its resolved
    /// start, and its trigger is satisfied. Nothing is ready before the root
    /// start is set.
    pub fn ready_events(&self, now: Timestamp) -> Vec<&Event> {
        self.walk()
            .into_iter()
            .filter_map(|node| {
                let event = node.as_event()?;
                if event.is_completed() || !self.predecessors_done(node.slot) {
                    return None;
                }
                let anchor = self.anchor_of(node.slot).ok()?;
                let trigger = event.trigger();
                let reached = now >= trigger.projected_start(anchor);
                (reached && trigger.is_triggered(now, Some(anchor))).then_some(event)
            })
            .collect()
    }

    fn predecessors_done(&self, slot: Slot) -> bool {
        let mut child = slot;
        while let Some(parent) = self.parent_of(child) {
            let job = &self.jobs[parent];
            if job.mode == Mode::Sequence
                && !job
                    .children
                    .iter()
                    .take_while(|&&c| c != child)
                    .all(|&prev| self.is_done(prev))
            {
                return false;
            }
            child = Slot::Job(parent);
        }
        true
    }

    /// Whether every event in the subtree has completed; empty jobs count as done
    fn is_done(&self, slot: Slot) -> bool {
        match slot {
            Slot::Event(i) => self.events[i].event.is_completed(),
            Slot::Job(i) => self.jobs[i].children.iter().all(|&c| self.is_done(c)),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            slot: Slot::Job(ROOT),
        }
    }

    /// Direct children of the root job
    pub fn children(&self) -> Vec<NodeRef<'_>> {
        self.root().children()
    }

    pub fn node(&self, id: &NodeId) -> Option<NodeRef<'_>> {
        self.index.get(id).map(|&slot| NodeRef { tree: self, slot })
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        match self.index.get(&NodeId::Event(id.clone())) {
            Some(&Slot::Event(i)) => Some(&self.events[i].event),
            _ => None,
        }
    }

    /// Looks up the name of any job node in the tree
    pub fn job_name(&self, id: &JobId) -> Option<&str> {
        match self.index.get(&NodeId::Job(id.clone())) {
            Some(&Slot::Job(i)) => Some(&self.jobs[i].name),
            _ => None,
        }
    }

    /// Every node in depth-first order, children visited in insertion order
    pub fn walk(&self) -> Vec<NodeRef<'_>> {
        let mut out = Vec::with_capacity(self.index.len());
        let mut stack = vec![Slot::Job(ROOT)];
        while let Some(slot) = stack.pop() {
            if let Slot::Job(i) = slot {
                stack.extend(self.jobs[i].children.iter().rev().copied());
            }
            out.push(NodeRef { tree: self, slot });
        }
        out
    }

    /// Leaf events in depth-first order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.walk().into_iter().filter_map(|node| node.as_event())
    }

    fn node_id(&self, slot: Slot) -> NodeId {
        match slot {
            Slot::Job(i) => NodeId::Job(self.jobs[i].id.clone()),
            Slot::Event(i) => NodeId::Event(self.events[i].event.id().clone()),
        }
    }
}

/// Borrowed view of one node of a job tree
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Job,
    slot: Slot,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.tree.node_id(self.slot)
    }

    pub fn is_event(&self) -> bool {
        matches!(self.slot, Slot::Event(_))
    }

    pub fn as_event(&self) -> Option<&'a Event> {
        match self.slot {
            Slot::Event(i) => Some(&self.tree.events[i].event),
            Slot::Job(_) => None,
        }
    }

    /// Job name, or `None` for events
    pub fn name(&self) -> Option<&'a str> {
        match self.slot {
            Slot::Job(i) => Some(&self.tree.jobs[i].name),
            Slot::Event(_) => None,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        match self.slot {
            Slot::Job(i) => Some(self.tree.jobs[i].mode),
            Slot::Event(_) => None,
        }
    }

    pub fn delay(&self) -> Duration {
        match self.slot {
            Slot::Job(i) => self.tree.jobs[i].delay,
            Slot::Event(_) => Duration::ZERO,
        }
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.parent_of(self.slot).map(|p| NodeRef {
            tree: self.tree,
            slot: Slot::Job(p),
        })
    }

    /// Walks parent links to the top of the tree
    pub fn root(&self) -> NodeRef<'a> {
        let mut node = *self;
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    pub fn children(&self) -> Vec<NodeRef<'a>> {
        match self.slot {
            Slot::Job(i) => self.tree.jobs[i]
                .children
                .iter()
                .map(|&slot| NodeRef {
                    tree: self.tree,
                    slot,
                })
                .collect(),
            Slot::Event(_) => Vec::new(),
        }
    }

    /// Leaf events under this node; an event counts itself
    pub fn len(&self) -> usize {
        match self.slot {
            Slot::Event(_) => 1,
            Slot::Job(_) => self.children().iter().map(NodeRef::len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn time_start(&self) -> Result<Timestamp, TimeError> {
        self.tree.start_of(self.slot)
    }

    pub fn time_end(&self) -> Result<Timestamp, TimeError> {
        self.tree.end_of(self.slot)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
