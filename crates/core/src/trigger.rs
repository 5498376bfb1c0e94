// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Triggers gating when an event becomes eligible to run
//!
//! A trigger is a pure predicate over the current time, the event's resolved
//! start (its anchor), and any signals that have fired. Time resolution uses
//! [`Trigger::projected_start`] to place an event on the timeline without
//! polling a clock.

use crate::clock::{shift, Timestamp};
use crate::id::SignalToken;
use std::collections::HashSet;
use std::time::Duration;

/// Condition under which an event may start
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Trigger {
    /// Always satisfied
    #[default]
    Now,
    /// Satisfied `offset` after the anchor time
    TimeRelative(Duration),
    /// Satisfied once wall-clock time reaches the given instant
    TimeAbsolute(Timestamp),
    /// Satisfied once a completion signal with this token has fired
    Signal { token: SignalToken, fired: bool },
    And(Vec<Trigger>),
    Or(Vec<Trigger>),
}

impl Trigger {
    pub fn after(offset: Duration) -> Self {
        Trigger::TimeRelative(offset)
    }

    pub fn at(at: Timestamp) -> Self {
        Trigger::TimeAbsolute(at)
    }

    pub fn signal(token: impl Into<SignalToken>) -> Self {
        Trigger::Signal {
            token: token.into(),
            fired: false,
        }
    }

    /// Absolute fire time of a relative trigger given its anchor
    pub fn fire_time(&self, anchor: Timestamp) -> Option<Timestamp> {
        match self {
            Trigger::TimeRelative(offset) => Some(shift(anchor, *offset)),
            Trigger::TimeAbsolute(at) => Some(*at),
            _ => None,
        }
    }

    /// Whether the trigger is satisfied at `now`.
    ///
    /// Relative triggers need an anchor; without one they are never satisfied.
    pub fn is_triggered(&self, now: Timestamp, anchor: Option<Timestamp>) -> bool {
        match self {
            Trigger::Now => true,
            Trigger::TimeRelative(offset) => {
                anchor.is_some_and(|anchor| now >= shift(anchor, *offset))
            }
            Trigger::TimeAbsolute(at) => now >= *at,
            Trigger::Signal { fired, .. } => *fired,
            Trigger::And(children) => children.iter().all(|c| c.is_triggered(now, anchor)),
            Trigger::Or(children) => children.iter().any(|c| c.is_triggered(now, anchor)),
        }
    }

    /// Earliest time the trigger can be satisfied, assuming signals fire on time.
    ///
    /// Signals cannot be projected and resolve to the anchor. An absolute time
    /// before the anchor also resolves to the anchor.
    pub fn projected_start(&self, anchor: Timestamp) -> Timestamp {
        match self {
            Trigger::Now | Trigger::Signal { .. } => anchor,
            Trigger::TimeRelative(offset) => shift(anchor, *offset),
            Trigger::TimeAbsolute(at) => anchor.max(*at),
            Trigger::And(children) => children
                .iter()
                .map(|c| c.projected_start(anchor))
                .max()
                .unwrap_or(anchor),
            Trigger::Or(children) => children
                .iter()
                .map(|c| c.projected_start(anchor))
                .min()
                .unwrap_or(anchor),
        }
    }

    /// Mark every signal leaf waiting on `token` as fired.
    ///
    /// Returns true if any leaf matched.
    pub fn fire(&mut self, token: &SignalToken) -> bool {
        match self {
            Trigger::Signal { token: t, fired } if t == token => {
                *fired = true;
                true
            }
            Trigger::And(children) | Trigger::Or(children) => children
                .iter_mut()
                .fold(false, |matched, c| c.fire(token) || matched),
            _ => false,
        }
    }

    /// Every token this trigger waits on
    pub fn signal_tokens(&self) -> Vec<&SignalToken> {
        let mut tokens = Vec::new();
        self.collect_tokens(&mut tokens);
        tokens
    }

    fn collect_tokens<'a>(&'a self, tokens: &mut Vec<&'a SignalToken>) {
        match self {
            Trigger::Signal { token, .. } => tokens.push(token),
            Trigger::And(children) | Trigger::Or(children) => {
                for child in children {
                    child.collect_tokens(tokens);
                }
            }
            _ => {}
        }
    }
}

/// Armed and fired signal tokens for one job tree.
///
/// Fires that arrive before any trigger has armed the token are buffered:
/// arming afterwards reports the token as already fired.
#[derive(Debug, Clone, Default)]
pub struct SignalBoard {
    armed: HashSet<SignalToken>,
    fired: HashSet<SignalToken>,
}

impl SignalBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger waiting on `token`. Returns true if it already fired.
    pub fn arm(&mut self, token: SignalToken) -> bool {
        let fired = self.fired.contains(&token);
        self.armed.insert(token);
        fired
    }

    /// Record that `token` fired. Returns true if some trigger was armed for it.
    pub fn fire(&mut self, token: SignalToken) -> bool {
        let armed = self.armed.contains(&token);
        self.fired.insert(token);
        armed
    }

    pub fn is_armed(&self, token: &SignalToken) -> bool {
        self.armed.contains(token)
    }

    pub fn is_fired(&self, token: &SignalToken) -> bool {
        self.fired.contains(token)
    }

    /// Every token that has fired, claimed or not
    pub fn fired(&self) -> impl Iterator<Item = &SignalToken> {
        self.fired.iter()
    }

    /// Fired tokens no trigger is waiting on yet
    pub fn pending(&self) -> impl Iterator<Item = &SignalToken> {
        self.fired.iter().filter(|t| !self.armed.contains(*t))
    }

    /// Merge another board into this one
    pub fn absorb(&mut self, other: SignalBoard) {
        self.armed.extend(other.armed);
        self.fired.extend(other.fired);
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
