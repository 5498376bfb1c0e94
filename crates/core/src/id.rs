// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for protocol nodes, schedules, and resources

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of fresh node identifiers
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// Random v4 UUIDs, used for parsed protocols
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids counting from 1. Clones share one counter.
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: Arc<str>,
    issued: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: Arc::from(prefix),
            issued: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Ids handed out so far across every clone
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Draw a fresh id from `id_gen`
            pub fn generate(id_gen: &impl IdGen) -> Self {
                Self(id_gen.next())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identity of a single event; generated once and never reused
    EventId
);
string_id!(
    /// Identity of a job node
    JobId
);
string_id!(
    /// Identity of a flattened schedule
    ScheduleId
);
string_id!(
    /// Key naming a physical or logical piece of equipment
    ResourceId
);
string_id!(
    /// Completion token linking events across resources
    SignalToken
);

/// Identity of any node in a job tree
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeId {
    Event(EventId),
    Job(JobId),
}

impl NodeId {
    /// The raw id string, without its kind
    pub fn as_str(&self) -> &str {
        match self {
            NodeId::Event(id) => id.as_str(),
            NodeId::Job(id) => id.as_str(),
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeId::Event(id) => write!(f, "event {}", id),
            NodeId::Job(id) => write!(f, "job {}", id),
        }
    }
}

impl From<EventId> for NodeId {
    fn from(id: EventId) -> Self {
        NodeId::Event(id)
    }
}

impl From<JobId> for NodeId {
    fn from(id: JobId) -> Self {
        NodeId::Job(id)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
