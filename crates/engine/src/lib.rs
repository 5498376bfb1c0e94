// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! labq validation and submission engine

mod config;
mod submit;
mod validator;

pub use config::{ConfigError, EngineConfig};
pub use submit::{Ack, MemoryQueue, QueuedJob, SinkError, SubmitSink, Submitter, SubmitterError};
pub use validator::{Validator, DEFAULT_CONFLICT_WINDOW};
