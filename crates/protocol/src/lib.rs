// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Equipment capability catalogs and protocol files

mod catalog;
mod loader;
mod parser;
mod types;

pub use catalog::{ActionSpec, Capability, Catalog, ParamRange, ParamSpec};
pub use loader::{load_catalog_file, load_protocol_file, LoadError};
pub use parser::{parse_catalog, parse_protocol, parse_protocol_with, ParseError};
