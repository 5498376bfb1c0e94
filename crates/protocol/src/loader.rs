// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File loading for catalogs and protocols

use crate::catalog::Catalog;
use crate::parser::{parse_catalog, parse_protocol, ParseError};
use labq_core::Job;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn parse_error(path: &Path) -> impl FnOnce(ParseError) -> LoadError + '_ {
    move |source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

/// Load a capability catalog from a TOML file
pub fn load_catalog_file(path: impl AsRef<Path>) -> Result<Catalog, LoadError> {
    let path = path.as_ref();
    parse_catalog(&read(path)?).map_err(parse_error(path))
}

/// Load a protocol file as a job tree
pub fn load_protocol_file(path: impl AsRef<Path>) -> Result<Job, LoadError> {
    let path = path.as_ref();
    parse_protocol(&read(path)?).map_err(parse_error(path))
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
