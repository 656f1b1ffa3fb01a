// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced by the pager.
//!
//! Everything here is fatal for the current query or the whole run. Conditions
//! the user can recover from ("no such page", "fetch more?") are navigation
//! outcomes, not errors, and live in `navigator`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a query or the session.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading input or appending to an output file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The corpus file could not be read or parsed
    #[error("Failed to load corpus: {0}")]
    Corpus(String),
    /// The query text produced no searchable terms
    #[error("Failed to parse query: {0}")]
    Query(String),
    /// The ranking service could not produce a hit list
    #[error("Ranking service failed: {0}")]
    Ranking(String),
    /// Session settings are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
