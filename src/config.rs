// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Session settings shared by the pager, the writers, and the CLI.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hits shown per page when `--paging` is not given.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Run tag written in the last column of every run line.
pub const DEFAULT_RUN_TAG: &str = "BM25_paged";

/// Field searched and displayed when `--field` is not given.
pub const DEFAULT_FIELD: &str = "contents";

/// Result count used by `--repeat` timing runs.
pub const BENCHMARK_HITS: usize = 100;

/// Settings for one pager session (all queries of one invocation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub page_size: usize,
    pub run_tag: String,
    pub field: String,
    /// Print `(rank, doc, score)` only and skip every file write.
    pub raw: bool,
    /// Time this many identical searches per query before paging.
    pub repeat: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            run_tag: DEFAULT_RUN_TAG.to_string(),
            field: DEFAULT_FIELD.to_string(),
            raw: false,
            repeat: 0,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidConfig(
                "There must be at least 1 hit per page.".to_string(),
            ));
        }
        if self.run_tag.split_whitespace().count() != 1 {
            return Err(Error::InvalidConfig(format!(
                "run tag must be a single non-empty token, got {:?}",
                self.run_tag
            )));
        }
        Ok(())
    }
}
