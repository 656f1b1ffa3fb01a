// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the trec-pager command-line interface.
//!
//! Four positionals: the corpus to search, where queries come from, and the
//! two output files. Queries are read one per line; `-` reads them from stdin,
//! which becomes an interactive paging session when stdin is a terminal.

pub mod display;

use clap::Parser;
use std::path::PathBuf;

use trec_pager::config::{DEFAULT_FIELD, DEFAULT_PAGE_SIZE, DEFAULT_RUN_TAG};
use trec_pager::SessionConfig;

#[derive(Parser)]
#[command(
    name = "trec-pager",
    about = "Page through ranked search results and write TREC run and relevance report files",
    version
)]
pub struct Cli {
    /// JSON corpus file (array of documents keyed by stored field name)
    pub index: PathBuf,

    /// File with one query per line, or `-` for stdin
    pub queries: String,

    /// Run file to append TREC result lines to
    pub run_file: PathBuf,

    /// Report file to append <top> relevance blocks to
    pub report_file: PathBuf,

    /// Run a single query and exit (queries source is ignored)
    #[arg(long)]
    pub query: Option<String>,

    /// Field to search and display
    #[arg(long, default_value = DEFAULT_FIELD)]
    pub field: String,

    /// Print rank, document and score only; write no files
    #[arg(long)]
    pub raw: bool,

    /// Time this many repeated searches per query before paging
    #[arg(long, default_value = "0")]
    pub repeat: usize,

    /// Hits per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub paging: usize,

    /// Tag written in the last column of every run line
    #[arg(long, default_value = DEFAULT_RUN_TAG)]
    pub run_tag: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Queries come from stdin rather than a file.
    pub fn reads_stdin(&self) -> bool {
        self.query.is_none() && self.queries == "-"
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            page_size: self.paging,
            run_tag: self.run_tag.clone(),
            field: self.field.clone(),
            raw: self.raw,
            repeat: self.repeat,
        }
    }
}
