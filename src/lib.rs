// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Paginated consumption of ranked search results, with TREC run-file and
//! pseudo-relevance report output.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ navigator   │────▶│  paging      │────▶│  ranking     │
//! │ (prompt,    │     │ (PageWindow, │     │ (Ranking-    │
//! │  commands)  │     │  Escalator)  │     │  Service)    │
//! └──────┬──────┘     └──────────────┘     └──────┬───────┘
//!        │                                        │ DocumentStore
//!        ▼                                        ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                        report                            │
//! │   run file (TREC lines)   ·   report file (<top> ...)    │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The first search for a query asks for one page of hits. Paging past that
//! buffer triggers a single full re-fetch (escalation); after that the buffer
//! is complete and no further searches happen for the query.
//!
//! # Usage
//!
//! ```ignore
//! use trec_pager::{Corpus, Navigator, ReportWriter, SessionConfig};
//!
//! let config = SessionConfig::default();
//! let corpus = Corpus::load("corpus.json".as_ref(), &config.field)?;
//! let writer = ReportWriter::from_config("run.txt", "report.txt", &config);
//! let stdin = std::io::stdin().lock();
//! let mut nav = Navigator::new(&corpus, &writer, &config, stdin, std::io::stdout());
//! nav.run_session(Some("international organized crime"))?;
//! ```

pub mod config;
pub mod error;
pub mod navigator;
pub mod paging;
pub mod query;
pub mod ranking;
pub mod report;
pub mod testing;
mod types;

pub use config::SessionConfig;
pub use error::{Error, Result};
pub use navigator::{Navigator, PageCommand, PageState, QueryOutcome, SessionSummary};
pub use paging::{Escalator, HitBuffer, PageWindow};
pub use query::Query;
pub use ranking::{Bm25Params, Corpus, DocumentStore, RankingService};
pub use report::{format_run_line, EmitSummary, ReportWriter};
pub use types::{DocFields, DocRef, RankedHit, TopHits};
