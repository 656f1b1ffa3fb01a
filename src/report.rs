// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Run-file and relevance-report output.
//!
//! Two append-only text files come out of every query:
//!
//! - the **run file**, one TREC line per emitted hit:
//!
//!   ```text
//!   <qid>  Q0  <docno>  <docpath> ,<url> ,<journal> ,<date> <rank>  <score>  <tag>
//!   ```
//!
//! - the **report file**, a `<top>` block per query with pseudo-relevance
//!   labels chosen purely by rank position:
//!
//!   ```text
//!   <top>
//!   <num> <qid>
//!   <title> <query>
//!   <relevant> <contents>        ranks 0..20
//!   </top>                       rank 99
//!   <irrelevant> <contents>      ranks 980..1000
//!   ```
//!
//! The rank buckets are fixed policy and deliberately not scaled by page size.
//! Every append opens, writes, and closes its file, so whatever was written
//! before a failure stays on disk. Two processes writing the same files will
//! interleave lines.

use std::fs::OpenOptions;
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::query::Query;
use crate::ranking::DocumentStore;
use crate::types::{DocFields, RankedHit};

/// Ranks labelled `<relevant>`.
pub const RELEVANT_RANKS: Range<usize> = 0..20;

/// Ranks labelled `<irrelevant>`.
pub const IRRELEVANT_RANKS: Range<usize> = 980..1000;

/// Rank after which the `</top>` marker is written.
pub const TOPIC_CLOSE_RANK: usize = 99;

/// Path label used in errors for the console stream.
const CONSOLE: &str = "<console>";

/// Counts from one `emit` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub emitted: usize,
    pub skipped: usize,
}

/// Appends run lines and report annotations for visible hits.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    run_path: PathBuf,
    report_path: PathBuf,
    run_tag: String,
    raw: bool,
}

impl ReportWriter {
    pub fn new(run_path: impl Into<PathBuf>, report_path: impl Into<PathBuf>, run_tag: &str) -> Self {
        Self {
            run_path: run_path.into(),
            report_path: report_path.into(),
            run_tag: run_tag.to_string(),
            raw: false,
        }
    }

    pub fn from_config(
        run_path: impl Into<PathBuf>,
        report_path: impl Into<PathBuf>,
        config: &SessionConfig,
    ) -> Self {
        Self::new(run_path, report_path, &config.run_tag).raw(config.raw)
    }

    /// In raw mode only `rank doc score` is printed and no file is touched.
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn run_path(&self) -> &Path {
        &self.run_path
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Write output for `hits` (one page, ascending rank).
    ///
    /// `header_pending` is true until the `<top>` header for `query` has been
    /// written; it goes out before the first hit that has a path. Console lines
    /// go to `out`.
    pub fn emit<D, W>(
        &self,
        hits: &[RankedHit],
        query: &Query,
        header_pending: bool,
        store: &D,
        out: &mut W,
    ) -> Result<EmitSummary>
    where
        D: DocumentStore + ?Sized,
        W: Write,
    {
        let mut summary = EmitSummary::default();

        if self.raw {
            for hit in hits {
                writeln!(out, "rank={} doc={} score={}", hit.rank, hit.doc, format_score(hit.score))
                    .map_err(|e| Error::io(CONSOLE, e))?;
                summary.emitted += 1;
            }
            return Ok(summary);
        }

        let token = query.id_token();
        let mut header_pending = header_pending;

        for hit in hits {
            let fields = store.fields(hit.doc)?;
            let Some(path) = fields.path.as_deref() else {
                warn!(rank = hit.rank, doc = %hit.doc, "no path for this document");
                writeln!(out, "{}. No path for this document", hit.rank + 1)
                    .map_err(|e| Error::io(CONSOLE, e))?;
                summary.skipped += 1;
                continue;
            };
            writeln!(out, "{}. {}", hit.rank + 1, path).map_err(|e| Error::io(CONSOLE, e))?;

            if header_pending {
                self.append_report(&report_header(token, &query.primary_display()))?;
                header_pending = false;
            }
            for label in annotations(hit.rank) {
                self.append_report(&annotation_line(label, &fields))?;
            }
            if hit.rank == TOPIC_CLOSE_RANK {
                self.append_report("</top>\n")?;
            }

            let line = format_run_line(token, &fields, hit.rank, hit.score, &self.run_tag);
            self.append_run(&line)?;

            if let Some(title) = fields.title.as_deref() {
                writeln!(out, "   Title: {}", title).map_err(|e| Error::io(CONSOLE, e))?;
            }
            summary.emitted += 1;
        }

        debug!(
            emitted = summary.emitted,
            skipped = summary.skipped,
            "wrote page for query {}",
            token
        );
        Ok(summary)
    }

    fn append_run(&self, line: &str) -> Result<()> {
        append(&self.run_path, &format!("{}\n", line))
    }

    fn append_report(&self, text: &str) -> Result<()> {
        append(&self.report_path, text)
    }
}

/// Report annotation labels for a rank position.
pub fn annotations(rank: usize) -> impl Iterator<Item = &'static str> {
    let relevant = RELEVANT_RANKS.contains(&rank).then_some("<relevant>");
    let irrelevant = IRRELEVANT_RANKS.contains(&rank).then_some("<irrelevant>");
    relevant.into_iter().chain(irrelevant)
}

/// `<top>` block opener for a query.
pub fn report_header(token: &str, display: &str) -> String {
    format!("<top>\n<num> {}\n<title> {}\n", token, display)
}

fn annotation_line(label: &str, fields: &DocFields) -> String {
    let contents = fields.contents.as_deref().unwrap_or("");
    format!("{} {}\n", label, contents.trim_end_matches(['\r', '\n']))
}

/// One run-file line, without the trailing newline.
///
/// Missing optional fields leave their slot blank; the separators stay.
pub fn format_run_line(token: &str, fields: &DocFields, rank: usize, score: f32, run_tag: &str) -> String {
    format!(
        "{}  Q0  {}  {} ,{} ,{} ,{} {}  {}  {}",
        token,
        fields.run_doc_id(),
        fields.docpath.as_deref().unwrap_or(""),
        fields.url.as_deref().unwrap_or(""),
        fields.journal.as_deref().unwrap_or(""),
        fields.date.as_deref().unwrap_or(""),
        rank,
        format_score(score),
        run_tag
    )
}

/// Shortest round-trip rendering; always has a fractional part (`2.0`, not `2`).
pub fn format_score(score: f32) -> String {
    format!("{:?}", score)
}

fn append(path: &Path, text: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;
    file.write_all(text.as_bytes())
        .and_then(|()| file.flush())
        .map_err(|e| Error::io(path, e))
}
