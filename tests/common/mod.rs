//! Shared test utilities and fixtures.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;
use trec_pager::{
    DocumentStore, Navigator, RankingService, ReportWriter, Result, SessionConfig, SessionSummary,
};

// Re-export canonical test utilities from trec_pager::testing
pub use trec_pager::testing::{make_fields, make_path_fields, FailingRanking, ScriptedRanking};

/// Run tag used by every fixture session.
pub const RUN_TAG: &str = "test_run";

/// Output files in a scratch directory plus the session settings.
pub struct Session {
    pub dir: TempDir,
    pub config: SessionConfig,
    pub writer: ReportWriter,
}

impl Session {
    pub fn new(page_size: usize) -> Self {
        Self::with_config(SessionConfig {
            page_size,
            run_tag: RUN_TAG.to_string(),
            ..Default::default()
        })
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let writer =
            ReportWriter::from_config(dir.path().join("run.txt"), dir.path().join("report.txt"), &config);
        Self {
            dir,
            config,
            writer,
        }
    }

    /// Run a navigator session over `input`, returning the summary and the
    /// console transcript.
    pub fn run<S>(
        &self,
        service: &S,
        input: &str,
        interactive: bool,
        single: Option<&str>,
    ) -> Result<(SessionSummary, String)>
    where
        S: RankingService + DocumentStore,
    {
        let mut nav = Navigator::new(service, &self.writer, &self.config, input.as_bytes(), Vec::new())
            .interactive(interactive);
        let summary = nav.run_session(single)?;
        let console = String::from_utf8(nav.into_output()).expect("utf-8 console output");
        Ok((summary, console))
    }

    pub fn run_path(&self) -> PathBuf {
        self.dir.path().join("run.txt")
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.path().join("report.txt")
    }

    /// Run-file lines, or nothing if the file was never created.
    pub fn run_lines(&self) -> Vec<String> {
        fs::read_to_string(self.run_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn report(&self) -> String {
        fs::read_to_string(self.report_path()).unwrap_or_default()
    }
}

/// Rank column (third from the end) of a run line.
pub fn run_line_rank(line: &str) -> usize {
    let fields: Vec<&str> = line.split_whitespace().collect();
    fields[fields.len() - 3].parse().expect("numeric rank column")
}
