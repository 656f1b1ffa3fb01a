// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The interactive query and paging loop.
//!
//! ```text
//!              ┌──────────────────────────────────────────────────┐
//!              ▼                                                  │
//!        ┌───────────┐  query   ┌────────────┐  more pages  ┌─────┴──────────────┐
//!  ─────▶│ Prompting │─────────▶│ Displaying │─────────────▶│ AwaitingPageCommand│
//!        └─────┬─────┘          └──────┬─────┘              └─────┬──────────────┘
//!              │ blank/EOF             ▲   ▲                      │ p / n / <page>
//!              ▼                       │   └──────────────────────┤
//!        Terminated          y ┌───────┴──────┐   page past buffer│
//!                              │ AwaitingMore │◀──────────────────┘
//!                              └──────────────┘
//! ```
//!
//! Batch sessions (a single query, or queries piped from a file) never reach
//! the two awaiting states: each query is displayed once. If a batch page
//! runs past the buffer, the full fetch happens without asking.
//!
//! Query text and navigation commands are read from the same input, one line
//! at a time.

use std::io::{BufRead, Write};
use std::time::Instant;

use tracing::{debug, info};

use crate::config::{SessionConfig, BENCHMARK_HITS};
use crate::error::{Error, Result};
use crate::paging::{Escalator, PageWindow};
use crate::query::Query;
use crate::ranking::{DocumentStore, RankingService};
use crate::report::ReportWriter;

const INPUT: &str = "<input>";
const CONSOLE: &str = "<console>";

// =============================================================================
// PAGE COMMANDS
// =============================================================================

/// One line typed at the page prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCommand {
    /// Empty line or anything starting with `q`.
    Quit,
    /// Starts with `p`.
    Previous,
    /// Starts with `n`.
    Next,
    /// A 1-based page number.
    Jump(usize),
    /// Anything else; reported and re-prompted.
    Invalid(String),
}

impl PageCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line.chars().next() {
            None | Some('q') => PageCommand::Quit,
            Some('p') => PageCommand::Previous,
            Some('n') => PageCommand::Next,
            Some(_) => match line.parse::<usize>() {
                Ok(page) => PageCommand::Jump(page),
                Err(_) => PageCommand::Invalid(line.to_string()),
            },
        }
    }
}

/// Whether a "collect more?" answer asks for the full fetch.
///
/// An empty answer or one starting with `n` declines.
pub fn wants_more(answer: &str) -> bool {
    let answer = answer.trim();
    !(answer.is_empty() || answer.starts_with('n'))
}

// =============================================================================
// STATES AND OUTCOMES
// =============================================================================

/// Where a query's paging loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Displaying,
    AwaitingMore,
    AwaitingPageCommand,
}

/// How a query's paging loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    /// Displayed and nothing more to ask (batch, no results, single page).
    Completed,
    /// The user quit from the page prompt.
    Quit,
    /// The user declined the full fetch.
    Declined,
}

/// Totals over a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub queries: usize,
    pub emitted: usize,
    pub skipped: usize,
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// Drives queries through paging and output for one session.
pub struct Navigator<'a, S: ?Sized, R, W> {
    service: &'a S,
    writer: &'a ReportWriter,
    config: &'a SessionConfig,
    input: R,
    out: W,
    interactive: bool,
    summary: SessionSummary,
}

impl<'a, S, R, W> Navigator<'a, S, R, W>
where
    S: RankingService + DocumentStore + ?Sized,
    R: BufRead,
    W: Write,
{
    /// A batch navigator; call `interactive(true)` for a terminal session.
    pub fn new(
        service: &'a S,
        writer: &'a ReportWriter,
        config: &'a SessionConfig,
        input: R,
        out: W,
    ) -> Self {
        Self {
            service,
            writer,
            config,
            input,
            out,
            interactive: false,
            summary: SessionSummary::default(),
        }
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    /// Hand back the output sink (tests read the console transcript from it).
    pub fn into_output(self) -> W {
        self.out
    }

    /// Run queries until input ends or a blank line is read.
    ///
    /// With `single` set, that one query runs and the session ends.
    pub fn run_session(&mut self, single: Option<&str>) -> Result<SessionSummary> {
        loop {
            let line = match single {
                Some(text) => Some(text.to_string()),
                None => {
                    if self.interactive {
                        self.say("Enter query: ")?;
                    }
                    self.read_line()?
                }
            };
            let Some(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                break;
            }

            let query = Query::parse(line, &self.config.field)?;
            self.say(&format!("Searching for: {}", query.primary_display()))?;

            if self.config.repeat > 0 {
                self.benchmark(&query)?;
            }

            let outcome = self.page_query(&query)?;
            self.summary.queries += 1;
            debug!(?outcome, query = query.id_token(), "query finished");

            if single.is_some() {
                break;
            }
        }
        Ok(self.summary)
    }

    /// Time `repeat` identical searches. Output files are not touched.
    fn benchmark(&mut self, query: &Query) -> Result<()> {
        let started = Instant::now();
        for _ in 0..self.config.repeat {
            self.service.search(query, BENCHMARK_HITS)?;
        }
        let elapsed = started.elapsed().as_millis();
        info!(repeat = self.config.repeat, elapsed_ms = elapsed as u64, "benchmark");
        self.say(&format!("Time: {}ms", elapsed))
    }

    /// Page through one query.
    pub fn page_query(&mut self, query: &Query) -> Result<QueryOutcome> {
        let escalator = Escalator::from_config(self.config);
        let mut window = PageWindow::open(self.service, query, escalator)?;
        self.say(&format!("{} total matching documents", window.total()))?;

        let mut header_pending = true;
        let mut state = next_state(&window);

        loop {
            state = match state {
                PageState::AwaitingMore => {
                    if self.interactive {
                        self.say(&format!(
                            "Only results 1 - {} of {} total matching documents collected.",
                            window.buffer().len(),
                            window.total()
                        ))?;
                        self.say("Collect more (y/n) ?")?;
                        let answer = self.read_line()?;
                        if !answer.as_deref().is_some_and(wants_more) {
                            return Ok(QueryOutcome::Declined);
                        }
                    }
                    window.escalate(self.service, query)?;
                    PageState::Displaying
                }

                PageState::Displaying => {
                    let page = self.writer.emit(
                        window.visible(),
                        query,
                        header_pending,
                        self.service,
                        &mut self.out,
                    )?;
                    header_pending &= page.emitted == 0;
                    self.summary.emitted += page.emitted;
                    self.summary.skipped += page.skipped;

                    let more_pages = window.has_previous() || window.has_next();
                    if !self.interactive || window.end() == 0 || !more_pages {
                        return Ok(QueryOutcome::Completed);
                    }
                    PageState::AwaitingPageCommand
                }

                PageState::AwaitingPageCommand => {
                    self.say(&page_prompt(&window))?;
                    let command = match self.read_line()? {
                        Some(line) => PageCommand::parse(&line),
                        None => PageCommand::Quit,
                    };
                    match command {
                        PageCommand::Quit => return Ok(QueryOutcome::Quit),
                        PageCommand::Previous => {
                            window.previous();
                            next_state(&window)
                        }
                        PageCommand::Next => {
                            window.next();
                            next_state(&window)
                        }
                        PageCommand::Jump(page) => {
                            if window.jump(page) {
                                next_state(&window)
                            } else {
                                self.say("No such page")?;
                                PageState::AwaitingPageCommand
                            }
                        }
                        PageCommand::Invalid(text) => {
                            self.say(&format!("Invalid page command: {}", text))?;
                            PageState::AwaitingPageCommand
                        }
                    }
                }
            };
        }
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)
            .and_then(|()| self.out.flush())
            .map_err(|e| Error::io(CONSOLE, e))
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let n = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::io(INPUT, e))?;
        if n == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn next_state(window: &PageWindow) -> PageState {
    if window.is_short() {
        PageState::AwaitingMore
    } else {
        PageState::Displaying
    }
}

/// "Press (p)revious page, (n)ext page, (q)uit or enter number to jump to a page."
/// listing only the moves available from `window`.
fn page_prompt(window: &PageWindow) -> String {
    let mut prompt = String::from("Press ");
    if window.has_previous() {
        prompt.push_str("(p)revious page, ");
    }
    if window.has_next() {
        prompt.push_str("(n)ext page, ");
    }
    prompt.push_str("(q)uit or enter number to jump to a page.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quit() {
        assert_eq!(PageCommand::parse(""), PageCommand::Quit);
        assert_eq!(PageCommand::parse("q"), PageCommand::Quit);
        assert_eq!(PageCommand::parse("quit"), PageCommand::Quit);
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!(PageCommand::parse("p"), PageCommand::Previous);
        assert_eq!(PageCommand::parse("prev"), PageCommand::Previous);
        assert_eq!(PageCommand::parse("n"), PageCommand::Next);
        assert_eq!(PageCommand::parse("3"), PageCommand::Jump(3));
        assert_eq!(PageCommand::parse(" 12 "), PageCommand::Jump(12));
    }

    #[test]
    fn test_parse_invalid_is_recoverable() {
        assert_eq!(
            PageCommand::parse("x7"),
            PageCommand::Invalid("x7".to_string())
        );
        assert_eq!(PageCommand::parse("-1"), PageCommand::Invalid("-1".to_string()));
    }

    #[test]
    fn test_wants_more() {
        assert!(wants_more("y"));
        assert!(wants_more("yes please"));
        assert!(wants_more("sure"));
        assert!(!wants_more(""));
        assert!(!wants_more("n"));
        assert!(!wants_more("no"));
    }
}
