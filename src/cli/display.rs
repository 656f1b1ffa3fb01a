// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Session banner and end-of-run summary for the trec-pager CLI.
//!
//! Everything here goes to stderr. Stdout carries the paging transcript
//! (`Searching for: ...`, numbered hits, prompts) and must stay clean enough
//! to pipe. Colors are plain 16-color ANSI, off under `NO_COLOR` or when
//! stderr is not a terminal.

use std::fmt::Write as _;

const RESET: &str = "\x1b[0m";

/// The handful of styles the CLI uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Heading,
    Key,
    Good,
    Warn,
    Bad,
    Dim,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Heading => "\x1b[1;36m",
            Style::Key => "\x1b[2m",
            Style::Good => "\x1b[32m",
            Style::Warn => "\x1b[33m",
            Style::Bad => "\x1b[1;31m",
            Style::Dim => "\x1b[90m",
        }
    }
}

/// Colors only when stderr is a terminal and `NO_COLOR` is unset.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stderr)
}

fn paint_with(colors: bool, style: Style, text: &str) -> String {
    if colors {
        format!("{}{}{}", style.code(), text, RESET)
    } else {
        text.to_string()
    }
}

pub fn paint(style: Style, text: &str) -> String {
    paint_with(use_colors(), style, text)
}

// ---------------------------------------------------------------------------
// Banner
// ---------------------------------------------------------------------------

/// Key/value block printed before the first query.
///
/// ```text
/// trec-pager
///   index       corpus.json (1204 docs, field contents)
///   queries     topics.txt
///   run file    run.txt
/// ```
#[derive(Debug, Default)]
pub struct Banner {
    title: String,
    rows: Vec<(String, String)>,
}

impl Banner {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, key: &str, value: impl Into<String>) -> Self {
        self.rows.push((key.to_string(), value.into()));
        self
    }

    fn render(&self, colors: bool) -> String {
        let width = self.rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0) + 2;
        let mut out = paint_with(colors, Style::Heading, &self.title);
        out.push('\n');
        for (key, value) in &self.rows {
            let key = paint_with(colors, Style::Key, &format!("{:<width$}", key));
            let _ = writeln!(out, "  {}{}", key, value);
        }
        out
    }

    pub fn print(&self) {
        eprint!("{}", self.render(use_colors()));
    }
}

// ---------------------------------------------------------------------------
// Status lines
// ---------------------------------------------------------------------------

pub fn ok(message: &str) -> String {
    format!("{} {}", paint(Style::Good, "ok:"), message)
}

pub fn warning(message: &str) -> String {
    format!("{} {}", paint(Style::Warn, "warning:"), message)
}

pub fn failure(message: &str) -> String {
    format!("{} {}", paint(Style::Bad, "error:"), message)
}

/// A count, dimmed when zero and flagged when it is a problem count.
pub fn count(value: usize, problem: bool) -> String {
    let style = match (value, problem) {
        (0, _) => Style::Dim,
        (_, true) => Style::Warn,
        (_, false) => Style::Good,
    };
    paint(style, &value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_aligns_values() {
        let banner = Banner::new("trec-pager")
            .row("index", "corpus.json")
            .row("run file", "run.txt");
        assert_eq!(
            banner.render(false),
            "trec-pager\n  index     corpus.json\n  run file  run.txt\n"
        );
    }

    #[test]
    fn test_plain_paint_has_no_escapes() {
        assert_eq!(paint_with(false, Style::Bad, "boom"), "boom");
        assert_eq!(paint_with(true, Style::Good, "7"), "\x1b[32m7\x1b[0m");
    }

    #[test]
    fn test_empty_banner_is_just_the_title() {
        assert_eq!(Banner::new("t").render(false), "t\n");
    }
}
