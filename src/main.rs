// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{self, BufRead, BufReader};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trec_pager::{Corpus, Navigator, ReportWriter, SessionConfig, SessionSummary};

mod cli;
use cli::{display, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}", display::failure(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    // RUST_LOG wins; otherwise warn, or info with --verbose.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "info" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.session_config();
    config.validate()?;

    let corpus = Corpus::load(&cli.index, &config.field)
        .with_context(|| format!("cannot open index {}", cli.index.display()))?;
    let writer = ReportWriter::from_config(&cli.run_file, &cli.report_file, &config);

    let interactive = cli.reads_stdin() && atty::is(atty::Stream::Stdin);
    print_banner(cli, &config, &corpus, &writer, interactive);

    let summary = if let Some(query) = cli.query.as_deref() {
        drive(&corpus, &writer, &config, io::empty(), false, Some(query))?
    } else if cli.reads_stdin() {
        drive(&corpus, &writer, &config, io::stdin().lock(), interactive, None)?
    } else {
        let file = File::open(&cli.queries)
            .with_context(|| format!("cannot open queries file {}", cli.queries))?;
        drive(&corpus, &writer, &config, BufReader::new(file), false, None)?
    };

    print_summary(&writer, summary);
    Ok(())
}

fn drive<R: BufRead>(
    corpus: &Corpus,
    writer: &ReportWriter,
    config: &SessionConfig,
    input: R,
    interactive: bool,
    single: Option<&str>,
) -> trec_pager::Result<SessionSummary> {
    let stdout = io::stdout();
    let mut navigator =
        Navigator::new(corpus, writer, config, input, stdout.lock()).interactive(interactive);
    navigator.run_session(single)
}

fn print_banner(
    cli: &Cli,
    config: &SessionConfig,
    corpus: &Corpus,
    writer: &ReportWriter,
    interactive: bool,
) {
    let queries = match cli.query.as_deref() {
        Some(query) => format!("--query {:?}", query),
        None if cli.reads_stdin() => "stdin".to_string(),
        None => cli.queries.clone(),
    };
    let mut banner = display::Banner::new("trec-pager")
        .row(
            "index",
            format!("{} ({} docs, field {})", cli.index.display(), corpus.len(), corpus.field()),
        )
        .row("queries", queries)
        .row("page size", config.page_size.to_string());
    banner = if writer.is_raw() {
        banner.row("output", "raw, no files written")
    } else {
        banner
            .row("run file", writer.run_path().display().to_string())
            .row("report file", writer.report_path().display().to_string())
            .row("run tag", config.run_tag.as_str())
    };
    banner
        .row("mode", if interactive { "interactive" } else { "batch" })
        .print();
}

fn print_summary(writer: &ReportWriter, summary: SessionSummary) {
    if summary.skipped > 0 {
        eprintln!(
            "{}",
            display::warning(&format!(
                "{} hits had no path and were skipped",
                display::count(summary.skipped, true)
            ))
        );
    }
    if writer.is_raw() {
        eprintln!(
            "{}",
            display::ok(&format!(
                "{} queries, {} hits printed",
                display::count(summary.queries, false),
                display::count(summary.emitted, false)
            ))
        );
        return;
    }
    eprintln!(
        "{}",
        display::ok(&format!(
            "{} queries, {} run lines appended to {}",
            display::count(summary.queries, false),
            display::count(summary.emitted, false),
            writer.run_path().display()
        ))
    );
}
