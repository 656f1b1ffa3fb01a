//! Benchmarks for the paging hot paths.
//!
//! - BM25 search over a synthetic corpus at bounded and full `k`
//! - Walking every page of a large result set (initial fetch + escalation)
//! - Run-line formatting
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use trec_pager::testing::{make_fields, ScriptedRanking};
use trec_pager::{format_run_line, Corpus, DocFields, Escalator, PageWindow, Query, RankingService};

// ============================================================================
// SYNTHETIC CORPUS
// ============================================================================

const VOCAB: &[&str] = &[
    "crime", "international", "organized", "trade", "policy", "market", "court", "report",
    "energy", "health", "science", "election", "budget", "school", "river", "storm",
];

/// Deterministic pseudo-random documents (LCG, so runs are comparable).
fn synthetic_corpus(docs: usize, words_per_doc: usize) -> Corpus {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let docs = (0..docs)
        .map(|i| {
            let words: Vec<&str> = (0..words_per_doc)
                .map(|_| {
                    state = state
                        .wrapping_mul(6_364_136_223_846_793_005)
                        .wrapping_add(1);
                    VOCAB[(state >> 33) as usize % VOCAB.len()]
                })
                .collect();
            DocFields {
                contents: Some(words.join(" ")),
                ..make_fields(i)
            }
        })
        .collect();
    Corpus::from_docs(docs, "contents").expect("non-empty corpus")
}

fn bench_search(c: &mut Criterion) {
    let corpus = synthetic_corpus(5_000, 200);
    let query = Query::parse("international organized crime", "contents").unwrap();

    let mut group = c.benchmark_group("bm25_search");
    for k in [100usize, 1_000, 5_000] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| corpus.search(black_box(&query), k).unwrap())
        });
    }
    group.finish();
}

fn bench_page_walk(c: &mut Criterion) {
    let query = Query::parse("cats", "contents").unwrap();

    let mut group = c.benchmark_group("page_walk");
    for page_size in [10usize, 100, 1_000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(page_size),
            &page_size,
            |b, &page_size| {
                b.iter_batched(
                    || ScriptedRanking::uniform(10_000),
                    |service| {
                        let mut window =
                            PageWindow::open(&service, &query, Escalator::new(page_size))
                                .unwrap();
                        let mut start = 0;
                        let mut seen = 0;
                        while start < window.total() {
                            seen += window.materialize(start, &service, &query).unwrap().len();
                            start += page_size;
                        }
                        black_box(seen)
                    },
                    criterion::BatchSize::LargeInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_run_line(c: &mut Criterion) {
    let fields = make_fields(42);
    c.bench_function("format_run_line", |b| {
        b.iter(|| format_run_line(black_box("301"), &fields, 42, 12.375, "BM25_paged"))
    });
}

criterion_group!(benches, bench_search, bench_page_walk, bench_run_line);
criterion_main!(benches);
