// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! In-memory BM25 over a JSON corpus.
//!
//! The corpus file is a JSON array of objects whose keys are the stored field
//! names (`path`, `docid`, `initial_path`, `docpath`, `url`, `journal`, `date`,
//! `contents`, `title`). One field is tokenized into an inverted index; the
//! rest are only stored.
//!
//! Scoring is Lucene-flavoured BM25:
//!
//! ```text
//! idf(t)      = ln(1 + (N - n_t + 0.5) / (n_t + 0.5))
//! score(d, t) = idf(t) * tf / (tf + k1 * (1 - b + b * |d| / avgdl))
//! ```
//!
//! Query terms are OR'ed; a document's score is the sum over matching terms.
//! Equal scores are ordered by ascending `DocRef` so that every prefix of a
//! long result list matches a shorter search exactly.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::{DocumentStore, RankingService};
use crate::error::{Error, Result};
use crate::query::Query;
use crate::types::{DocFields, DocRef, TopHits};

/// BM25 free parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        // Tuned for long newswire documents.
        Self { k1: 1.4, b: 0.9 }
    }
}

/// A posting: document and term frequency within the indexed field.
#[derive(Debug, Clone, Copy)]
struct Posting {
    doc: DocRef,
    tf: u32,
}

/// Stored documents plus an inverted index over one field.
#[derive(Debug)]
pub struct Corpus {
    docs: Vec<DocFields>,
    field: String,
    postings: HashMap<String, Vec<Posting>>,
    doc_lens: Vec<u32>,
    avg_len: f32,
    params: Bm25Params,
}

impl Corpus {
    /// Read and index a JSON corpus file.
    pub fn load(path: &Path, field: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Corpus(format!("Failed to read {}: {}", path.display(), e)))?;
        let docs: Vec<DocFields> = serde_json::from_str(&content)
            .map_err(|e| Error::Corpus(format!("Invalid corpus JSON in {}: {}", path.display(), e)))?;
        let corpus = Self::from_docs(docs, field)?;
        info!(
            docs = corpus.len(),
            terms = corpus.postings.len(),
            field,
            "loaded corpus from {}",
            path.display()
        );
        Ok(corpus)
    }

    /// Index `docs` on `field` with default BM25 parameters.
    pub fn from_docs(docs: Vec<DocFields>, field: &str) -> Result<Self> {
        Self::with_params(docs, field, Bm25Params::default())
    }

    pub fn with_params(docs: Vec<DocFields>, field: &str, params: Bm25Params) -> Result<Self> {
        if docs.is_empty() {
            return Err(Error::Corpus("corpus contains no documents".to_string()));
        }
        if docs.len() > u32::MAX as usize {
            return Err(Error::Corpus(format!("too many documents: {}", docs.len())));
        }

        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lens = Vec::with_capacity(docs.len());

        for (id, doc) in docs.iter().enumerate() {
            let text = doc.get(field).unwrap_or("").to_lowercase();
            let mut tfs: HashMap<&str, u32> = HashMap::new();
            let mut len = 0u32;
            for token in tokens(&text) {
                *tfs.entry(token).or_insert(0) += 1;
                len += 1;
            }
            doc_lens.push(len);
            for (term, tf) in tfs {
                postings
                    .entry(term.to_string())
                    .or_default()
                    .push(Posting {
                        doc: DocRef(id as u32),
                        tf,
                    });
            }
        }

        let total_len: u64 = doc_lens.iter().map(|&l| u64::from(l)).sum();
        let avg_len = (total_len as f32 / doc_lens.len() as f32).max(f32::MIN_POSITIVE);

        Ok(Corpus {
            docs,
            field: field.to_string(),
            postings,
            doc_lens,
            avg_len,
            params,
        })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Name of the indexed field.
    pub fn field(&self) -> &str {
        &self.field
    }

    fn idf(&self, doc_freq: usize) -> f32 {
        let n = self.docs.len() as f32;
        let df = doc_freq as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    fn term_score(&self, idf: f32, posting: Posting) -> f32 {
        let Bm25Params { k1, b } = self.params;
        let tf = posting.tf as f32;
        let dl = self.doc_lens[posting.doc.as_usize()] as f32;
        idf * tf / (tf + k1 * (1.0 - b + b * dl / self.avg_len))
    }
}

impl RankingService for Corpus {
    fn search(&self, query: &Query, k: usize) -> Result<TopHits> {
        if query.field() != self.field() {
            return Err(Error::Ranking(format!(
                "query targets field '{}' but the corpus indexes '{}'",
                query.field(),
                self.field()
            )));
        }
        let mut scores: HashMap<DocRef, f32> = HashMap::new();
        for term in query.terms() {
            let Some(list) = self.postings.get(term) else {
                continue;
            };
            let idf = self.idf(list.len());
            for &posting in list {
                *scores.entry(posting.doc).or_insert(0.0) += self.term_score(idf, posting);
            }
        }

        let total = scores.len();
        let mut ranked: Vec<(DocRef, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| match b.1.total_cmp(&a.1) {
            Ordering::Equal => a.0.cmp(&b.0),
            ord => ord,
        });
        ranked.truncate(k);

        debug!(k, total, returned = ranked.len(), "bm25 search");
        Ok(TopHits::from_scored(ranked, total))
    }
}

impl DocumentStore for Corpus {
    fn fields(&self, doc: DocRef) -> Result<DocFields> {
        self.docs
            .get(doc.as_usize())
            .cloned()
            .ok_or_else(|| Error::Ranking(format!("unknown document {}", doc)))
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
}
