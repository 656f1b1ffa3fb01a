//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides a scripted ranking service that records every fetch so tests
//! can assert exactly when escalation happened.

#![doc(hidden)]

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::query::Query;
use crate::ranking::{DocumentStore, RankingService};
use crate::types::{DocFields, DocRef, TopHits};

/// Ranking service with a fixed, pre-ordered result list for every query.
#[derive(Debug, Default)]
pub struct ScriptedRanking {
    docs: Vec<(DocFields, f32)>,
    requested: RefCell<Vec<usize>>,
}

impl ScriptedRanking {
    /// `docs` in rank order with their scores.
    pub fn new(docs: Vec<(DocFields, f32)>) -> Self {
        Self {
            docs,
            requested: RefCell::new(Vec::new()),
        }
    }

    /// `n` documents with strictly descending scores and every field set.
    pub fn uniform(n: usize) -> Self {
        Self::new((0..n).map(|i| (make_fields(i), (n - i) as f32)).collect())
    }

    /// `k` of every `search` call, in call order.
    pub fn requested(&self) -> Vec<usize> {
        self.requested.borrow().clone()
    }

    pub fn calls(&self) -> usize {
        self.requested.borrow().len()
    }
}

impl RankingService for ScriptedRanking {
    fn search(&self, _query: &Query, k: usize) -> Result<TopHits> {
        self.requested.borrow_mut().push(k);
        let scored = self
            .docs
            .iter()
            .take(k)
            .enumerate()
            .map(|(i, (_, score))| (DocRef(i as u32), *score));
        Ok(TopHits::from_scored(scored, self.docs.len()))
    }
}

impl DocumentStore for ScriptedRanking {
    fn fields(&self, doc: DocRef) -> Result<DocFields> {
        self.docs
            .get(doc.as_usize())
            .map(|(fields, _)| fields.clone())
            .ok_or_else(|| Error::Ranking(format!("unknown document {}", doc)))
    }
}

/// Ranking service that always fails, for error-path tests.
#[derive(Debug, Default)]
pub struct FailingRanking;

impl RankingService for FailingRanking {
    fn search(&self, _query: &Query, _k: usize) -> Result<TopHits> {
        Err(Error::Ranking("index unavailable".to_string()))
    }
}

impl DocumentStore for FailingRanking {
    fn fields(&self, doc: DocRef) -> Result<DocFields> {
        Err(Error::Ranking(format!("unknown document {}", doc)))
    }
}

/// Fully populated fields for document `i`.
pub fn make_fields(i: usize) -> DocFields {
    DocFields {
        path: Some(format!("/doc/{}", i)),
        docid: Some(format!("D{}", i)),
        initial_path: Some(format!("doc-{}", i)),
        docpath: Some(format!("collection/doc-{}", i)),
        url: Some(format!("http://example.org/{}", i)),
        journal: Some("Example Journal".to_string()),
        date: Some("1994-01-01".to_string()),
        contents: Some(format!("contents of document {}", i)),
        title: Some(format!("Document {}", i)),
    }
}

/// Fields with just a path and contents.
pub fn make_path_fields(path: &str, contents: &str) -> DocFields {
    DocFields {
        path: Some(path.to_string()),
        initial_path: Some(path.trim_start_matches('/').to_string()),
        contents: Some(contents.to_string()),
        ..Default::default()
    }
}
