// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The records that flow between the ranking service, the pager, and the writers.
//!
//! # Invariants
//!
//! - **RankedHit**: `rank` is the zero-based position in the query-wide ranked
//!   list. It is assigned once by the ranking service and never renumbered, so
//!   page 3 of a query still reports rank 2000, not rank 0.
//!
//! - **TopHits**: `hits.len() <= total` and hits are sorted by descending score
//!   with `hits[i].rank == i`.
//!
//! - **DocFields**: every field is optional. A missing field is a normal state
//!   that means "leave it out of the output", never an error.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Opaque handle to a document in the document store.
///
/// Only the ranking service hands these out; the pager and writers pass them
/// back to the store without interpreting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DocRef(pub u32);

impl DocRef {
    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocRef {
    fn from(id: u32) -> Self {
        DocRef(id)
    }
}

impl fmt::Display for DocRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// RANKED RESULTS
// =============================================================================

/// A single scored result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    /// Zero-based position in the full ranked list.
    pub rank: usize,
    pub doc: DocRef,
    pub score: f32,
}

/// What a ranking service returns for `search(query, k)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TopHits {
    /// At most `k` hits, best first.
    pub hits: Vec<RankedHit>,
    /// Number of documents matching the query, independent of `k`.
    pub total: usize,
}

impl TopHits {
    /// Build from `(doc, score)` pairs already in rank order, assigning ranks.
    pub fn from_scored(scored: impl IntoIterator<Item = (DocRef, f32)>, total: usize) -> Self {
        let hits = scored
            .into_iter()
            .enumerate()
            .map(|(rank, (doc, score))| RankedHit { rank, doc, score })
            .collect();
        TopHits { hits, total }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

// =============================================================================
// DOCUMENT FIELDS
// =============================================================================

/// Stored fields of one document, as read from the document store.
///
/// Field names match the stored keys so a corpus file deserializes directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocFields {
    pub path: Option<String>,
    pub docid: Option<String>,
    pub initial_path: Option<String>,
    pub docpath: Option<String>,
    pub url: Option<String>,
    pub journal: Option<String>,
    pub date: Option<String>,
    pub contents: Option<String>,
    pub title: Option<String>,
}

impl DocFields {
    /// Look a field up by its stored name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "path" => &self.path,
            "docid" => &self.docid,
            "initial_path" => &self.initial_path,
            "docpath" => &self.docpath,
            "url" => &self.url,
            "journal" => &self.journal,
            "date" => &self.date,
            "contents" => &self.contents,
            "title" => &self.title,
            _ => return None,
        };
        value.as_deref()
    }

    /// Identifier written in the docno column of a run line.
    ///
    /// Collections indexed from their original file layout store it as
    /// `initial_path`; others only carry `docid`.
    pub fn run_doc_id(&self) -> &str {
        self.initial_path
            .as_deref()
            .or(self.docid.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scored_assigns_ranks_in_order() {
        let top = TopHits::from_scored(vec![(DocRef(7), 3.0), (DocRef(2), 1.5)], 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top.hits[0].rank, 0);
        assert_eq!(top.hits[0].doc, DocRef(7));
        assert_eq!(top.hits[1].rank, 1);
        assert_eq!(top.total, 10);
    }

    #[test]
    fn test_doc_fields_missing_keys_deserialize_as_none() {
        let json = r#"{"path": "/a", "contents": "cats"}"#;
        let fields: DocFields = serde_json::from_str(json).unwrap();
        assert_eq!(fields.path.as_deref(), Some("/a"));
        assert_eq!(fields.url, None);
        assert_eq!(fields.get("contents"), Some("cats"));
        assert_eq!(fields.get("nonexistent"), None);
    }

    #[test]
    fn test_run_doc_id_prefers_initial_path() {
        let mut fields = DocFields {
            docid: Some("D1".to_string()),
            ..Default::default()
        };
        assert_eq!(fields.run_doc_id(), "D1");
        fields.initial_path = Some("2019/03/a.txt".to_string());
        assert_eq!(fields.run_doc_id(), "2019/03/a.txt");
        assert_eq!(DocFields::default().run_doc_id(), "");
    }
}
