// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The two collaborators the pager consumes: something that ranks, and
//! something that returns stored fields for a ranked document.
//!
//! The pager never looks inside either. `corpus::Corpus` is a small in-memory
//! BM25 engine that implements both so the binary works on a JSON corpus, but
//! any engine that keeps the ordering contract below can stand in.

pub mod corpus;

use crate::error::Result;
use crate::query::Query;
use crate::types::{DocFields, DocRef, TopHits};

pub use corpus::{Bm25Params, Corpus};

/// Produces a ranked hit list for a query.
///
/// # Contract
///
/// - Hits come back in descending score order with `rank == position`.
/// - `total` is the number of matching documents, independent of `k`.
/// - Ties are broken deterministically, so `search(q, big).hits[..n]` equals
///   `search(q, n).hits` for an unchanged index. Escalation relies on this:
///   a full re-fetch must reproduce the prefix the user has already seen.
pub trait RankingService {
    fn search(&self, query: &Query, k: usize) -> Result<TopHits>;
}

/// Read-only lookup of stored document fields.
pub trait DocumentStore {
    fn fields(&self, doc: DocRef) -> Result<DocFields>;
}

impl<T: RankingService + ?Sized> RankingService for &T {
    fn search(&self, query: &Query, k: usize) -> Result<TopHits> {
        (**self).search(query, k)
    }
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn fields(&self, doc: DocRef) -> Result<DocFields> {
        (**self).fields(doc)
    }
}
