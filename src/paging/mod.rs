// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Lazily materialized result pages.
//!
//! A `PageWindow` is built fresh for every query and owns that query's hit
//! buffer exclusively. Nothing in here survives into the next query.
//!
//! # Invariants
//!
//! - `0 <= start <= total`
//! - `start <= end <= min(buffer.len(), total)` whenever the buffer covers
//!   `start` (always true after `materialize`)
//! - `buffer.len()` never decreases, and `buffer.total()` never decreases

pub mod escalator;

use std::ops::Range;

use tracing::warn;

use crate::error::Result;
use crate::query::Query;
use crate::ranking::RankingService;
use crate::types::{RankedHit, TopHits};

pub use escalator::Escalator;

// =============================================================================
// HIT BUFFER
// =============================================================================

/// Hits materialized so far plus the best-known match count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitBuffer {
    hits: Vec<RankedHit>,
    total: usize,
    complete: bool,
}

impl HitBuffer {
    /// Wrap the result of a `search(query, requested)` call.
    pub fn from_fetch(top: TopHits, requested: usize) -> Self {
        let len = top.hits.len();
        // A service that returns fewer hits than asked for has nothing more to give.
        let complete = len >= top.total || len < requested;
        HitBuffer {
            total: top.total.max(len),
            hits: top.hits,
            complete,
        }
    }

    /// Replace the contents with a full re-fetch.
    ///
    /// The buffer only ever grows: a re-fetch that comes back shorter than what
    /// is already held (the index changed underneath us) is ignored.
    pub(crate) fn absorb_full(&mut self, top: TopHits) {
        if top.hits.len() < self.hits.len() {
            warn!(
                have = self.hits.len(),
                got = top.hits.len(),
                "full fetch returned fewer hits than already buffered; keeping buffer"
            );
        } else {
            self.hits = top.hits;
        }
        self.total = self.total.max(top.total).max(self.hits.len());
        self.complete = true;
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the buffer holds every hit the service will ever return.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn hits(&self) -> &[RankedHit] {
        &self.hits
    }
}

// =============================================================================
// PAGE WINDOW
// =============================================================================

/// Navigation state for one query: display offset, page size, and the buffer.
#[derive(Debug, Clone)]
pub struct PageWindow {
    start: usize,
    buffer: HitBuffer,
    escalator: Escalator,
}

impl PageWindow {
    /// Run the initial bounded fetch and position on the first page.
    pub fn open<S>(service: &S, query: &Query, escalator: Escalator) -> Result<Self>
    where
        S: RankingService + ?Sized,
    {
        let buffer = escalator.fetch_initial(service, query)?;
        Ok(Self::from_buffer(buffer, escalator))
    }

    pub fn from_buffer(buffer: HitBuffer, escalator: Escalator) -> Self {
        PageWindow {
            start: 0,
            buffer,
            escalator,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn page_size(&self) -> usize {
        self.escalator.page_size()
    }

    pub fn total(&self) -> usize {
        self.buffer.total()
    }

    pub fn buffer(&self) -> &HitBuffer {
        &self.buffer
    }

    /// End of the window the user asked for, ignoring what is buffered.
    pub fn requested_end(&self) -> usize {
        self.total().min(self.start.saturating_add(self.page_size()))
    }

    /// End of the window that can actually be shown.
    pub fn end(&self) -> usize {
        self.requested_end().min(self.buffer.len()).max(self.start)
    }

    pub fn visible_range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Hits on the current page, in rank order.
    pub fn visible(&self) -> &[RankedHit] {
        let range = self.visible_range();
        self.buffer
            .hits()
            .get(range)
            .unwrap_or_default()
    }

    /// True when the current page runs past the buffer and a full fetch would
    /// fill it.
    pub fn is_short(&self) -> bool {
        self.escalator
            .needs_escalation(&self.buffer, self.requested_end())
    }

    /// Full re-fetch. No-op once the buffer is complete.
    pub fn escalate<S>(&mut self, service: &S, query: &Query) -> Result<bool>
    where
        S: RankingService + ?Sized,
    {
        self.escalator.escalate(service, query, &mut self.buffer)
    }

    /// Move to `requested_start` and make sure its page is buffered.
    ///
    /// A start at or beyond the match count yields an empty range and leaves
    /// the window and the service untouched.
    pub fn materialize<S>(
        &mut self,
        requested_start: usize,
        service: &S,
        query: &Query,
    ) -> Result<Range<usize>>
    where
        S: RankingService + ?Sized,
    {
        if requested_start >= self.total() {
            let at = self.buffer.len().min(self.total());
            return Ok(at..at);
        }
        self.start = requested_start;
        if self.is_short() {
            self.escalate(service, query)?;
        }
        Ok(self.visible_range())
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub fn has_previous(&self) -> bool {
        self.start > 0
    }

    pub fn has_next(&self) -> bool {
        self.start.saturating_add(self.page_size()) < self.total()
    }

    /// Step back one page, clamping at the first.
    pub fn previous(&mut self) {
        self.start = self.start.saturating_sub(self.page_size());
    }

    /// Step forward one page if there is one. Returns whether it moved.
    pub fn next(&mut self) -> bool {
        if self.has_next() {
            self.start += self.page_size();
            true
        } else {
            false
        }
    }

    /// Jump to 1-based `page`. Returns `false` (and stays put) if no such page.
    pub fn jump(&mut self, page: usize) -> bool {
        let Some(offset) = page
            .checked_sub(1)
            .and_then(|p| p.checked_mul(self.page_size()))
        else {
            return false;
        };
        if offset < self.total() {
            self.start = offset;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRanking;
    use crate::types::DocRef;

    fn query() -> Query {
        Query::parse("cats", "contents").unwrap()
    }

    fn window(total: usize, page_size: usize) -> (ScriptedRanking, PageWindow) {
        let service = ScriptedRanking::uniform(total);
        let window = PageWindow::open(&service, &query(), Escalator::new(page_size)).unwrap();
        (service, window)
    }

    #[test]
    fn test_open_shows_first_page() {
        let (_, w) = window(25, 10);
        assert_eq!(w.visible_range(), 0..10);
        assert_eq!(w.visible()[0].rank, 0);
        assert_eq!(w.total(), 25);
    }

    #[test]
    fn test_escalates_when_page_passes_buffer() {
        let (service, mut w) = window(1500, 1000);
        assert_eq!(w.buffer().len(), 1000);

        let range = w.materialize(1000, &service, &query()).unwrap();
        assert_eq!(range, 1000..1500);
        assert_eq!(w.buffer().len(), 1500);
        assert_eq!(service.requested(), vec![1000, 1500]);
    }

    #[test]
    fn test_materialize_past_total_is_empty_and_silent() {
        let (service, mut w) = window(30, 10);
        let range = w.materialize(30, &service, &query()).unwrap();
        assert!(range.is_empty());
        assert_eq!(service.calls(), 1);
    }

    #[test]
    fn test_last_page_is_partial() {
        let (service, mut w) = window(25, 10);
        let range = w.materialize(20, &service, &query()).unwrap();
        assert_eq!(range, 20..25);
    }

    #[test]
    fn test_previous_clamps_at_zero() {
        let (_, mut w) = window(25, 10);
        w.previous();
        assert_eq!(w.start(), 0);
    }

    #[test]
    fn test_next_stops_at_last_page() {
        let (_, mut w) = window(25, 10);
        assert!(w.next());
        assert!(w.next());
        assert_eq!(w.start(), 20);
        assert!(!w.next());
        assert_eq!(w.start(), 20);
    }

    #[test]
    fn test_jump_bounds() {
        let (_, mut w) = window(25, 10);
        assert!(w.jump(3));
        assert_eq!(w.start(), 20);
        assert!(!w.jump(4));
        assert!(!w.jump(0));
        assert_eq!(w.start(), 20);
        assert!(w.jump(1));
        assert_eq!(w.start(), 0);
    }

    #[test]
    fn test_empty_result_set() {
        let (_, w) = window(0, 10);
        assert!(w.visible().is_empty());
        assert!(!w.has_next());
        assert!(!w.is_short());
    }

    #[test]
    fn test_huge_page_size_does_not_overflow() {
        let (service, mut w) = window(30, usize::MAX);
        assert_eq!(w.visible_range(), 0..30);
        assert!(!w.has_next());

        let range = w.materialize(5, &service, &query()).unwrap();
        assert_eq!(range, 5..30);
        assert!(!w.has_next());
        assert!(!w.next());
        assert!(!w.jump(2));
    }

    #[test]
    fn test_short_refetch_keeps_buffer() {
        let first = TopHits::from_scored((0..5).map(|i| (DocRef(i), 1.0)), 10);
        let mut buffer = HitBuffer::from_fetch(first, 5);
        buffer.absorb_full(TopHits::from_scored((0..3).map(|i| (DocRef(i), 1.0)), 10));
        assert_eq!(buffer.len(), 5);
        assert!(buffer.is_complete());
    }
}
