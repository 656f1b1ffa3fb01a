// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! When to go back to the ranking service for everything.
//!
//! The first fetch is bounded so the first page shows up fast. Escalation is
//! the single full re-fetch (`k = total`) made when a requested window runs
//! past what that first fetch materialized. It is a one-way ratchet: once the
//! buffer is complete, `needs_escalation` is false for the rest of the query.

use tracing::{debug, info};

use super::HitBuffer;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::query::Query;
use crate::ranking::RankingService;

/// Fetch sizing policy for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Escalator {
    page_size: usize,
}

impl Escalator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.page_size)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// One page. Anything past it is left for escalation.
    pub fn initial_fetch_size(&self) -> usize {
        self.page_size
    }

    /// True when showing hits up to `requested_end` needs more than the buffer
    /// holds and the buffer is not already the whole result set.
    pub fn needs_escalation(&self, buffer: &HitBuffer, requested_end: usize) -> bool {
        !buffer.is_complete() && requested_end > buffer.len() && buffer.len() < buffer.total()
    }

    /// First, bounded fetch for a fresh query.
    pub fn fetch_initial<S>(&self, service: &S, query: &Query) -> Result<HitBuffer>
    where
        S: RankingService + ?Sized,
    {
        let k = self.initial_fetch_size();
        let top = service.search(query, k)?;
        debug!(k, got = top.len(), total = top.total, "initial fetch");
        Ok(HitBuffer::from_fetch(top, k))
    }

    /// Re-fetch the full result set into `buffer`.
    ///
    /// Returns `false` without calling the service when the buffer is already
    /// complete.
    pub fn escalate<S>(&self, service: &S, query: &Query, buffer: &mut HitBuffer) -> Result<bool>
    where
        S: RankingService + ?Sized,
    {
        if buffer.is_complete() {
            return Ok(false);
        }
        let k = buffer.total();
        info!(
            have = buffer.len(),
            total = k,
            "escalating to full fetch for '{}'",
            query.primary_display()
        );
        let top = service.search(query, k)?;
        buffer.absorb_full(top);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRanking;

    fn query() -> Query {
        Query::parse("cats", "contents").unwrap()
    }

    #[test]
    fn test_initial_fetch_is_one_page() {
        assert_eq!(Escalator::new(1000).initial_fetch_size(), 1000);
        assert_eq!(Escalator::new(10).initial_fetch_size(), 10);
        assert_eq!(Escalator::new(0).initial_fetch_size(), 1);
    }

    #[test]
    fn test_no_escalation_within_buffer() {
        let service = ScriptedRanking::uniform(1500);
        let esc = Escalator::new(1000);
        let buffer = esc.fetch_initial(&service, &query()).unwrap();
        assert_eq!(buffer.len(), 1000);
        assert!(!esc.needs_escalation(&buffer, 1000));
        assert!(esc.needs_escalation(&buffer, 1500));
    }

    #[test]
    fn test_escalation_fetches_total_once() {
        let service = ScriptedRanking::uniform(1500);
        let esc = Escalator::new(1000);
        let mut buffer = esc.fetch_initial(&service, &query()).unwrap();

        assert!(esc.escalate(&service, &query(), &mut buffer).unwrap());
        assert_eq!(buffer.len(), 1500);
        assert!(buffer.is_complete());
        assert_eq!(service.requested(), vec![1000, 1500]);

        assert!(!esc.escalate(&service, &query(), &mut buffer).unwrap());
        assert!(!esc.needs_escalation(&buffer, 1500));
        assert_eq!(service.calls(), 2);
    }

    #[test]
    fn test_small_result_set_is_complete_after_first_fetch() {
        let service = ScriptedRanking::uniform(3);
        let esc = Escalator::new(1000);
        let buffer = esc.fetch_initial(&service, &query()).unwrap();
        assert!(buffer.is_complete());
        assert!(!esc.needs_escalation(&buffer, 1000));
    }
}
