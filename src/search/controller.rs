//! Debounced, latest-query-wins global search state.
//!
//! The controller never talks to the directory itself. It decides *when* a
//! query is due ([`SearchController::poll`]) and *whether* a response may be
//! applied ([`SearchController::complete`]). Every query change bumps a
//! generation counter; a response is applied only if it carries the current
//! generation, so results land in query-issue order regardless of arrival.

use std::time::Instant;

use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::error::DirectoryError;
use crate::record::ContactRecord;

/// A query that has been issued to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Generation current when the query was issued.
    pub generation: u64,
    /// Trimmed query text.
    pub query: String,
}

/// The most recently applied search response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResultSet {
    /// Query that produced these records; `None` before any search.
    pub query: Option<String>,
    /// Global hits for `query`; empty after a failure.
    pub records: Vec<ContactRecord>,
}

#[derive(Debug, Clone)]
struct PendingQuery {
    query: String,
    due_at: Instant,
}

/// Debounce and race-safety for the global search.
#[derive(Debug)]
pub struct SearchController {
    config: ResolverConfig,
    generation: u64,
    pending: Option<PendingQuery>,
    results: SearchResultSet,
}

impl SearchController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            generation: 0,
            pending: None,
            results: SearchResultSet::default(),
        }
    }

    /// Records a change of the free-text input.
    ///
    /// Anything issued before this call is superseded. A new query is
    /// scheduled only when the draft is unbound and the trimmed text is long
    /// enough; otherwise the result set is emptied.
    pub fn on_query_change(&mut self, text: &str, bound: bool, now: Instant) {
        self.generation += 1;
        let query = text.trim();

        if bound || query.chars().count() < self.config.min_query_len {
            self.pending = None;
            self.results = SearchResultSet::default();
            return;
        }

        self.pending = Some(PendingQuery {
            query: query.to_string(),
            due_at: now + self.config.debounce(),
        });
    }

    /// Issues the pending query once its debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<SearchTicket> {
        if self.pending.as_ref().is_some_and(|p| p.due_at <= now) {
            let pending = self.pending.take()?;
            let ticket = SearchTicket {
                generation: self.generation,
                query: pending.query,
            };
            debug!(generation = ticket.generation, query = %ticket.query, "issuing global search");
            return Some(ticket);
        }
        None
    }

    /// Earliest instant at which [`poll`](Self::poll) will issue a query.
    #[must_use]
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due_at)
    }

    /// Applies a directory response if it is still current.
    ///
    /// Returns true if the result set changed hands. Failures are absorbed:
    /// the result set becomes empty and nothing is propagated.
    pub fn complete(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<Vec<ContactRecord>, DirectoryError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                query = %ticket.query,
                "discarding stale search response"
            );
            return false;
        }

        let records = match outcome {
            Ok(records) => records,
            Err(err) => {
                warn!(query = %ticket.query, error = %err, "global search failed; showing no matches");
                Vec::new()
            }
        };

        self.results = SearchResultSet {
            query: Some(ticket.query.clone()),
            records,
        };
        true
    }

    /// Supersedes anything pending or in flight but keeps the current results.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.pending = None;
    }

    /// Supersedes everything and empties the result set.
    pub fn reset(&mut self) {
        self.invalidate();
        self.results = SearchResultSet::default();
    }

    /// The latest applied result set.
    #[must_use]
    pub const fn results(&self) -> &SearchResultSet {
        &self.results
    }

    /// Current generation counter.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// True if a query is waiting for its debounce window.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
