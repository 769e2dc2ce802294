use tracing::{debug, warn};

use super::model::FetchState;
use crate::lookup::{LookupEvent, LookupRequest};

/// Owns the settled query and the request generation counter. Every
/// request carries the generation it was issued under; a completion whose
/// generation no longer matches belongs to a superseded query and is
/// dropped at resolution time, whatever order responses arrive in.
#[derive(Debug)]
pub struct Fetcher {
    generation: u64,
    state: FetchState,
}

impl Fetcher {
    pub fn new() -> Self {
        Self {
            generation: 0,
            state: FetchState::Idle,
        }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Accepts a newly settled query. An empty query short-circuits to
    /// `Idle` with no request; anything else gets a fresh generation and a
    /// request to hand to the worker. Identical queries settled twice are
    /// fetched twice; there is no cache.
    pub fn settle(&mut self, text: &str) -> Option<LookupRequest> {
        self.generation = self.generation.wrapping_add(1);

        if text.is_empty() {
            self.state = FetchState::Idle;
            return None;
        }

        self.state = FetchState::Pending {
            query: text.to_string(),
        };
        Some(LookupRequest {
            generation: self.generation,
            query: text.to_string(),
        })
    }

    /// Applies a completion; returns false when it was stale and ignored.
    pub fn apply(&mut self, event: LookupEvent) -> bool {
        let LookupEvent::Finished {
            generation,
            query,
            result,
        } = event;

        if generation != self.generation {
            debug!(%query, generation, live = self.generation, "dropping stale lookup response");
            return false;
        }

        self.state = match result {
            Ok(entries) => FetchState::Resolved { query, entries },
            Err(error) => {
                warn!(%query, %error, "lookup failed");
                FetchState::Failed { query, error }
            }
        };
        true
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Fetcher;
    use crate::components::location_search::model::FetchState;
    use crate::lookup::{LookupError, LookupEvent, SuggestionEntry};

    fn finished(
        generation: u64,
        query: &str,
        entries: Vec<SuggestionEntry>,
    ) -> LookupEvent {
        LookupEvent::Finished {
            generation,
            query: query.to_string(),
            result: Ok(entries),
        }
    }

    #[test]
    fn settle_issues_generation_tagged_requests() {
        let mut fetcher = Fetcher::new();
        let first = fetcher.settle("lon").expect("request for lon");
        let second = fetcher.settle("london").expect("request for london");
        assert!(second.generation > first.generation);
        assert_eq!(second.query, "london");
        assert!(fetcher.state().is_pending());
    }

    #[test]
    fn empty_query_resets_without_a_request() {
        let mut fetcher = Fetcher::new();
        fetcher.settle("lon");
        assert!(fetcher.settle("").is_none());
        assert_eq!(*fetcher.state(), FetchState::Idle);
    }

    #[test]
    fn late_response_for_superseded_query_is_ignored() {
        let mut fetcher = Fetcher::new();
        let a = fetcher.settle("lon").expect("request a");
        let b = fetcher.settle("par").expect("request b");

        // B resolves first, then A's response limps in late.
        assert!(fetcher.apply(finished(
            b.generation,
            "par",
            vec![SuggestionEntry::new("Paris", "Ile-de-France", "France")],
        )));
        assert!(!fetcher.apply(finished(
            a.generation,
            "lon",
            vec![SuggestionEntry::new("London", "Greater London", "United Kingdom")],
        )));

        let names: Vec<&str> = fetcher
            .state()
            .suggestions()
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, ["Paris"]);
    }

    #[test]
    fn empty_result_is_resolved_not_failed() {
        let mut fetcher = Fetcher::new();
        let request = fetcher.settle("xyzzy").expect("request");
        fetcher.apply(finished(request.generation, "xyzzy", Vec::new()));
        assert!(fetcher.state().is_empty_result());
        assert!(fetcher.state().error().is_none());
    }

    #[test]
    fn failure_is_observable_and_replaced_by_next_settle() {
        let mut fetcher = Fetcher::new();
        let request = fetcher.settle("xy").expect("request");
        fetcher.apply(LookupEvent::Finished {
            generation: request.generation,
            query: "xy".to_string(),
            result: Err(LookupError::Service { message: None }),
        });
        assert!(fetcher.state().error().is_some());

        fetcher.settle("xyz");
        assert!(fetcher.state().is_pending());
        assert!(fetcher.state().error().is_none());
    }
}
