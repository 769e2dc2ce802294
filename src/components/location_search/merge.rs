use super::history::RecentSearches;
use super::model::{FetchState, ListEntry};

/// Builds the display list: history rows first in store order, then the
/// remote suggestions in the order the service returned them. Pending,
/// failed, and idle fetches contribute no suggestion rows but history is
/// always the base of the list. A name can appear in both groups; the two
/// sources are never deduplicated against each other.
pub fn combine(history: &RecentSearches, fetch: &FetchState) -> Vec<ListEntry> {
    let suggestions = fetch.suggestions();
    let mut rows = Vec::with_capacity(history.len() + suggestions.len());

    for entry in history.entries() {
        rows.push(ListEntry::Recent {
            name: entry.name.clone(),
        });
    }
    for entry in suggestions {
        rows.push(ListEntry::from(entry));
    }

    rows
}
