use crate::lookup::{LookupError, SuggestionEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentEntry {
    pub name: String,
}

/// One row of the dropdown. History rows and remote rows stay distinct
/// variants so rendering and merge logic can match exhaustively instead of
/// sniffing a flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEntry {
    Recent {
        name: String,
    },
    Suggestion {
        name: String,
        region: String,
        country: String,
    },
}

impl ListEntry {
    pub fn name(&self) -> &str {
        match self {
            ListEntry::Recent { name } => name,
            ListEntry::Suggestion { name, .. } => name,
        }
    }

    pub fn is_recent(&self) -> bool {
        matches!(self, ListEntry::Recent { .. })
    }
}

impl From<&SuggestionEntry> for ListEntry {
    fn from(entry: &SuggestionEntry) -> Self {
        ListEntry::Suggestion {
            name: entry.name.clone(),
            region: entry.region.clone(),
            country: entry.country.clone(),
        }
    }
}

/// Observable lifecycle of the remote lookup for the current settled
/// query. `Resolved` with no entries means the service answered "no
/// matches"; `Failed` keeps the query so the error can be shown next to
/// what was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Pending {
        query: String,
    },
    Resolved {
        query: String,
        entries: Vec<SuggestionEntry>,
    },
    Failed {
        query: String,
        error: LookupError,
    },
}

impl FetchState {
    pub fn is_pending(&self) -> bool {
        matches!(self, FetchState::Pending { .. })
    }

    pub fn suggestions(&self) -> &[SuggestionEntry] {
        match self {
            FetchState::Resolved { entries, .. } => entries,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            FetchState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// "No matches": the service answered, with nothing.
    pub fn is_empty_result(&self) -> bool {
        matches!(self, FetchState::Resolved { entries, .. } if entries.is_empty())
    }
}
