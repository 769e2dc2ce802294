pub mod worker;

#[cfg(feature = "http")]
pub mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "http")]
pub use http::HttpLookup;
pub use worker::LookupWorker;

/// One match returned by the remote suggestion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    pub name: String,
    pub region: String,
    pub country: String,
}

impl SuggestionEntry {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            country: country.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{}", message.as_deref().unwrap_or("unexpected service error"))]
    Service { message: Option<String> },
}

/// Performs the remote suggestion lookup for a settled query. Called on the
/// worker thread, so implementations may block. An empty result list means
/// "no matches" and is not an error. Implementations must not retry; a
/// retry only ever happens through a new settled query.
pub trait LookupService: Send + 'static {
    fn lookup(&self, query: &str) -> Result<Vec<SuggestionEntry>, LookupError>;
}

impl<F> LookupService for F
where
    F: Fn(&str) -> Result<Vec<SuggestionEntry>, LookupError> + Send + 'static,
{
    fn lookup(&self, query: &str) -> Result<Vec<SuggestionEntry>, LookupError> {
        self(query)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone)]
pub enum LookupEvent {
    Finished {
        generation: u64,
        query: String,
        result: Result<Vec<SuggestionEntry>, LookupError>,
    },
}
