pub mod components;
pub mod config;
pub mod keys;
pub mod lookup;
pub mod runtime;

pub use components::LocationSearch;
pub use components::location_search::{FetchState, FocusState, ListEntry, RecentSearches};
pub use config::{ConfigError, SearchOptions};
pub use keys::{KeyCode, KeyEvent, KeyModifiers};
pub use lookup::{LookupError, LookupService, LookupWorker, SuggestionEntry};
pub use runtime::{AppEvent, SearchAction, SearchRunner};
