pub mod component;
pub mod fetcher;
pub mod focus;
pub mod history;
pub mod merge;
pub mod model;

pub use component::LocationSearch;
pub use fetcher::Fetcher;
pub use focus::{DropdownFocus, FocusState};
pub use history::{RECENT_CAPACITY, RecentSearches};
pub use merge::combine;
pub use model::{FetchState, ListEntry, RecentEntry};
