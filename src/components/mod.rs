pub mod location_search;

pub use location_search::LocationSearch;
