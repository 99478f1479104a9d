//! Search over built hierarchies.

pub mod executor;

pub use executor::{SearchExecutor, SearchOptions, SearchResponse, SearchResult};
