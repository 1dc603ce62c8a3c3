//! Global (cross-scope) contact search.
//!
//! The controller owns debounce and race safety and is driven with explicit
//! instants. The dispatcher runs each directory call on its own thread.

/// Debounce and latest-query-wins bookkeeping.
pub mod controller;
/// Background threads for directory calls.
pub mod dispatcher;
/// The external directory contract.
pub mod directory;

pub use controller::{SearchController, SearchResultSet, SearchTicket};
pub use directory::{ContactDirectory, InMemoryDirectory};
pub use dispatcher::{SearchCompletion, SearchDispatcher};
