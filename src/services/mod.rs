//! Service layer for the watcher application.

mod listings;

pub use listings::ListingScraper;
