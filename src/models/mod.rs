// src/models/mod.rs

//! Domain models for the watcher application.

mod config;
mod listing;
mod snapshot;

// Re-export all public types
pub use config::{
    CardSelectors, Config, Credentials, NewListingPolicy, NotifyConfig, OutputConfig, SiteConfig,
    WatcherConfig,
};
pub use listing::Listing;
pub use snapshot::Snapshot;
