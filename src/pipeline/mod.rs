//! Watch pipeline: snapshot diffing and the poll loop.
//!
//! - `DiffEngine`: computes "new since last observation" between snapshots
//! - `Watcher`: drives the navigate→scrape→diff→notify cycle

pub mod diff;
pub mod poll;

pub use diff::{new_listing_ids, DiffEngine};
pub use poll::{recovery_for, Recovery, Watcher, WatcherState};
