//! Snapshot store: the listings observed during one poll cycle.

use std::collections::{HashMap, HashSet};

use crate::error::{AppError, Result};
use crate::models::Listing;

/// All listings captured in one poll cycle, keyed by listing ID.
///
/// Positions are assigned in insertion (scrape) order, monotonically from 0.
/// Re-inserting an existing ID overwrites the entry and assigns a fresh
/// position, so the position sequence can have gaps after a duplicate
/// observation. Only `reset` restarts the counter.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    listings: HashMap<String, Listing>,
    next_position: usize,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all listings and restart the position counter.
    pub fn reset(&mut self) {
        self.listings.clear();
        self.next_position = 0;
    }

    /// Insert or overwrite a listing, assigning it the next position in
    /// scrape order. Returns the assigned position.
    pub fn insert(&mut self, mut listing: Listing) -> usize {
        let position = self.next_position;
        self.next_position += 1;
        listing.position = position;
        self.listings.insert(listing.id.clone(), listing);
        position
    }

    /// The current set of listing identifiers.
    pub fn ids(&self) -> HashSet<&str> {
        self.listings.keys().map(String::as_str).collect()
    }

    /// Number of listings currently held.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Look up a listing by ID.
    pub fn get(&self, id: &str) -> Result<&Listing> {
        self.listings.get(id).ok_or_else(|| AppError::not_found(id))
    }

    /// The listing's position, if present. Used by the diff engine.
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.listings.get(id).map(|l| l.position)
    }

    /// All listings in page order.
    pub fn sorted_by_position(&self) -> Vec<&Listing> {
        let mut listings: Vec<&Listing> = self.listings.values().collect();
        listings.sort_by_key(|l| l.position);
        listings
    }
}
