//! New-listing detection between consecutive snapshots.
//!
//! Given the snapshot from the current poll cycle and the snapshot from the
//! previous one, computes which listing IDs are genuinely new. An ID absent
//! from the previous snapshot is not proof of novelty on its own: partial
//! page loads, pagination drift, and listings scrolling back into the
//! visible window all produce "unseen" IDs that are not new postings.

use std::collections::HashSet;

use crate::models::{NewListingPolicy, Snapshot};

/// Engine computing "new since last observation" under a configured policy.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    policy: NewListingPolicy,
}

impl DiffEngine {
    /// Create a diff engine with the given policy.
    pub fn new(policy: NewListingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> NewListingPolicy {
        self.policy
    }

    /// IDs in `current` judged to have appeared since `previous` was taken.
    ///
    /// Returns the empty set when either snapshot is empty: without both a
    /// current page and a non-trivial prior baseline there is nothing safe
    /// to conclude about novelty.
    pub fn new_listing_ids(&self, current: &Snapshot, previous: &Snapshot) -> HashSet<String> {
        if current.is_empty() || previous.is_empty() {
            return HashSet::new();
        }

        match self.policy {
            NewListingPolicy::OrdinalPosition => Self::ordinal_position(current, previous),
            NewListingPolicy::SetDifference => Self::set_difference(current, previous),
        }
    }

    /// The site lists newest-first, so everything ranked ahead of the
    /// oldest listing both polls agree existed must have appeared since the
    /// last poll. IDs that merely re-entered the visible window below that
    /// boundary are not flagged.
    fn ordinal_position(current: &Snapshot, previous: &Snapshot) -> HashSet<String> {
        let current_ids = current.ids();
        let previous_ids = previous.ids();

        let min_common_position = current_ids
            .intersection(&previous_ids)
            .filter_map(|id| current.position_of(id))
            .min();

        let Some(min_common_position) = min_common_position else {
            // No overlap between polls: first cycle after a restart or a
            // fully refreshed page. There is no baseline to rank against.
            log::warn!("no listings in common with previous poll; skipping diff");
            return HashSet::new();
        };

        current
            .sorted_by_position()
            .into_iter()
            .take_while(|listing| listing.position < min_common_position)
            .map(|listing| listing.id.clone())
            .collect()
    }

    /// Plain set difference: every ID absent from the previous snapshot.
    fn set_difference(current: &Snapshot, previous: &Snapshot) -> HashSet<String> {
        let previous_ids = previous.ids();
        current
            .ids()
            .difference(&previous_ids)
            .map(|id| id.to_string())
            .collect()
    }
}

/// Convenience function to diff two snapshots under a policy.
pub fn new_listing_ids(
    current: &Snapshot,
    previous: &Snapshot,
    policy: NewListingPolicy,
) -> HashSet<String> {
    DiffEngine::new(policy).new_listing_ids(current, previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Listing;

    /// Build a snapshot whose listings take positions in the given order.
    fn make_snapshot(ids: &[&str]) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for id in ids {
            snapshot.insert(Listing {
                id: id.to_string(),
                ..Listing::default()
            });
        }
        snapshot
    }

    fn ids(set: &HashSet<String>) -> Vec<&str> {
        let mut ids: Vec<&str> = set.iter().map(String::as_str).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_ordinal_new_listing_at_top() {
        // D appeared at the top; A, B, C shifted down one slot.
        let previous = make_snapshot(&["A", "B", "C"]);
        let current = make_snapshot(&["D", "A", "B", "C"]);

        let engine = DiffEngine::new(NewListingPolicy::OrdinalPosition);
        assert_eq!(ids(&engine.new_listing_ids(&current, &previous)), ["D"]);
    }

    #[test]
    fn test_set_difference_new_listing_at_top() {
        let previous = make_snapshot(&["A", "B", "C"]);
        let current = make_snapshot(&["D", "A", "B", "C"]);

        let engine = DiffEngine::new(NewListingPolicy::SetDifference);
        assert_eq!(ids(&engine.new_listing_ids(&current, &previous)), ["D"]);
    }

    #[test]
    fn test_policies_agree_without_reordering() {
        let previous = make_snapshot(&["A"]);
        let current = make_snapshot(&["A", "B"]);

        for policy in [
            NewListingPolicy::OrdinalPosition,
            NewListingPolicy::SetDifference,
        ] {
            assert_eq!(
                ids(&new_listing_ids(&current, &previous, policy)),
                ["B"],
                "policy {policy:?}"
            );
        }
    }

    #[test]
    fn test_reappearing_id_below_boundary_diverges() {
        // C is new at the top. D was out of the visible window last poll
        // and scrolled back in at the bottom; it is not a new posting.
        let previous = make_snapshot(&["A", "B"]);
        let current = make_snapshot(&["C", "A", "B", "D"]);

        let ordinal = new_listing_ids(&current, &previous, NewListingPolicy::OrdinalPosition);
        assert_eq!(ids(&ordinal), ["C"]);

        // Set difference has no position boundary and flags D too.
        let plain = new_listing_ids(&current, &previous, NewListingPolicy::SetDifference);
        assert_eq!(ids(&plain), ["C", "D"]);
    }

    #[test]
    fn test_ordinal_nothing_ahead_of_boundary() {
        // Pure reordering of known listings produces nothing new.
        let previous = make_snapshot(&["A", "B", "C"]);
        let current = make_snapshot(&["B", "A", "C"]);

        let engine = DiffEngine::new(NewListingPolicy::OrdinalPosition);
        assert!(engine.new_listing_ids(&current, &previous).is_empty());
    }

    #[test]
    fn test_empty_previous_reports_nothing() {
        let previous = Snapshot::new();
        let current = make_snapshot(&["A", "B"]);

        for policy in [
            NewListingPolicy::OrdinalPosition,
            NewListingPolicy::SetDifference,
        ] {
            assert!(
                new_listing_ids(&current, &previous, policy).is_empty(),
                "policy {policy:?} must never treat everything as new"
            );
        }
    }

    #[test]
    fn test_empty_current_reports_nothing() {
        let previous = make_snapshot(&["A", "B"]);
        let current = Snapshot::new();

        for policy in [
            NewListingPolicy::OrdinalPosition,
            NewListingPolicy::SetDifference,
        ] {
            assert!(new_listing_ids(&current, &previous, policy).is_empty());
        }
    }

    #[test]
    fn test_ordinal_disjoint_snapshots_skip_diff() {
        // A fully refreshed page shares no IDs with the previous poll;
        // there is no baseline, so nothing is flagged.
        let previous = make_snapshot(&["A", "B"]);
        let current = make_snapshot(&["C", "D"]);

        let engine = DiffEngine::new(NewListingPolicy::OrdinalPosition);
        assert!(engine.new_listing_ids(&current, &previous).is_empty());
    }

    #[test]
    fn test_full_page_shift_end_to_end() {
        // Ten listings slide down one slot to make room for one new
        // posting at the top. Both policies must agree on exactly it.
        let old_ids: Vec<String> = (1..=10).map(|n| format!("59380{n:02}")).collect();
        let old_refs: Vec<&str> = old_ids.iter().map(String::as_str).collect();
        let previous = make_snapshot(&old_refs);

        let mut new_refs = vec!["5938125"];
        new_refs.extend(&old_refs);
        let current = make_snapshot(&new_refs);

        for policy in [
            NewListingPolicy::OrdinalPosition,
            NewListingPolicy::SetDifference,
        ] {
            assert_eq!(
                ids(&new_listing_ids(&current, &previous, policy)),
                ["5938125"],
                "policy {policy:?}"
            );
        }
    }
}
