//! Property-based tests for the B-tree index.
//!
//! These tests verify invariants that should hold for all inputs, using
//! differential testing against `BTreeSet` as an oracle.

use memindex::{BTree, Error};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn insert_all(keys: &[u64]) -> BTree {
    let mut tree = BTree::new();
    for &key in keys {
        tree.insert(key).unwrap();
    }
    tree
}

// ============================================================================
//  Strategies
// ============================================================================

/// Strategy for arbitrary key batches over the full u64 range.
fn key_batch(max_count: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(any::<u64>(), 0..=max_count)
}

/// Strategy for duplicate-heavy batches drawn from a tiny key space.
fn clustered_batch(max_count: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..32, 0..=max_count)
}

// ============================================================================
//  Differential Testing Against BTreeSet
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Membership must agree with the oracle for hits and misses alike.
    #[test]
    fn membership_matches_oracle(keys in key_batch(200), probes in key_batch(50)) {
        let tree = insert_all(&keys);
        let oracle: BTreeSet<u64> = keys.iter().copied().collect();

        for &key in &keys {
            prop_assert_eq!(tree.search(key), Ok(key));
        }
        for &probe in &probes {
            prop_assert_eq!(
                tree.contains(probe),
                oracle.contains(&probe),
                "membership mismatch for {}",
                probe
            );
        }
        prop_assert_eq!(tree.len(), oracle.len());
    }

    /// The full key sequence comes out sorted and deduplicated.
    #[test]
    fn keys_are_sorted_and_unique(keys in key_batch(200)) {
        let tree = insert_all(&keys);
        let oracle: BTreeSet<u64> = keys.iter().copied().collect();

        let expected: Vec<u64> = oracle.into_iter().collect();
        prop_assert_eq!(tree.keys(), expected);
    }

    /// A miss names the key it failed to find.
    #[test]
    fn misses_report_key_not_found(keys in key_batch(100), probe: u64) {
        prop_assume!(!keys.contains(&probe));

        let tree = insert_all(&keys);
        prop_assert_eq!(tree.search(probe), Err(Error::KeyNotFound(probe)));
    }

    /// Re-inserting every present key leaves shape and counts untouched.
    #[test]
    fn reinsertion_changes_nothing(keys in key_batch(100)) {
        let mut tree = insert_all(&keys);
        let dump = tree.to_string();
        let len = tree.len();

        for &key in &keys {
            tree.insert(key).unwrap();
        }

        prop_assert_eq!(tree.to_string(), dump);
        prop_assert_eq!(tree.len(), len);
        tree.check().unwrap();
    }

    /// Insertion order may change the shape but never the contents.
    #[test]
    fn insertion_order_is_irrelevant(keys in key_batch(100)) {
        let forward = insert_all(&keys);

        let mut reversed_keys = keys.clone();
        reversed_keys.reverse();
        let reversed = insert_all(&reversed_keys);

        let mut sorted_keys = keys;
        sorted_keys.sort_unstable();
        let sorted = insert_all(&sorted_keys);

        prop_assert_eq!(forward.keys(), reversed.keys());
        prop_assert_eq!(forward.keys(), sorted.keys());
    }

    /// Duplicate-heavy runs split the insert count exactly between new
    /// keys and ignored repeats.
    #[test]
    fn duplicates_are_counted_not_stored(keys in clustered_batch(200)) {
        let tree = insert_all(&keys);
        let unique: BTreeSet<u64> = keys.iter().copied().collect();

        prop_assert_eq!(tree.len(), unique.len());
        prop_assert_eq!(tree.stats().keys_inserted, unique.len() as u64);
        prop_assert_eq!(
            tree.stats().duplicates_ignored,
            (keys.len() - unique.len()) as u64
        );
    }
}

// ============================================================================
//  Structural Invariants
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every intermediate tree along an insert sequence is well formed.
    #[test]
    fn structure_stays_valid_after_every_insert(keys in prop::collection::vec(0u64..300, 0..=60)) {
        let mut tree = BTree::new();
        for &key in &keys {
            tree.insert(key).unwrap();
            let checked = tree.check();
            prop_assert!(
                checked.is_ok(),
                "invariant broken after inserting {}: {:?}",
                key,
                checked
            );
        }
    }

    /// The tree only grows taller through root splits, one level each.
    #[test]
    fn height_tracks_root_splits(keys in key_batch(150)) {
        let mut tree = BTree::new();
        for &key in &keys {
            tree.insert(key).unwrap();
            prop_assert_eq!(tree.height() as u64, tree.stats().root_splits);
        }
    }
}
