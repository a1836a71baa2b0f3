use hashring::{
    HashRing,
    analysis,
    default_hash,
};
use proptest::prelude::*;

mod common;

#[test]
fn test_adding_node_moves_keys_only_to_new_node() {
    let before = common::crc32_ring(3, &["n1", "n2"]);
    let mut after = before.clone();
    after.add_node("n3");

    let keys = analysis::sample_keys(10_000);
    for key in &keys {
        let old = before.get_node(key).unwrap();
        let new = after.get_node(key).unwrap();
        assert!(old == new || new == "n3", "{key} moved from {old} to {new}");
    }

    let fraction = analysis::remapped_fraction(&before, &after, &keys);
    assert!(fraction > 0.1 && fraction < 0.6, "remapped fraction {fraction}");
}

#[test]
fn test_remapping_beats_modulo_placement() {
    let keys = analysis::sample_keys(10_000);

    let before = common::crc32_ring(100, &["n1", "n2"]);
    let mut after = before.clone();
    after.add_node("n3");
    let ring_fraction = analysis::remapped_fraction(&before, &after, &keys);

    let modulo_moved = keys
        .iter()
        .filter(|key| {
            let hash = default_hash(key.as_bytes());
            hash % 2 != hash % 3
        })
        .count() as f64
        / keys.len() as f64;

    assert!(ring_fraction < 0.5, "remapped fraction {ring_fraction}");
    assert!(modulo_moved > 0.6, "modulo fraction {modulo_moved}");
    assert!(ring_fraction < modulo_moved);
}

#[test]
fn test_boundary_and_wraparound_with_custom_hash() {
    let ring = HashRing::with_nodes(2, Some(common::byte_sum_hash()), ["A", "B"]).unwrap();
    assert_eq!(ring.positions(), &[13, 14, 14, 15]);

    // 13 -> A, 14 -> B after overwrite, 15 -> B
    let cases = [("0A", "A"), ("1A", "B"), ("0B", "B"), ("1B", "B"), ("1C", "A"), ("", "A")];
    for (key, expected) in cases {
        assert_eq!(ring.get_node(key), Some(expected), "key {key:?}");
    }
}

#[test]
fn test_separate_adds_match_single_add() {
    let mut incremental = HashRing::new(20, None).unwrap();
    incremental.add_nodes(["cache-1"]);
    incremental.add_nodes(["cache-2", "cache-3"]);

    let batch = common::crc32_ring(20, &["cache-1", "cache-2", "cache-3"]);

    assert_eq!(incremental.positions(), batch.positions());
    for key in analysis::sample_keys(1000) {
        assert_eq!(incremental.get_node(&key), batch.get_node(&key));
    }
}

proptest! {
    #[test]
    fn prop_lookup_returns_added_node(
        nodes in prop::collection::vec("[a-z0-9.:-]{1,16}", 1..8),
        replicas in 1usize..32,
        key in ".*",
    ) {
        let ring = HashRing::with_nodes(replicas, None, nodes.clone()).unwrap();
        let owner = ring.get_node(&key).unwrap();
        prop_assert!(nodes.iter().any(|n| n == owner));
        prop_assert_eq!(ring.get_node(&key), Some(owner));
    }

    #[test]
    fn prop_position_count(
        batches in prop::collection::vec(prop::collection::vec("[a-z]{1,8}", 0..5), 0..5),
        replicas in 1usize..16,
    ) {
        let mut ring = HashRing::new(replicas, None).unwrap();
        let mut total = 0;
        for batch in batches {
            total += batch.len();
            ring.add_nodes(batch);
        }
        prop_assert_eq!(ring.len(), replicas * total);
        prop_assert_eq!(ring.is_empty(), total == 0);
    }

    #[test]
    fn prop_empty_ring_has_no_owner(key in ".*", replicas in 1usize..64) {
        let ring = HashRing::new(replicas, None).unwrap();
        prop_assert_eq!(ring.get_node(&key), None);
    }
}
