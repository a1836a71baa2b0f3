//! Key placement statistics for a [`HashRing`].

use std::collections::BTreeMap;

use crate::consistent_hashring::HashRing;

/// Deterministic synthetic keys: `key-0`, `key-1`, ...
pub fn sample_keys(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("key-{i}")).collect()
}

/// Number of `keys` owned by each node. Empty for an empty ring.
pub fn distribution<S: AsRef<str>>(ring: &HashRing, keys: &[S]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        if let Some(node) = ring.get_node(key.as_ref()) {
            *counts.entry(node.to_string()).or_insert(0) += 1;
        }
    }
    counts
}

/// Fraction of `keys` whose owner differs between `before` and `after`.
pub fn remapped_fraction<S: AsRef<str>>(before: &HashRing, after: &HashRing, keys: &[S]) -> f64 {
    if keys.is_empty() {
        return 0.0;
    }

    let moved = keys
        .iter()
        .filter(|key| before.get_node(key.as_ref()) != after.get_node(key.as_ref()))
        .count();
    moved as f64 / keys.len() as f64
}
