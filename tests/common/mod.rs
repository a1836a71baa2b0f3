use std::sync::Arc;

use hashring::{
    HashFn,
    HashRing,
};

/// Sum of byte values mod 100.
pub fn byte_sum_hash() -> HashFn {
    Arc::new(|data: &[u8]| data.iter().map(|&b| b as u32).sum::<u32>() % 100)
}

pub fn crc32_ring(replicas: usize, nodes: &[&str]) -> HashRing {
    HashRing::with_nodes(replicas, None, nodes.iter().copied()).expect("valid replication factor")
}
