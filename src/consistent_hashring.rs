use std::{
    collections::{
        BTreeSet,
        HashMap,
    },
    fmt,
    sync::Arc,
};

use thiserror::Error;
use tracing::{
    debug,
    warn,
};

use crate::metrics::RingMetrics;

/// Maps an arbitrary byte sequence to a position on the ring.
///
/// Must be deterministic across calls and across process runs, otherwise
/// routing is not reproducible.
pub type HashFn = Arc<dyn Fn(&[u8]) -> u32 + Send + Sync>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RingError {
    #[error("Invalid configuration: replication factor must be positive, got {replicas}")]
    InvalidConfiguration { replicas: usize },
}

/// CRC32 (IEEE polynomial). Used when no hash function is supplied.
pub fn default_hash(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// A consistent hash ring implementation.
///
/// This structure maps keys to nodes in a way that minimizes redistribution
/// when nodes are added. Each real node occupies `replicas` virtual positions,
/// and a key belongs to the first position at or after its own hash, wrapping
/// around to the smallest position.
///
/// The ring does no internal locking. [`HashRing::add_nodes`] takes
/// `&mut self`, so a ring shared between threads must sit behind an external
/// lock (e.g. `Arc<RwLock<HashRing>>`) or be owned by a single task.
#[derive(Clone)]
pub struct HashRing {
    hash: HashFn,

    /// The number of virtual nodes per real node.
    replicas: usize,

    /// Virtual node positions in ascending order. Re-adding a node leaves
    /// duplicate values behind.
    positions: Vec<u32>,

    /// The real node owning each position. Last write wins on collision.
    owners: HashMap<u32, String>,

    metrics: RingMetrics,
}

impl HashRing {
    /// Create an empty ring with `replicas` virtual nodes per real node.
    ///
    /// `None` selects [`default_hash`]. A replication factor of zero would
    /// produce a ring that never holds a position, so it is rejected.
    pub fn new(replicas: usize, hash: Option<HashFn>) -> Result<Self, RingError> {
        if replicas == 0 {
            return Err(RingError::InvalidConfiguration { replicas });
        }

        Ok(HashRing {
            hash: hash.unwrap_or_else(|| Arc::new(default_hash) as HashFn),
            replicas,
            positions: Vec::new(),
            owners: HashMap::new(),
            metrics: RingMetrics::new(),
        })
    }

    /// Create a ring and add `nodes` to it.
    pub fn with_nodes<I, S>(replicas: usize, hash: Option<HashFn>, nodes: I) -> Result<Self, RingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ring = Self::new(replicas, hash)?;
        ring.add_nodes(nodes);
        Ok(ring)
    }

    /// Add a single node to the hash ring.
    pub fn add_node(&mut self, node: impl Into<String>) {
        self.add_nodes(std::iter::once(node.into()));
    }

    /// Add nodes to the hash ring.
    ///
    /// Every node gets `replicas` positions, hashed from
    /// `"{replica_index}{node}"`. A position already owned by another node is
    /// reassigned to the node written last.
    pub fn add_nodes<I, S>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.positions.len();

        for node in nodes {
            let node = node.into();
            for i in 0..self.replicas {
                let position = (self.hash)(format!("{i}{node}").as_bytes());
                self.positions.push(position);

                if let Some(previous) = self.owners.insert(position, node.clone()) {
                    if previous != node {
                        warn!(position, previous = %previous, node = %node, "Ring position collision, reassigning owner");
                        self.metrics.record_collision();
                    }
                }
            }
        }

        let added = self.positions.len() - before;
        if added == 0 {
            return;
        }

        self.positions.sort_unstable();
        self.metrics.record_positions_added(added as u64);
        debug!(added, total = self.positions.len(), "Added nodes to hash ring");
    }

    /// Get the node responsible for the given key.
    ///
    /// Returns `None` only when no node has been added.
    pub fn get_node(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            self.metrics.record_lookup(false);
            return None;
        }

        let target = (self.hash)(key.as_bytes());
        let idx = self.positions.partition_point(|&position| position < target) % self.positions.len();

        self.metrics.record_lookup(true);
        self.owners.get(&self.positions[idx]).map(String::as_str)
    }

    /// Number of virtual positions, duplicates included.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Virtual positions in ascending order.
    pub fn positions(&self) -> &[u32] {
        &self.positions
    }

    /// Distinct nodes that own at least one position, sorted.
    pub fn nodes(&self) -> Vec<&str> {
        self.owners
            .values()
            .map(String::as_str)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl fmt::Debug for HashRing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("positions", &self.positions.len())
            .field("nodes", &self.nodes())
            .finish_non_exhaustive()
    }
}
