use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{HashRingError, Result};
use crate::hasher::{HashAlgorithm, RingHasher};

pub const DEFAULT_REPLICAS: usize = 100;

/// Upper bound on the virtual nodes of a single node, whatever its weight.
pub const MAX_VNODES_PER_NODE: usize = 1 << 20;

/// A physical node that can be placed on the ring.
///
/// `id` must be unique among the nodes of one ring and stable for as long as
/// the node is registered.
pub trait Node: Send + Sync + Debug {
    fn id(&self) -> &str;
}

impl Node for String {
    fn id(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Virtual nodes per unit of weight.
    pub replicas: usize,
    pub hash_fn: HashAlgorithm,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            replicas: DEFAULT_REPLICAS,
            hash_fn: HashAlgorithm::default(),
        }
    }
}

impl Config {
    /// Builds a validated config, resolving the digest algorithm by name.
    pub fn new(replicas: usize, hash_fn: &str) -> Result<Config> {
        let config = Config {
            replicas,
            hash_fn: HashAlgorithm::from_name(hash_fn)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.replicas == 0 || self.replicas > MAX_VNODES_PER_NODE {
            return Err(HashRingError::InvalidReplicas(self.replicas));
        }
        Ok(())
    }

    /// Number of virtual nodes a node of `weight` receives, never less than one.
    ///
    /// Fails for negative or non-finite weights and for weights that would
    /// place more than [`MAX_VNODES_PER_NODE`] virtual nodes.
    pub fn replica_count(&self, weight: f64) -> Result<usize> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(HashRingError::InvalidWeight(weight));
        }
        let count = (self.replicas as f64 * weight).round().max(1.0);
        if count > MAX_VNODES_PER_NODE as f64 {
            return Err(HashRingError::InvalidWeight(weight));
        }
        Ok(count as usize)
    }
}

/// One record of [`HashRing::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// The ring coordinate in decimal.
    pub hash: String,
    pub vnode: String,
    pub node: String,
}

#[derive(Debug, Clone)]
struct VirtualNode<N> {
    coordinate: u64,
    vnode: String,
    node: Arc<N>,
}

impl<N> VirtualNode<N> {
    fn ring_order(a: &Self, b: &Self) -> Ordering {
        a.coordinate
            .cmp(&b.coordinate)
            .then_with(|| a.vnode.cmp(&b.vnode))
    }
}

#[derive(Debug, Clone)]
struct Registration<N> {
    node: Arc<N>,
    weight: f64,
    vnodes: Vec<String>,
}

/// Weighted consistent hash ring.
///
/// Entries are kept sorted by coordinate, with equal coordinates ordered by
/// virtual node id so that placement never depends on insertion order.
#[derive(Debug, Clone)]
pub struct HashRing<N = String, H = HashAlgorithm> {
    config: Config,
    hasher: H,
    nodes: HashMap<String, Registration<N>>,
    ring: Vec<VirtualNode<N>>,
}

impl HashRing<String, HashAlgorithm> {
    pub fn new(config: Config) -> Result<HashRing<String, HashAlgorithm>> {
        HashRing::with_nodes(config)
    }
}

impl<N: Node> HashRing<N, HashAlgorithm> {
    /// Creates a ring over a custom node type, hashing with `config.hash_fn`.
    pub fn with_nodes(config: Config) -> Result<HashRing<N, HashAlgorithm>> {
        let hasher = config.hash_fn;
        HashRing::with_hasher(config, hasher)
    }
}

impl<N: Node, H: RingHasher> HashRing<N, H> {
    /// Creates a ring that places everything with `hasher`. `config.hash_fn`
    /// is not consulted.
    pub fn with_hasher(config: Config, hasher: H) -> Result<HashRing<N, H>> {
        config.validate()?;
        Ok(HashRing {
            config,
            hasher,
            nodes: HashMap::new(),
            ring: Vec::new(),
        })
    }

    pub fn add_node(&mut self, node: impl Into<Arc<N>>) -> Result<usize> {
        self.add_node_with_weight(node, 1.0)
    }

    /// Places `node` on the ring with `max(1, round(replicas * weight))`
    /// virtual nodes and returns that count.
    ///
    /// Fails without touching the ring if the id is already registered or the
    /// weight is rejected by [`Config::replica_count`]. Changing a node's weight means
    /// removing it and adding it again.
    pub fn add_node_with_weight(&mut self, node: impl Into<Arc<N>>, weight: f64) -> Result<usize> {
        let node = node.into();
        let id = node.id().to_string();
        if self.nodes.contains_key(&id) {
            return Err(HashRingError::NodeAlreadyExists(id));
        }
        let replica_count = self.config.replica_count(weight)?;
        let vnodes: Vec<String> = (0..replica_count).map(|i| format!("{}#{}", id, i)).collect();

        self.ring.reserve(replica_count);
        for vnode in &vnodes {
            self.ring.push(VirtualNode {
                coordinate: self.hasher.coordinate(vnode.as_bytes()),
                vnode: vnode.clone(),
                node: node.clone(),
            });
        }
        // Stable sort: the existing entries and the new batch form sorted runs
        // that are merged rather than fully re-sorted.
        self.ring.sort_by(VirtualNode::ring_order);

        self.nodes.insert(id.clone(), Registration { node, weight, vnodes });
        debug!(node = %id, weight, vnodes = replica_count, "added node to ring");

        Ok(replica_count)
    }

    /// Removes a node and all of its virtual nodes. Returns `false` if the id
    /// is unknown, in which case nothing changes.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let Some(registration) = self.nodes.remove(id) else {
            return false;
        };

        let vnodes: HashSet<&str> = registration.vnodes.iter().map(String::as_str).collect();
        self.ring.retain(|vnode| !vnodes.contains(vnode.vnode.as_str()));
        debug!(node = id, vnodes = registration.vnodes.len(), "removed node from ring");

        true
    }

    pub fn hash_key(&self, key: impl AsRef<[u8]>) -> u64 {
        self.hasher.coordinate(key.as_ref())
    }

    /// Index of the first entry at or after `coordinate`, wrapping to the
    /// first entry past the end of the ring. `None` when the ring is empty.
    pub fn locate_owner(&self, coordinate: u64) -> Option<usize> {
        let last = self.ring.last()?;
        if coordinate > last.coordinate {
            return Some(0);
        }
        Some(self.ring.partition_point(|vnode| vnode.coordinate < coordinate))
    }

    /// Walks clockwise from `start`, collecting up to `count` distinct nodes
    /// in ring order. Stops early after one full revolution.
    pub fn walk_distinct_owners(&self, start: usize, count: usize) -> Vec<&N> {
        let wanted = count.min(self.nodes.len());
        let mut owners: Vec<&N> = Vec::with_capacity(wanted);
        if wanted == 0 || self.ring.is_empty() {
            return owners;
        }

        let start = start % self.ring.len();
        let mut seen = HashSet::with_capacity(wanted);
        for vnode in self.ring[start..].iter().chain(&self.ring[..start]) {
            if seen.insert(vnode.node.id()) {
                owners.push(vnode.node.as_ref());
                if owners.len() == wanted {
                    break;
                }
            }
        }

        owners
    }

    pub fn get_node(&self, key: impl AsRef<[u8]>) -> Option<&N> {
        let index = self.locate_owner(self.hash_key(key))?;
        Some(self.ring[index].node.as_ref())
    }

    /// Up to `count` distinct nodes for `key`, primary first. Returns fewer
    /// when the ring holds fewer than `count` nodes.
    pub fn get_nodes(&self, key: impl AsRef<[u8]>, count: usize) -> Vec<&N> {
        match self.locate_owner(self.hash_key(key)) {
            Some(start) => self.walk_distinct_owners(start, count),
            None => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        self.ring
            .iter()
            .map(|vnode| SnapshotEntry {
                hash: vnode.coordinate.to_string(),
                vnode: vnode.vnode.clone(),
                node: vnode.node.id().to_string(),
            })
            .collect()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn vnode_count(&self) -> usize {
        self.ring.len()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id).map(|registration| registration.node.as_ref())
    }

    pub fn node_weight(&self, id: &str) -> Option<f64> {
        self.nodes.get(id).map(|registration| registration.weight)
    }

    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// The virtual node ids of `id`, in index order.
    pub fn virtual_nodes(&self, id: &str) -> Option<&[String]> {
        self.nodes.get(id).map(|registration| registration.vnodes.as_slice())
    }

    pub fn virtual_nodes_per_node(&self) -> HashMap<String, usize> {
        let mut virtual_nodes = HashMap::new();
        for vnode in &self.ring {
            *virtual_nodes.entry(vnode.node.id().to_string()).or_insert(0) += 1;
        }
        virtual_nodes
    }
}
