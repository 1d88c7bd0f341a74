// Hash Ring Implementation
//
// --------------
// 1. Hash `<node id>#<index>` for every virtual node of a node and keep all of them in one
//    vector sorted by ring coordinate (ties ordered by virtual node id).
//    - A node's weight decides how many virtual nodes it gets: `max(1, round(replicas * weight))`.
//      More virtual nodes means a larger share of the ring and of the keys.
//    - Removing a node drops exactly its own virtual nodes, so only the keys they owned move.

// 2. Look a key up by hashing it with the same algorithm and taking the first virtual node at
//    or after that coordinate, wrapping around to the start of the ring.
//    - For replication, keep walking clockwise and collect distinct physical nodes: the first
//      one is the primary, the rest are the replicas in failover order.
//
// Example Usage:
// --------------
//
// use hashring::{Config, HashRing};
//
// fn main() {
//     let config = Config::new(100, "md5").unwrap();
//
//     // Create a new HashRing using the configuration
//     let mut hash_ring = HashRing::new(config).unwrap();
//
//     // Add nodes to the HashRing, the second one with twice the capacity
//     hash_ring.add_node("node1".to_string()).unwrap();
//     hash_ring.add_node_with_weight("node2".to_string(), 2.0).unwrap();
//
//     // Retrieve the node responsible for a given key, then its replicas
//     if let Some(node) = hash_ring.get_node("500") {
//         println!("Node responsible for key 500: {}", node);
//     }
//     println!("Replicas: {:?}", hash_ring.get_nodes("500", 2));
// }

mod error;
mod hasher;
mod ring;

pub use error::{HashRingError, Result};
pub use hasher::{HashAlgorithm, RingHasher};
pub use ring::{Config, HashRing, Node, SnapshotEntry, DEFAULT_REPLICAS, MAX_VNODES_PER_NODE};
