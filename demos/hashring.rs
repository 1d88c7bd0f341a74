extern crate hashring;

use core::fmt;
use std::sync::Arc;

use hashring::{Config, HashRing, Node as HashRingNode};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Node {
    pub ip_addr: String,
    pub name: String,
}

impl fmt::Display for Node {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}:{}", self.name, self.ip_addr)
    }
}

impl HashRingNode for Node {
    fn id(&self) -> &str {
        &self.name
    }
}

fn main() -> hashring::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let hash_fn = std::env::args().nth(1).unwrap_or_else(|| "md5".to_string());
    let config = Config::new(100, &hash_fn)?;

    // Create a new HashRing using the configuration
    let mut hash_ring: HashRing<Node> = HashRing::with_nodes(config)?;

    // Add nodes to the HashRing, node3 with half the capacity
    for (name, ip_addr, weight) in [
        ("node1", "192.168.0.1", 1.0),
        ("node2", "192.168.0.2", 1.0),
        ("node3", "192.168.0.3", 0.5),
    ] {
        let node = Arc::new(Node {
            ip_addr: ip_addr.to_string(),
            name: name.to_string(),
        });
        let vnodes = hash_ring.add_node_with_weight(node, weight)?;
        println!("Added {} with {} virtual nodes", name, vnodes);
    }

    let keys = ["some_random_key", "user:42", "order:1001", "session:abc"];
    for key in keys {
        // Retrieve the node responsible for a given key
        match hash_ring.get_node(key) {
            Some(node) => println!("Node responsible for key {}: {}", key, node),
            None => println!("No node found for the key"),
        }
        let replicas: Vec<String> = hash_ring
            .get_nodes(key, 2)
            .iter()
            .map(|node| node.to_string())
            .collect();
        println!("  replicas: {}", replicas.join(", "));
    }

    hash_ring.remove_node("node2");
    println!("After removing node2:");
    for key in keys {
        if let Some(node) = hash_ring.get_node(key) {
            println!("Node responsible for key {}: {}", key, node);
        }
    }

    Ok(())
}
