use thiserror::Error;

pub type Result<T, E = HashRingError> = std::result::Result<T, E>;

/// Errors returned by ring construction and node management.
///
/// Removing an unknown node and querying an empty ring are not errors; those
/// report absence through `bool`, `Option` and empty `Vec` results instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HashRingError {
    #[error("node already exists: {0}")]
    NodeAlreadyExists(String),

    #[error("unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(String),

    /// Replicas must be in `1..=MAX_VNODES_PER_NODE`.
    #[error("invalid replicas: {0}")]
    InvalidReplicas(usize),

    /// Weights must be finite, non-negative and small enough that the node
    /// stays within `MAX_VNODES_PER_NODE`.
    #[error("invalid node weight: {0}")]
    InvalidWeight(f64),
}
