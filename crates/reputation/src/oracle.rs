//! Source of the published reputation root

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use colony_crypto::Hash;

/// Provides the reputation root proofs are checked against.
///
/// Implementations may track an external publication feed; the engine only
/// ever asks for the current root.
#[async_trait]
pub trait ReputationRootOracle: Send + Sync {
    /// The most recently published root hash
    async fn current_root_hash(&self) -> Hash;
}

/// A root oracle fed by explicit updates
#[derive(Debug, Clone)]
pub struct StaticRootOracle {
    root: Arc<RwLock<Hash>>,
}

impl Default for StaticRootOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticRootOracle {
    /// Create an oracle holding the zero root
    pub fn new() -> Self {
        Self {
            root: Arc::new(RwLock::new(Hash::zero())),
        }
    }

    /// Create an oracle seeded with `root`
    pub fn with_root(root: Hash) -> Self {
        Self {
            root: Arc::new(RwLock::new(root)),
        }
    }

    /// Replace the published root
    pub async fn set_root(&self, root: Hash) {
        let mut guard = self.root.write().await;
        *guard = root;
        info!(root = %root, "Reputation root updated");
    }
}

#[async_trait]
impl ReputationRootOracle for StaticRootOracle {
    async fn current_root_hash(&self) -> Hash {
        *self.root.read().await
    }
}
