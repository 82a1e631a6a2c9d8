//! Token revocation registry
//!
//! Revoked JWT IDs (jti) are recorded here and consulted on every
//! authenticated request. The in-memory implementation is per-process:
//! it is not shared across instances, is not persisted across restarts,
//! and never evicts entries (tokens expire on their own, which bounds the
//! useful lifetime of an entry). Multi-instance deployments need a shared
//! backend behind the same trait.

use std::collections::HashSet;
use std::sync::RwLock;

/// Abstraction over revoked-token storage
///
/// Injected through application state so a durable or shared backend can
/// replace the in-memory set without touching the middleware or handlers.
pub trait TokenRegistry: Send + Sync {
    /// Record a token id as revoked.
    ///
    /// Returns `true` when the id was newly revoked and `false` when it was
    /// already in the registry. The insert must be atomic: callers rely on
    /// exactly one of any number of concurrent `revoke` calls for the same
    /// id seeing `true`, which is what makes refresh tokens single-use.
    fn revoke(&self, jti: &str) -> bool;

    /// Check whether a token id has been revoked
    fn is_revoked(&self, jti: &str) -> bool;
}

/// Process-local registry backed by a read-write locked set
///
/// Reads vastly outnumber writes (every authenticated request checks
/// membership; only logout and refresh insert), hence the RwLock.
#[derive(Debug, Default)]
pub struct InMemoryTokenRegistry {
    revoked: RwLock<HashSet<String>>,
}

impl InMemoryTokenRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenRegistry for InMemoryTokenRegistry {
    fn revoke(&self, jti: &str) -> bool {
        let mut revoked = self.revoked.write().expect("registry lock poisoned");
        revoked.insert(jti.to_string())
    }

    fn is_revoked(&self, jti: &str) -> bool {
        let revoked = self.revoked.read().expect("registry lock poisoned");
        revoked.contains(jti)
    }
}
