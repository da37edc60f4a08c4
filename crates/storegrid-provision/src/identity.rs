//! Store identity allocation.
//!
//! Ids are `<prefix><token>` where the token is the first six hex chars
//! of a UUIDv4. Collisions are treated as infeasible rather than
//! impossible — a design assumption, not a guarantee enforced by retry;
//! the idempotency probe downstream keeps a retried request from
//! double-provisioning either way. Hostnames are a pure function of the
//! id, so they can be re-derived for any observed namespace.

use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// A freshly allocated store identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreIdentity {
    pub id: String,
    pub host: String,
}

/// Derive the routable hostname for a store id.
pub fn host_for(id: &str, domain: &str) -> String {
    format!("{id}.{domain}")
}

/// Capability interface for id generation.
pub trait IdentityAllocator: Send + Sync {
    fn allocate(&self) -> StoreIdentity;
}

/// Production allocator: UUIDv4-derived tokens.
#[derive(Debug, Clone)]
pub struct RandomIdentity {
    prefix: String,
    domain: String,
}

impl RandomIdentity {
    pub fn new(prefix: &str, domain: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            domain: domain.to_string(),
        }
    }
}

impl IdentityAllocator for RandomIdentity {
    fn allocate(&self) -> StoreIdentity {
        let token = Uuid::new_v4().simple().to_string();
        let id = format!("{}{}", self.prefix, &token[..6]);
        let host = host_for(&id, &self.domain);
        StoreIdentity { id, host }
    }
}

/// Deterministic allocator for tests: `store-000001`, `store-000002`, …
#[derive(Debug, Default)]
pub struct SequentialIdentity {
    prefix: String,
    domain: String,
    counter: AtomicU64,
}

impl SequentialIdentity {
    pub fn new(prefix: &str, domain: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            domain: domain.to_string(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdentityAllocator for SequentialIdentity {
    fn allocate(&self) -> StoreIdentity {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("{}{:06}", self.prefix, n);
        let host = host_for(&id, &self.domain);
        StoreIdentity { id, host }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_carry_prefix_and_domain() {
        let allocator = RandomIdentity::new("store-", "localhost");
        let identity = allocator.allocate();
        assert!(identity.id.starts_with("store-"));
        assert_eq!(identity.id.len(), "store-".len() + 6);
        assert_eq!(identity.host, format!("{}.localhost", identity.id));
    }

    #[test]
    fn random_ids_are_hex_tokens() {
        let allocator = RandomIdentity::new("store-", "localhost");
        let identity = allocator.allocate();
        let token = identity.id.strip_prefix("store-").unwrap();
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn host_is_deterministic_in_the_id() {
        assert_eq!(host_for("store-ab12cd", "localhost"), "store-ab12cd.localhost");
        assert_eq!(
            host_for("store-ab12cd", "stores.example.com"),
            "store-ab12cd.stores.example.com"
        );
    }

    #[test]
    fn sequential_ids_increment() {
        let allocator = SequentialIdentity::new("store-", "localhost");
        assert_eq!(allocator.allocate().id, "store-000001");
        assert_eq!(allocator.allocate().id, "store-000002");
    }
}
