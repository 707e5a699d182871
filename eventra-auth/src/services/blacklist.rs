use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Revocation list for tokens invalidated before their natural expiry.
///
/// The store never errors: a miss means "not revoked". Single-process
/// deployments use [`InMemoryRevocationList`]; a shared external store
/// can implement this trait for multi-process deployments.
pub trait TokenRevocationList: Send + Sync {
    /// Record a token as unusable until `expires_at`. Idempotent;
    /// revoking again only overwrites the expiry.
    fn revoke(&self, token: &str, expires_at: DateTime<Utc>);

    /// Whether an unexpired revocation entry exists for the token.
    /// Implementations may prune expired entries on lookup.
    fn is_revoked(&self, token: &str) -> bool;
}

/// Concurrent in-memory revocation list keyed by the raw token value.
///
/// Reads and writes from many in-flight requests go through DashMap's
/// sharded locks, so a revoke is visible to every subsequent lookup
/// without a global read lock. Expired entries are garbage collected
/// lazily on lookup; once a token's natural expiry has passed the
/// entry is redundant and safe to drop.
#[derive(Default)]
pub struct InMemoryRevocationList {
    entries: DashMap<String, i64>,
}

impl InMemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl TokenRevocationList for InMemoryRevocationList {
    fn revoke(&self, token: &str, expires_at: DateTime<Utc>) {
        self.entries
            .insert(token.to_string(), expires_at.timestamp());
    }

    fn is_revoked(&self, token: &str) -> bool {
        let now = Utc::now().timestamp();
        match self.entries.get(token).map(|entry| *entry) {
            Some(expires_at) if now < expires_at => true,
            Some(_) => {
                // Entry outlived the token's own expiry; prune it.
                self.entries.remove_if(token, |_, expires_at| now >= *expires_at);
                false
            }
            None => false,
        }
    }
}
