//! Persisted per-account mint record

/// Cumulative mint state for a single account
///
/// The on-chain balance is the source of truth but may lag behind local
/// optimistic increments by confirmation latency, so reconciliation keeps
/// the larger of the two values. A stale chain read must never regress
/// the local count. Persisted as two scalar entries (count and anchor),
/// matching the storage layout of earlier app revisions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MintRecord {
    /// Authoritative cumulative mint count
    pub minted_count: u64,

    /// Epoch milliseconds of the last confirmed mint, if any
    pub last_mint_at: Option<u64>,
}

impl MintRecord {
    /// Create an empty record: zero mints, no cooldown anchor
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a freshly read on-chain balance into the local count
    ///
    /// Returns `true` when the count changed and needs persisting.
    /// Monotonic: the count never decreases. Idempotent and commutative
    /// under repeated or reordered reads.
    pub fn reconcile(&mut self, on_chain_balance: u64) -> bool {
        if on_chain_balance > self.minted_count {
            self.minted_count = on_chain_balance;
            true
        } else {
            false
        }
    }

    /// Apply a confirmed mint: bump the count and anchor the cooldown
    pub fn record_confirmed(&mut self, now_ms: u64) {
        self.minted_count += 1;
        self.last_mint_at = Some(now_ms);
    }
}
