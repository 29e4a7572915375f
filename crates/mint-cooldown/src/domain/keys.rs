//! Storage key derivation
//!
//! Key formats are fixed wire contracts with previously persisted data;
//! changing them orphans existing records.

/// Key for the per-account mint count: `{prefix}-nft-count-{account}`
pub fn mint_count_key(prefix: &str, account: &str) -> String {
    format!("{prefix}-nft-count-{account}")
}

/// Key for the last mint timestamp: `{prefix}-last-mint-time`
pub fn last_mint_time_key(prefix: &str) -> String {
    format!("{prefix}-last-mint-time")
}
