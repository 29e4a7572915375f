//! Controller state-transition events
//!
//! Published through the [`crate::ports::EventSink`] port so a UI layer
//! can observe transitions without a reactive framework. Timestamps are
//! epoch milliseconds from the injected clock.

use serde::{Deserialize, Serialize};

/// All events the mint cooldown controller can publish
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MintEvent {
    /// A mint transaction confirmed and the record was updated.
    /// This is the "mint succeeded" callback the UI renders from.
    MintConfirmed {
        /// Account that minted
        account: String,
        /// Cumulative count after the mint
        minted_count: u64,
        /// Confirmation instant
        timestamp: u64,
    },

    /// A fresh on-chain read raised the local count.
    BalanceReconciled {
        /// Account whose balance was read
        account: String,
        /// Cumulative count after the merge
        minted_count: u64,
    },

    /// The cooldown window elapsed; minting is eligible again.
    /// Fires on the transition edge, once per mint cycle.
    CooldownReady {
        /// Account whose cooldown expired
        account: String,
        /// Instant the edge was observed
        timestamp: u64,
    },

    /// The cooldown-ready or test notification was delivered.
    NotificationDispatched {
        /// Unique id sent to the host
        notification_id: String,
        /// Dispatch instant
        timestamp: u64,
    },

    /// A notification dispatch failed; it will not be retried.
    NotificationFailed {
        /// Error surface for status reporting
        reason: String,
        /// Failure instant
        timestamp: u64,
    },

    /// A notification registration was stored.
    RegistrationEnabled,

    /// The notification registration was removed.
    RegistrationDisabled,
}
