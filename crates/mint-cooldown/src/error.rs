//! Error types for the mint cooldown subsystem

use thiserror::Error;

/// Result type alias for mint cooldown operations
pub type Result<T> = std::result::Result<T, MintCooldownError>;

/// Errors that can occur while tracking mints and dispatching notifications
#[derive(Debug, Error)]
pub enum MintCooldownError {
    /// Mint requested while the cooldown window is still active
    #[error("Already cooling down: {remaining_ms}ms remaining")]
    AlreadyCoolingDown {
        /// Milliseconds until minting becomes eligible again
        remaining_ms: u64,
    },

    /// Chain read or mint submission failed
    #[error("Chain call failed: {0}")]
    ChainCallFailed(String),

    /// The notification webhook rejected or never received the dispatch
    #[error("Notification dispatch failed ({status:?}): {detail}")]
    NotificationDispatchFailed {
        /// HTTP status code, if a response was received
        status: Option<u16>,
        /// Response body or transport error text
        detail: String,
    },

    /// Key-value store read or write failed
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Notification operation attempted without a stored registration
    #[error("No notification registration present")]
    NotRegistered,

    /// Watch loop started before persisted state was loaded
    #[error("Controller not initialized: call initialize() first")]
    NotInitialized,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MintCooldownError {
    /// Check if the caller can recover by waiting or retrying later
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::AlreadyCoolingDown { .. }
                | Self::ChainCallFailed(_)
                | Self::NotificationDispatchFailed { .. }
                | Self::StorageUnavailable(_)
        )
    }

    /// Check if the error came from the key-value store
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}
