//! Notification opt-in registration

use crate::error::{MintCooldownError, Result};
use serde::{Deserialize, Serialize};

/// Stored endpoint + token pair authorizing push delivery
///
/// Presence of this record in the key-value store means the user opted
/// in; absence means opted out. No expiry is modeled here: invalidation
/// is external (the host revokes the token).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRegistration {
    /// Webhook endpoint the host exposes for this user/device
    pub url: String,

    /// Delivery token scoped to this registration
    pub token: String,
}

impl NotificationRegistration {
    /// Serialize to the stored JSON shape: `{"url": ..., "token": ...}`
    pub fn to_stored_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| MintCooldownError::StorageUnavailable(e.to_string()))
    }

    /// Parse the stored JSON shape
    pub fn from_stored_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw)
            .map_err(|e| MintCooldownError::StorageUnavailable(e.to_string()))
    }
}
