//! Configuration types for the mint cooldown controller

use crate::error::{MintCooldownError, Result};
use serde::Deserialize;

/// Runtime configuration for one mini-app instance
///
/// The source family of mini apps differed only in naming, storage
/// namespace, and notification content. One controller parametrized by
/// this struct replaces all of them.
#[derive(Clone, Debug, Deserialize)]
pub struct MintAppConfig {
    /// Human-readable app name (used as the notification title default)
    pub app_name: String,

    /// Namespace prefix for persisted keys and notification ids
    pub storage_prefix: String,

    /// Fixed key under which the notification registration is stored
    pub registration_storage_key: String,

    /// Cooldown window after a confirmed mint, in milliseconds
    pub cooldown_ms: u64,

    /// Resolution of the periodic cooldown check, in milliseconds
    pub tick_interval_ms: u64,

    /// Content of dispatched notifications
    pub notification: NotificationContent,
}

impl Default for MintAppConfig {
    fn default() -> Self {
        Self {
            app_name: "Demo Mini App".to_string(),
            storage_prefix: "demo".to_string(),
            registration_storage_key: "demo-notification-details".to_string(),
            cooldown_ms: crate::DEFAULT_COOLDOWN_MS,
            tick_interval_ms: crate::DEFAULT_TICK_INTERVAL_MS,
            notification: NotificationContent::default(),
        }
    }
}

impl MintAppConfig {
    /// Validate configuration invariants
    pub fn validate(&self) -> Result<()> {
        if self.storage_prefix.is_empty() {
            return Err(MintCooldownError::InvalidConfig(
                "storage_prefix must not be empty".to_string(),
            ));
        }
        if self.registration_storage_key.is_empty() {
            return Err(MintCooldownError::InvalidConfig(
                "registration_storage_key must not be empty".to_string(),
            ));
        }
        if self.cooldown_ms == 0 {
            return Err(MintCooldownError::InvalidConfig(
                "cooldown_ms must be positive".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(MintCooldownError::InvalidConfig(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Notification content shared by the cooldown-ready dispatch and the
/// manual test send
#[derive(Clone, Debug, Deserialize)]
pub struct NotificationContent {
    /// Notification title
    pub title: String,

    /// Notification body text
    pub body: String,

    /// URL the host opens when the notification is tapped
    pub target_url: String,
}

impl Default for NotificationContent {
    fn default() -> Self {
        Self {
            title: "Demo Mini App".to_string(),
            body: "This is a test notification".to_string(),
            target_url: String::new(),
        }
    }
}
