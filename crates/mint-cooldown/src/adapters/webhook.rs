//! Webhook notifier over HTTP

use crate::error::{MintCooldownError, Result};
use crate::ports::{Notifier, NotificationPayload};
use async_trait::async_trait;
use std::time::Duration;

/// Notifier that POSTs the payload to the host-provided endpoint
///
/// The endpoint URL comes from the stored registration, not from
/// configuration: each user/device registers its own.
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    /// Create a notifier with bounded request timeouts
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(3))
            .build()
            .map_err(|e| MintCooldownError::NotificationDispatchFailed {
                status: None,
                detail: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn dispatch(&self, url: &str, payload: &NotificationPayload) -> Result<()> {
        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                let detail = if e.is_connect() {
                    format!("cannot connect to {url}")
                } else {
                    e.to_string()
                };
                MintCooldownError::NotificationDispatchFailed {
                    status: None,
                    detail,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read response".to_string());
            return Err(MintCooldownError::NotificationDispatchFailed {
                status: Some(status.as_u16()),
                detail: body,
            });
        }
        Ok(())
    }
}
