//! Outbound ports (driven side - SPI)

use crate::error::Result;
use crate::events::MintEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port: Read balances and submit mints on the chain
///
/// The chain itself never rejects a mint for cooldown reasons; the
/// window is enforced entirely by this controller. A single on-chain
/// call per mint, no partial or multi-step semantics.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Read the current NFT balance of an account
    async fn read_balance(&self, account: &str) -> Result<u64>;

    /// Submit a mint transaction for an account
    async fn mint(&self, account: &str) -> Result<TransactionHandle>;

    /// Wait for the receipt of a previously submitted transaction
    async fn await_receipt(&self, handle: &TransactionHandle) -> Result<TransactionReceipt>;
}

/// Handle to a submitted but not yet confirmed transaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionHandle {
    /// Transaction hash as reported by the chain
    pub hash: String,
}

/// Terminal outcome of a submitted transaction
#[derive(Clone, Debug)]
pub struct TransactionReceipt {
    /// Transaction hash this receipt belongs to
    pub hash: String,

    /// Whether the transaction succeeded
    pub success: bool,
}

/// Port: Durable string key-value storage
///
/// Models the host's synchronous storage surface. Values are plain
/// strings; JSON encoding of structured values is the caller's concern.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; absent keys are not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// Port: Deliver a push notification through the host webhook
#[async_trait]
pub trait Notifier: Send + Sync {
    /// POST the payload to the registered endpoint
    ///
    /// 2xx means delivered to the host; anything else is a dispatch
    /// failure. The controller never retries a failed dispatch.
    async fn dispatch(&self, url: &str, payload: &NotificationPayload) -> Result<()>;
}

/// Wire payload of a notification dispatch (host-defined camelCase JSON)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    /// Unique per dispatch; the host de-duplicates on this id
    pub notification_id: String,

    /// Notification title
    pub title: String,

    /// Notification body text
    pub body: String,

    /// URL the host opens when the notification is tapped
    pub target_url: String,

    /// Delivery tokens; always a single registered token here
    pub tokens: Vec<String>,
}

/// Port: Source of current time in epoch milliseconds
///
/// Injected so eligibility checks, notification ids, and the watch loop
/// never reach into ambient globals and stay testable.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch
    fn now_ms(&self) -> u64;
}

/// Port: Observe controller state transitions
///
/// Replaces framework-driven re-rendering: a UI layer registers a sink
/// and reacts to events, or polls [`super::MintStatus`] instead.
pub trait EventSink: Send + Sync {
    /// Publish a state-transition event; must not block
    fn publish(&self, event: MintEvent);
}
