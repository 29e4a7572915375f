//! Inbound ports (driving side - API)

use crate::domain::{CooldownState, NotificationRegistration};
use crate::error::Result;
use crate::ports::outbound::TransactionHandle;
use async_trait::async_trait;

/// Primary port: mint tracking and cooldown service for one account
///
/// One instance owns the state for exactly one `(namespace, account)`
/// pair; all methods take `&self` and are safe to call from the UI task
/// and the watch loop.
#[async_trait]
pub trait MintService: Send + Sync {
    /// Load persisted state: the mint record and any stored registration
    ///
    /// Storage failures degrade to defaults for the session and are
    /// logged, never surfaced. No side effects beyond the reads.
    fn initialize(&self);

    /// Read the on-chain balance and merge it into the local count
    ///
    /// Returns the reconciled cumulative count, which may exceed the
    /// chain's answer when local confirmed mints have not landed yet.
    async fn refresh_balance(&self) -> Result<u64>;

    /// Merge an externally obtained on-chain balance into the local count
    ///
    /// Never decreases the count; returns whether it changed.
    fn reconcile_on_chain_balance(&self, on_chain_balance: u64) -> Result<bool>;

    /// Evaluate cooldown progress at `now_ms`; pure, no side effects
    fn evaluate_cooldown(&self, now_ms: u64) -> CooldownState;

    /// Run one periodic cooldown check at `now_ms`
    ///
    /// Detects the remaining-time transition from positive to zero and
    /// dispatches the cooldown-ready notification exactly once per mint
    /// cycle. Idempotent when invoked twice with the same `now_ms`.
    async fn tick(&self, now_ms: u64);

    /// Submit a mint for this account
    ///
    /// Fails with `AlreadyCoolingDown` while the window is active. State
    /// is not mutated until the transaction confirms.
    async fn request_mint(&self) -> Result<TransactionHandle>;

    /// Wait for a submitted mint to confirm, then apply it
    async fn await_mint_confirmation(&self, handle: TransactionHandle) -> Result<()>;

    /// Apply a confirmed mint at `now_ms`
    ///
    /// Bumps and persists the count, anchors and persists the cooldown,
    /// and re-arms the notification dispatch for the new cycle. In-memory
    /// state is updated even when persistence fails; the storage error is
    /// surfaced afterwards.
    fn on_mint_confirmed(&self, now_ms: u64) -> Result<()>;

    /// Send the cooldown-ready notification; returns the notification id
    async fn dispatch_ready_notification(&self) -> Result<String>;

    /// Manually send a notification with the configured content
    ///
    /// Shares the payload shape and unique-id rule with the cooldown
    /// dispatch but ignores the per-cycle latch.
    async fn send_test_notification(&self) -> Result<String>;

    /// Persist a notification opt-in
    fn set_notification_registration(&self, registration: NotificationRegistration) -> Result<()>;

    /// Remove the stored opt-in; pending dispatch eligibility is dropped
    fn clear_notification_registration(&self) -> Result<()>;

    /// Snapshot of the controller state for polling UIs
    fn status(&self) -> MintStatus;

    /// Start the periodic cooldown watch loop
    ///
    /// Fails with `NotInitialized` before persisted state is loaded, so a
    /// spurious eligible flash can never dispatch. Idempotent while
    /// already running.
    fn start_watch(&self) -> Result<()>;

    /// Stop the watch loop; an already issued dispatch is not cancelled
    fn stop_watch(&self);
}

/// Point-in-time view of the controller, cheap to poll every frame
#[derive(Clone, Debug)]
pub struct MintStatus {
    /// Account this controller instance tracks
    pub account: String,

    /// Cumulative mint count after reconciliation
    pub minted_count: u64,

    /// Epoch milliseconds of the last confirmed mint
    pub last_mint_at: Option<u64>,

    /// Milliseconds until minting becomes eligible
    pub remaining_ms: u64,

    /// Whether a mint may be submitted right now
    pub eligible: bool,

    /// Whether a notification registration is stored
    pub registered: bool,

    /// Whether this cycle's notification has been dispatched
    pub notification_dispatched: bool,

    /// Whether the watch loop is running
    pub watching: bool,

    /// Most recent surfaced error, if any
    pub last_error: Option<String>,
}
