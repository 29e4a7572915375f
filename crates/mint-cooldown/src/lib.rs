//! # MintDrop - Mint Cooldown Controller
//!
//! Host-side controller for the MintDrop mini-app family: tracks how many
//! NFTs an account has minted, enforces a fixed cooldown window between
//! mints, and dispatches a one-shot "ready again" push notification when
//! the window expires.
//!
//! ## Purpose
//!
//! The controller owns the one piece of real state in the mini apps:
//! - Per-account mint counting with max-merge reconciliation against a
//!   possibly lagging on-chain balance
//! - Cooldown eligibility derived from the last confirmed mint time
//! - Edge-triggered notification dispatch, at most once per mint cycle
//!
//! Wallet connection, contract ABI wiring, and rendering stay in the host
//! application; they reach this crate only through the outbound ports.
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Adapters (Outer)                                   │
//! │  - WebhookNotifier: HTTP POST to the host endpoint  │
//! │  - SystemClock, in-memory test doubles              │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: MintService                             │
//! │  - Outbound: ChainClient, KeyValueStore, Notifier,  │
//! │    Clock, EventSink                                 │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - MintRecord (max-merge reconciliation)            │
//! │  - CooldownState (pure eligibility evaluation)      │
//! │  - NotificationRegistration                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Monotonic count**: a stale chain read never regresses the local
//!    mint count
//! 2. **Exact boundary**: eligibility flips at `last_mint_at + cooldown`
//! 3. **Edge-triggered dispatch**: the notification fires on the
//!    remaining-time transition to zero, never on repeated level checks
//! 4. **One dispatch per cycle**: the latch is consumed on dispatch and
//!    re-armed only by the next confirmed mint
//! 5. **No spurious dispatch**: the watch loop cannot start before
//!    persisted state is loaded
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! let controller = MintCooldownController::new(
//!     MintAppConfig::default(),
//!     account,
//!     kv, chain, notifier, Arc::new(SystemClock),
//! )?;
//! controller.initialize();
//! controller.start_watch()?;
//! let handle = controller.request_mint().await?;
//! controller.await_mint_confirmation(handle).await?;
//! ```
//!
//! ## Module Structure
//!
//! - [`domain`]: Pure domain logic (records, cooldown evaluation, keys)
//! - [`ports`]: Hexagonal architecture interfaces (inbound/outbound)
//! - [`adapters`]: External integrations (webhook, clock, test doubles)
//! - [`events`]: Observable state-transition events

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Outbound port adapters
pub mod adapters;
/// Domain models and pure logic
pub mod domain;
/// Event type definitions
pub mod events;
pub mod ports;
pub mod service;

mod config;
mod error;

pub use config::{MintAppConfig, NotificationContent};
pub use error::{MintCooldownError, Result};

// Re-export commonly used types
pub use domain::{CooldownState, MintRecord, NotificationRegistration};

pub use ports::{
    ChainClient, Clock, EventSink, KeyValueStore, MintService, MintStatus, Notifier,
    NotificationPayload, TransactionHandle, TransactionReceipt,
};

pub use events::MintEvent;

pub use adapters::{SystemClock, WebhookNotifier};

pub use service::MintCooldownController;

/// Default cooldown window after a confirmed mint (60 seconds)
pub const DEFAULT_COOLDOWN_MS: u64 = 60_000;

/// Default resolution of the periodic cooldown check
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;
