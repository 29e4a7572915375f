//! Domain layer - Pure logic for mint tracking and cooldown evaluation
//!
//! This module contains the persisted record, the derived cooldown state,
//! and the notification registration value object. All code here is pure
//! (no I/O, no async, no clock reads); time always arrives as a parameter.
//!
//! ## Entities
//!
//! - [`MintRecord`]: Persisted per-account mint count and last mint time
//! - [`CooldownState`]: Derived eligibility snapshot, never persisted
//! - [`NotificationRegistration`]: Stored endpoint + token opt-in record
//!
//! ## Invariants
//!
//! 1. `minted_count` is monotonically non-decreasing within a session
//! 2. Max-merge reconciliation is commutative and idempotent
//! 3. Cooldown eligibility flips at exactly `last_mint_at + cooldown_ms`
//! 4. An absent `last_mint_at` means immediately eligible

pub mod cooldown;
pub mod keys;
pub mod record;
pub mod registration;

pub use cooldown::CooldownState;
pub use keys::{mint_count_key, last_mint_time_key};
pub use record::MintRecord;
pub use registration::NotificationRegistration;
