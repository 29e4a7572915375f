//! Derived cooldown eligibility state

/// Snapshot of cooldown progress at a given instant
///
/// Derived from the persisted mint record on every check; never stored.
/// Safe to compute arbitrarily often with the same or advancing `now`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CooldownState {
    /// Milliseconds until minting becomes eligible; zero when eligible
    pub remaining_ms: u64,

    /// Whether a mint may be submitted right now
    pub eligible: bool,
}

impl CooldownState {
    /// Evaluate cooldown progress at `now_ms`
    ///
    /// An absent `last_mint_at` means no mint has happened this session,
    /// which is immediately eligible. A `now_ms` earlier than the anchor
    /// (host clock rewound) clamps to the full window instead of wrapping.
    pub fn evaluate(last_mint_at: Option<u64>, now_ms: u64, cooldown_ms: u64) -> Self {
        let remaining_ms = match last_mint_at {
            None => 0,
            Some(anchor) => {
                let elapsed = now_ms.saturating_sub(anchor);
                cooldown_ms.saturating_sub(elapsed)
            }
        };
        Self {
            remaining_ms,
            eligible: remaining_ms == 0,
        }
    }

    /// Remaining time rounded up to whole seconds, as shown to users
    pub fn remaining_secs_ceil(&self) -> u64 {
        self.remaining_ms.div_ceil(1_000)
    }
}
