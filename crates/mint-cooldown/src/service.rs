//! Concrete Mint Cooldown Controller
//!
//! This module provides the concrete implementation of the MintService
//! trait: one instance per `(namespace, account)` pair, driven by the UI
//! layer and by its own periodic watch loop.

use crate::{
    adapters::NullEventSink,
    config::MintAppConfig,
    domain::{keys, CooldownState, MintRecord, NotificationRegistration},
    error::{MintCooldownError, Result},
    events::MintEvent,
    ports::{
        ChainClient, Clock, EventSink, KeyValueStore, MintService, MintStatus, Notifier,
        NotificationPayload, TransactionHandle,
    },
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Mutable controller state, owned exclusively by one instance
struct ControllerState {
    record: MintRecord,
    registration: Option<NotificationRegistration>,
    /// Consumed once per mint cycle; re-armed on each confirmed mint
    notification_dispatched: bool,
    /// Whether a previous check observed a positive remaining time.
    /// The dispatch fires on the transition edge, not on the level.
    cooling: bool,
    initialized: bool,
    last_error: Option<String>,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            record: MintRecord::new(),
            registration: None,
            notification_dispatched: false,
            cooling: false,
            initialized: false,
            last_error: None,
        }
    }
}

/// Concrete implementation of MintService
///
/// Tracks the per-account mint count with max-merge reconciliation
/// against the on-chain balance, enforces the cooldown window locally
/// (the chain itself accepts mints at any time), and dispatches the
/// cooldown-ready notification once per cycle from its watch loop.
///
/// Cloning is cheap and shares all state; the watch loop runs on a clone.
#[derive(Clone)]
pub struct MintCooldownController {
    config: Arc<MintAppConfig>,
    account: String,
    state: Arc<RwLock<ControllerState>>,
    kv: Arc<dyn KeyValueStore>,
    chain: Arc<dyn ChainClient>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    events: Arc<dyn EventSink>,
    watch_active: Arc<AtomicBool>,
    watch_handle: Arc<Mutex<Option<tokio::task::JoinHandle<()>>>>,
}

impl MintCooldownController {
    /// Create a controller for one account
    pub fn new(
        config: MintAppConfig,
        account: impl Into<String>,
        kv: Arc<dyn KeyValueStore>,
        chain: Arc<dyn ChainClient>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let account = account.into();

        info!("[mint-cooldown] Initializing controller");
        info!("  App: {}", config.app_name);
        info!("  Account: {}", account);
        info!("  Cooldown: {}ms", config.cooldown_ms);

        Ok(Self {
            config: Arc::new(config),
            account,
            state: Arc::new(RwLock::new(ControllerState::new())),
            kv,
            chain,
            notifier,
            clock,
            events: Arc::new(NullEventSink),
            watch_active: Arc::new(AtomicBool::new(false)),
            watch_handle: Arc::new(Mutex::new(None)),
        })
    }

    /// Attach an event sink for state-transition notifications
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Record an error on the status surface
    fn note_error(&self, err: &MintCooldownError) {
        if let Ok(mut st) = self.state.write() {
            st.last_error = Some(err.to_string());
        }
    }

    /// Persist the mint count under the namespaced key
    fn persist_count(&self, count: u64) -> Result<()> {
        let key = keys::mint_count_key(&self.config.storage_prefix, &self.account);
        self.kv.put(&key, &count.to_string()).map_err(|e| {
            warn!("[mint-cooldown] Failed to persist count: {e}");
            self.note_error(&e);
            e
        })
    }

    /// Build and dispatch a notification to the registered endpoint
    ///
    /// The notification id is time-derived (`{prefix}-{now_ms}`), unique
    /// per dispatch so the host's de-duplication never collapses two
    /// distinct cooldown-ready events.
    async fn send_notification(&self, registration: &NotificationRegistration) -> Result<String> {
        let now_ms = self.clock.now_ms();
        let notification_id = format!("{}-{}", self.config.storage_prefix, now_ms);
        let payload = NotificationPayload {
            notification_id: notification_id.clone(),
            title: self.config.notification.title.clone(),
            body: self.config.notification.body.clone(),
            target_url: self.config.notification.target_url.clone(),
            tokens: vec![registration.token.clone()],
        };

        debug!(
            "[mint-cooldown] Dispatching notification {} to {}",
            notification_id, registration.url
        );
        match self.notifier.dispatch(&registration.url, &payload).await {
            Ok(()) => {
                self.events.publish(MintEvent::NotificationDispatched {
                    notification_id: notification_id.clone(),
                    timestamp: now_ms,
                });
                Ok(notification_id)
            }
            Err(e) => {
                warn!("[mint-cooldown] Notification dispatch failed: {e}");
                self.note_error(&e);
                self.events.publish(MintEvent::NotificationFailed {
                    reason: e.to_string(),
                    timestamp: now_ms,
                });
                Err(e)
            }
        }
    }
}

#[async_trait]
impl MintService for MintCooldownController {
    fn initialize(&self) {
        let count_key = keys::mint_count_key(&self.config.storage_prefix, &self.account);
        let time_key = keys::last_mint_time_key(&self.config.storage_prefix);

        let minted_count = match self.kv.get(&count_key) {
            Ok(Some(raw)) => raw.parse::<u64>().unwrap_or_else(|_| {
                warn!("[mint-cooldown] Corrupt count record, defaulting to 0");
                0
            }),
            Ok(None) => 0,
            Err(e) => {
                warn!("[mint-cooldown] Count read failed, defaulting to 0: {e}");
                0
            }
        };

        let last_mint_at = match self.kv.get(&time_key) {
            Ok(Some(raw)) => raw.parse::<u64>().ok(),
            Ok(None) => None,
            Err(e) => {
                warn!("[mint-cooldown] Timestamp read failed, defaulting to none: {e}");
                None
            }
        };

        let registration = match self.kv.get(&self.config.registration_storage_key) {
            Ok(Some(raw)) => match NotificationRegistration::from_stored_json(&raw) {
                Ok(reg) => Some(reg),
                Err(e) => {
                    warn!("[mint-cooldown] Corrupt registration record, ignoring: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("[mint-cooldown] Registration read failed, ignoring: {e}");
                None
            }
        };

        let mut st = self.state.write().unwrap();
        st.record = MintRecord {
            minted_count,
            last_mint_at,
        };
        st.registration = registration;
        st.notification_dispatched = false;
        st.cooling = false;
        st.initialized = true;
        debug!(
            "[mint-cooldown] Loaded state: count={}, last_mint_at={:?}, registered={}",
            st.record.minted_count,
            st.record.last_mint_at,
            st.registration.is_some()
        );
    }

    async fn refresh_balance(&self) -> Result<u64> {
        let balance = self.chain.read_balance(&self.account).await.map_err(|e| {
            self.note_error(&e);
            e
        })?;
        self.reconcile_on_chain_balance(balance)?;
        Ok(self.state.read().unwrap().record.minted_count)
    }

    fn reconcile_on_chain_balance(&self, on_chain_balance: u64) -> Result<bool> {
        let (changed, minted_count) = {
            let mut st = self.state.write().unwrap();
            let changed = st.record.reconcile(on_chain_balance);
            (changed, st.record.minted_count)
        };
        if changed {
            debug!(
                "[mint-cooldown] Reconciled on-chain balance {} into count {}",
                on_chain_balance, minted_count
            );
            self.events.publish(MintEvent::BalanceReconciled {
                account: self.account.clone(),
                minted_count,
            });
            self.persist_count(minted_count)?;
        }
        Ok(changed)
    }

    fn evaluate_cooldown(&self, now_ms: u64) -> CooldownState {
        let last_mint_at = self.state.read().unwrap().record.last_mint_at;
        CooldownState::evaluate(last_mint_at, now_ms, self.config.cooldown_ms)
    }

    async fn tick(&self, now_ms: u64) {
        let (edge, dispatch_due) = {
            let mut st = self.state.write().unwrap();
            let cooldown = CooldownState::evaluate(
                st.record.last_mint_at,
                now_ms,
                self.config.cooldown_ms,
            );
            if !cooldown.eligible {
                st.cooling = true;
                (false, false)
            } else if st.cooling {
                // Remaining time crossed from positive to zero
                st.cooling = false;
                let due = st.registration.is_some() && !st.notification_dispatched;
                if due {
                    st.notification_dispatched = true;
                }
                (true, due)
            } else {
                (false, false)
            }
        };

        if edge {
            info!("[mint-cooldown] Cooldown expired, minting eligible again");
            self.events.publish(MintEvent::CooldownReady {
                account: self.account.clone(),
                timestamp: now_ms,
            });
        }
        if dispatch_due {
            // Failed sends are not replayed; the cycle's latch stays consumed
            let _ = self.dispatch_ready_notification().await;
        }
    }

    async fn request_mint(&self) -> Result<TransactionHandle> {
        let cooldown = self.evaluate_cooldown(self.clock.now_ms());
        if !cooldown.eligible {
            return Err(MintCooldownError::AlreadyCoolingDown {
                remaining_ms: cooldown.remaining_ms,
            });
        }

        info!("[mint-cooldown] Submitting mint for {}", self.account);
        let handle = self.chain.mint(&self.account).await.map_err(|e| {
            self.note_error(&e);
            e
        })?;
        debug!("[mint-cooldown] Mint submitted: {}", handle.hash);
        Ok(handle)
    }

    async fn await_mint_confirmation(&self, handle: TransactionHandle) -> Result<()> {
        let receipt = self.chain.await_receipt(&handle).await.map_err(|e| {
            self.note_error(&e);
            e
        })?;
        if !receipt.success {
            let err =
                MintCooldownError::ChainCallFailed(format!("transaction {} reverted", receipt.hash));
            self.note_error(&err);
            return Err(err);
        }
        self.on_mint_confirmed(self.clock.now_ms())
    }

    fn on_mint_confirmed(&self, now_ms: u64) -> Result<()> {
        let minted_count = {
            let mut st = self.state.write().unwrap();
            st.record.record_confirmed(now_ms);
            st.notification_dispatched = false;
            // The new window is known to be positive; arm the edge tracker
            // even if no tick runs before it expires
            st.cooling = true;
            st.record.minted_count
        };

        info!("[mint-cooldown] Mint confirmed: count={}", minted_count);
        self.events.publish(MintEvent::MintConfirmed {
            account: self.account.clone(),
            minted_count,
            timestamp: now_ms,
        });

        // In-memory state above is final either way; only the storage
        // outcome is reported
        let count_result = self.persist_count(minted_count);
        let time_key = keys::last_mint_time_key(&self.config.storage_prefix);
        let time_result = self.kv.put(&time_key, &now_ms.to_string()).map_err(|e| {
            warn!("[mint-cooldown] Failed to persist mint time: {e}");
            self.note_error(&e);
            e
        });
        count_result.and(time_result)
    }

    async fn dispatch_ready_notification(&self) -> Result<String> {
        let registration = self
            .state
            .read()
            .unwrap()
            .registration
            .clone()
            .ok_or(MintCooldownError::NotRegistered)?;
        self.send_notification(&registration).await
    }

    async fn send_test_notification(&self) -> Result<String> {
        let registration = self
            .state
            .read()
            .unwrap()
            .registration
            .clone()
            .ok_or(MintCooldownError::NotRegistered)?;
        debug!("[mint-cooldown] Sending test notification");
        self.send_notification(&registration).await
    }

    fn set_notification_registration(&self, registration: NotificationRegistration) -> Result<()> {
        let json = registration.to_stored_json()?;
        self.kv
            .put(&self.config.registration_storage_key, &json)
            .map_err(|e| {
                self.note_error(&e);
                e
            })?;
        self.state.write().unwrap().registration = Some(registration);
        self.events.publish(MintEvent::RegistrationEnabled);
        info!("[mint-cooldown] Notifications enabled");
        Ok(())
    }

    fn clear_notification_registration(&self) -> Result<()> {
        self.kv
            .remove(&self.config.registration_storage_key)
            .map_err(|e| {
                self.note_error(&e);
                e
            })?;
        self.state.write().unwrap().registration = None;
        self.events.publish(MintEvent::RegistrationDisabled);
        info!("[mint-cooldown] Notifications disabled");
        Ok(())
    }

    fn status(&self) -> MintStatus {
        let now_ms = self.clock.now_ms();
        let st = self.state.read().unwrap();
        let cooldown =
            CooldownState::evaluate(st.record.last_mint_at, now_ms, self.config.cooldown_ms);
        MintStatus {
            account: self.account.clone(),
            minted_count: st.record.minted_count,
            last_mint_at: st.record.last_mint_at,
            remaining_ms: cooldown.remaining_ms,
            eligible: cooldown.eligible,
            registered: st.registration.is_some(),
            notification_dispatched: st.notification_dispatched,
            watching: self.watch_active.load(Ordering::SeqCst),
            last_error: st.last_error.clone(),
        }
    }

    fn start_watch(&self) -> Result<()> {
        if !self.state.read().unwrap().initialized {
            // Starting before the load would flash "eligible" on stale state
            return Err(MintCooldownError::NotInitialized);
        }
        if self.watch_active.swap(true, Ordering::SeqCst) {
            debug!("[mint-cooldown] Watch loop already running");
            return Ok(());
        }

        let controller = self.clone();
        let tick_interval = Duration::from_millis(self.config.tick_interval_ms);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if !controller.watch_active.load(Ordering::SeqCst) {
                    break;
                }
                let now_ms = controller.clock.now_ms();
                controller.tick(now_ms).await;
            }
        });
        *self.watch_handle.lock().unwrap() = Some(handle);
        info!(
            "[mint-cooldown] Watch loop started ({}ms resolution)",
            self.config.tick_interval_ms
        );
        Ok(())
    }

    fn stop_watch(&self) {
        if !self.watch_active.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(handle) = self.watch_handle.lock().unwrap().take() {
            handle.abort();
        }
        info!("[mint-cooldown] Watch loop stopped");
    }
}
