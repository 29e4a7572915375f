//! In-memory implementations of the outbound ports for testing

use crate::error::{MintCooldownError, Result};
use crate::events::MintEvent;
use crate::ports::{
    ChainClient, Clock, EventSink, KeyValueStore, Notifier, NotificationPayload,
    TransactionHandle, TransactionReceipt,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

/// In-memory implementation of KeyValueStore
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryKvStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent reads fail, simulating an unavailable store
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent writes fail, simulating quota exhaustion
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MintCooldownError::StorageUnavailable(
                "read failure injected".to_string(),
            ));
        }
        let entries = self
            .entries
            .read()
            .map_err(|_| MintCooldownError::StorageUnavailable("lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MintCooldownError::StorageUnavailable(
                "write failure injected".to_string(),
            ));
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| MintCooldownError::StorageUnavailable("lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MintCooldownError::StorageUnavailable(
                "write failure injected".to_string(),
            ));
        }
        let mut entries = self
            .entries
            .write()
            .map_err(|_| MintCooldownError::StorageUnavailable("lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Manually advanced clock for deterministic tests
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Jump to an absolute instant
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }

    /// Advance by a delta and return the new instant
    pub fn advance(&self, delta_ms: u64) -> u64 {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst) + delta_ms
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

/// Scripted chain client for testing
pub struct MockChainClient {
    balance: AtomicU64,
    fail_calls: AtomicBool,
    receipt_success: AtomicBool,
    submitted: AtomicU64,
}

impl MockChainClient {
    /// Create a client reporting the given balance
    pub fn new(balance: u64) -> Self {
        Self {
            balance: AtomicU64::new(balance),
            fail_calls: AtomicBool::new(false),
            receipt_success: AtomicBool::new(true),
            submitted: AtomicU64::new(0),
        }
    }

    /// Set the balance the next read returns
    pub fn set_balance(&self, balance: u64) {
        self.balance.store(balance, Ordering::SeqCst);
    }

    /// Make all chain calls fail
    pub fn fail_calls(&self, fail: bool) {
        self.fail_calls.store(fail, Ordering::SeqCst);
    }

    /// Control whether receipts report success
    pub fn set_receipt_success(&self, success: bool) {
        self.receipt_success.store(success, Ordering::SeqCst);
    }

    /// Number of mint transactions submitted
    pub fn submitted_count(&self) -> u64 {
        self.submitted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn read_balance(&self, _account: &str) -> Result<u64> {
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(MintCooldownError::ChainCallFailed("rpc unavailable".to_string()));
        }
        Ok(self.balance.load(Ordering::SeqCst))
    }

    async fn mint(&self, _account: &str) -> Result<TransactionHandle> {
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(MintCooldownError::ChainCallFailed("rpc unavailable".to_string()));
        }
        let seq = self.submitted.fetch_add(1, Ordering::SeqCst);
        Ok(TransactionHandle {
            hash: format!("0xmint{seq:064x}"),
        })
    }

    async fn await_receipt(&self, handle: &TransactionHandle) -> Result<TransactionReceipt> {
        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(MintCooldownError::ChainCallFailed("rpc unavailable".to_string()));
        }
        Ok(TransactionReceipt {
            hash: handle.hash.clone(),
            success: self.receipt_success.load(Ordering::SeqCst),
        })
    }
}

/// Notifier that records dispatches instead of delivering them
pub struct RecordingNotifier {
    dispatched: Mutex<Vec<(String, NotificationPayload)>>,
    fail_dispatch: AtomicBool,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self {
            dispatched: Mutex::new(Vec::new()),
            fail_dispatch: AtomicBool::new(false),
        }
    }

    /// Make subsequent dispatches fail with a non-2xx response
    pub fn fail_dispatch(&self, fail: bool) {
        self.fail_dispatch.store(fail, Ordering::SeqCst);
    }

    /// Copy of everything dispatched so far
    pub fn dispatched(&self) -> Vec<(String, NotificationPayload)> {
        self.dispatched.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Number of dispatch calls that reached this notifier
    pub fn count(&self) -> usize {
        self.dispatched.lock().map(|d| d.len()).unwrap_or(0)
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn dispatch(&self, url: &str, payload: &NotificationPayload) -> Result<()> {
        self.dispatched
            .lock()
            .map_err(|_| MintCooldownError::StorageUnavailable("lock poisoned".to_string()))?
            .push((url.to_string(), payload.clone()));
        if self.fail_dispatch.load(Ordering::SeqCst) {
            return Err(MintCooldownError::NotificationDispatchFailed {
                status: Some(500),
                detail: "dispatch failure injected".to_string(),
            });
        }
        Ok(())
    }
}

/// Event sink that drops everything
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn publish(&self, _event: MintEvent) {}
}

/// Event sink that collects events for assertions
pub struct CollectingEventSink {
    events: Mutex<Vec<MintEvent>>,
}

impl CollectingEventSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Copy of all collected events
    pub fn events(&self) -> Vec<MintEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl Default for CollectingEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for CollectingEventSink {
    fn publish(&self, event: MintEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
