//! Adapters implementing the outbound ports

pub mod clock;
pub mod memory;
pub mod webhook;

pub use clock::SystemClock;
pub use memory::{
    CollectingEventSink, InMemoryKvStore, ManualClock, MockChainClient, NullEventSink,
    RecordingNotifier,
};
pub use webhook::WebhookNotifier;
