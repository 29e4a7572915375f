//! Hexagonal architecture ports

pub mod inbound;
pub mod outbound;

pub use inbound::{MintService, MintStatus};
pub use outbound::{
    ChainClient, Clock, EventSink, KeyValueStore, Notifier, NotificationPayload,
    TransactionHandle, TransactionReceipt,
};
