//! Component B (spec §4.B): durable, crash-safe storage of the iteration
//! singleton and the per-ping exchange records.

mod error;
mod sled_store;

use alloy_primitives::B256;
pub use error::StoreError;
use pingpong_types::{Exchange, Iteration};
pub use sled_store::SledExchangeStore;

/// Fields accepted by `putPongIssued` (spec §4.B). `pong_timestamp`
/// defaults to "now" when absent — this is the field the stale
/// reconciler reads, so callers issuing a fresh submission leave it
/// `None` and callers restarting the stale timer pass `Some(now)`.
#[derive(Debug, Clone, Copy)]
pub struct PongIssuedFields {
    pub ping_hash:      B256,
    pub ping_block:     u64,
    pub pong_hash:      B256,
    pub pong_nonce:     u64,
    pub pong_timestamp: Option<u64>
}

/// Fields accepted by `putCompletedExchange` (spec §4.B). `ping_block`
/// and `pong_timestamp` are optional because recovery's mempool-sourced
/// completions may never have observed the original ping.
#[derive(Debug, Clone, Copy)]
pub struct CompletedFields {
    pub ping_hash:      B256,
    pub ping_block:     Option<u64>,
    pub pong_hash:      B256,
    pub pong_block:     u64,
    pub pong_nonce:     u64,
    pub pong_timestamp: Option<u64>
}

pub trait ExchangeStore: Send + Sync {
    fn get_iteration(&self) -> Result<Option<Iteration>, StoreError>;

    fn set_iteration(&self, iteration: &Iteration) -> Result<(), StoreError>;

    fn get_exchange(&self, ping_hash: B256) -> Result<Option<Exchange>, StoreError>;

    /// Writes a `Detected` record. Refuses to downgrade an existing
    /// non-`Detected` record (spec §4.B, invariant 2).
    fn put_ping_detected(&self, ping_hash: B256, ping_block: u64) -> Result<(), StoreError>;

    fn put_pong_issued(&self, fields: PongIssuedFields) -> Result<(), StoreError>;

    fn put_completed_exchange(&self, fields: CompletedFields) -> Result<(), StoreError>;

    fn get_ping_detected_exchanges(&self) -> Result<Vec<Exchange>, StoreError>;

    /// `PongIssued` records whose `pong_timestamp` is at least
    /// `timeout_secs` behind `now`.
    fn get_stale_pong_issued_exchanges(&self, now: u64, timeout_secs: u64) -> Result<Vec<Exchange>, StoreError>;

    /// Deletes every `Completed` exchange and returns what was removed.
    fn remove_completed_exchanges(&self) -> Result<Vec<Exchange>, StoreError>;

    /// Flushes and releases the underlying handle. Idempotent.
    fn close(&self) -> Result<(), StoreError>;
}
