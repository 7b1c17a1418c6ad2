use std::{path::Path, sync::RwLock};

use alloy_primitives::B256;
use pingpong_types::{Exchange, Iteration};
use tracing::{debug, warn};

use crate::{error::StoreError, CompletedFields, ExchangeStore, PongIssuedFields};

const ITERATION_KEY: &[u8] = b"iteration";
const ITERATION_TREE: &str = "iteration";
const EXCHANGES_TREE: &str = "exchanges";

struct Handles {
    db:        sled::Db,
    iteration: sled::Tree,
    exchanges: sled::Tree
}

/// Embedded ordered key/value store backed by `sled` (spec §6 "Persisted
/// state layout"). Keys in the `exchanges` tree are lowercase 0x-prefixed
/// hex of the 32-byte ping hash, which sorts identically to the
/// underlying bytes — scans over `sled::Tree::iter()` therefore visit
/// records in the same key order the spec assumes.
pub struct SledExchangeStore {
    handles: RwLock<Option<Handles>>
}

impl SledExchangeStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = sled::open(path)?;
        let iteration = db.open_tree(ITERATION_TREE)?;
        let exchanges = db.open_tree(EXCHANGES_TREE)?;
        Ok(Self { handles: RwLock::new(Some(Handles { db, iteration, exchanges })) })
    }

    fn with_handles<R>(&self, f: impl FnOnce(&Handles) -> Result<R, StoreError>) -> Result<R, StoreError> {
        let guard = self.handles.read().expect("store lock poisoned");
        match guard.as_ref() {
            Some(handles) => f(handles),
            None => Err(StoreError::Closed)
        }
    }

    fn exchange_key(ping_hash: B256) -> String {
        format!("0x{}", alloy_primitives::hex::encode(ping_hash))
    }

    fn decode_exchange(bytes: &[u8]) -> Result<Exchange, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl ExchangeStore for SledExchangeStore {
    fn get_iteration(&self) -> Result<Option<Iteration>, StoreError> {
        self.with_handles(|h| match h.iteration.get(ITERATION_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None)
        })
    }

    fn set_iteration(&self, iteration: &Iteration) -> Result<(), StoreError> {
        self.with_handles(|h| {
            let bytes = serde_json::to_vec(iteration)?;
            h.iteration.insert(ITERATION_KEY, bytes)?;
            h.db.flush()?;
            Ok(())
        })
    }

    fn get_exchange(&self, ping_hash: B256) -> Result<Option<Exchange>, StoreError> {
        self.with_handles(|h| match h.exchanges.get(Self::exchange_key(ping_hash))? {
            Some(bytes) => Ok(Some(Self::decode_exchange(&bytes)?)),
            None => Ok(None)
        })
    }

    fn put_ping_detected(&self, ping_hash: B256, ping_block: u64) -> Result<(), StoreError> {
        self.with_handles(|h| {
            let key = Self::exchange_key(ping_hash);
            if let Some(existing) = h.exchanges.get(&key)? {
                let existing = Self::decode_exchange(&existing)?;
                if !matches!(existing, Exchange::Detected { .. }) {
                    debug!(%ping_hash, "refusing to downgrade exchange to Detected");
                    return Ok(());
                }
            }
            let record = Exchange::Detected { ping_hash, ping_block };
            h.exchanges.insert(key, serde_json::to_vec(&record)?)?;
            h.db.flush()?;
            Ok(())
        })
    }

    fn put_pong_issued(&self, fields: PongIssuedFields) -> Result<(), StoreError> {
        self.with_handles(|h| {
            let key = Self::exchange_key(fields.ping_hash);
            if let Some(existing) = h.exchanges.get(&key)? {
                let existing = Self::decode_exchange(&existing)?;
                if existing.is_completed() {
                    warn!(ping_hash = %fields.ping_hash, "refusing to downgrade a Completed exchange to PongIssued");
                    return Ok(());
                }
            }
            let pong_timestamp = fields.pong_timestamp.unwrap_or_else(now_secs);
            let record = Exchange::PongIssued {
                ping_hash:      fields.ping_hash,
                ping_block:     fields.ping_block,
                pong_hash:      fields.pong_hash,
                pong_nonce:     fields.pong_nonce,
                pong_timestamp
            };
            h.exchanges.insert(key, serde_json::to_vec(&record)?)?;
            h.db.flush()?;
            Ok(())
        })
    }

    fn put_completed_exchange(&self, fields: CompletedFields) -> Result<(), StoreError> {
        self.with_handles(|h| {
            let key = Self::exchange_key(fields.ping_hash);
            let existing = match h.exchanges.get(&key)? {
                Some(bytes) => Some(Self::decode_exchange(&bytes)?),
                None => None
            };

            let ping_block = fields.ping_block.or_else(|| match &existing {
                Some(Exchange::Detected { ping_block, .. }) => Some(*ping_block),
                Some(Exchange::PongIssued { ping_block, .. }) => Some(*ping_block),
                Some(Exchange::Completed { ping_block, .. }) => *ping_block,
                None => None
            });
            let pong_timestamp = fields.pong_timestamp.or_else(|| match &existing {
                Some(Exchange::PongIssued { pong_timestamp, .. }) => Some(*pong_timestamp),
                Some(Exchange::Completed { pong_timestamp, .. }) => *pong_timestamp,
                _ => None
            });

            let record = Exchange::Completed {
                ping_hash: fields.ping_hash,
                ping_block,
                pong_hash: fields.pong_hash,
                pong_block: fields.pong_block,
                pong_nonce: fields.pong_nonce,
                pong_timestamp
            };
            h.exchanges.insert(key, serde_json::to_vec(&record)?)?;
            h.db.flush()?;
            Ok(())
        })
    }

    fn get_ping_detected_exchanges(&self) -> Result<Vec<Exchange>, StoreError> {
        self.with_handles(|h| {
            let mut out = Vec::new();
            for entry in h.exchanges.iter() {
                let (_, bytes) = entry?;
                let exchange = Self::decode_exchange(&bytes)?;
                if matches!(exchange, Exchange::Detected { .. }) {
                    out.push(exchange);
                }
            }
            Ok(out)
        })
    }

    fn get_stale_pong_issued_exchanges(&self, now: u64, timeout_secs: u64) -> Result<Vec<Exchange>, StoreError> {
        self.with_handles(|h| {
            let mut out = Vec::new();
            for entry in h.exchanges.iter() {
                let (_, bytes) = entry?;
                let exchange = Self::decode_exchange(&bytes)?;
                if let Exchange::PongIssued { pong_timestamp, .. } = exchange {
                    if now.saturating_sub(pong_timestamp) >= timeout_secs {
                        out.push(exchange);
                    }
                }
            }
            Ok(out)
        })
    }

    fn remove_completed_exchanges(&self) -> Result<Vec<Exchange>, StoreError> {
        self.with_handles(|h| {
            let mut removed = Vec::new();
            let mut batch = sled::Batch::default();
            for entry in h.exchanges.iter() {
                let (key, bytes) = entry?;
                let exchange = Self::decode_exchange(&bytes)?;
                if exchange.is_completed() {
                    batch.remove(key);
                    removed.push(exchange);
                }
            }
            h.exchanges.apply_batch(batch)?;
            h.db.flush()?;
            Ok(removed)
        })
    }

    fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.handles.write().expect("store lock poisoned");
        if let Some(handles) = guard.take() {
            handles.db.flush()?;
        }
        Ok(())
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs()
}
