use alloy_primitives::B256;
use serde::{Deserialize, Serialize};

/// The lifecycle of one ping/pong pair, keyed by the ping transaction hash.
///
/// Forward-only: `Detected -> PongIssued -> Completed`. The mempool-scan
/// phase of recovery is the one exception allowed by spec §3 invariant 2 —
/// it may install a `PongIssued` where no `Detected` record ever existed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum Exchange {
    Detected {
        ping_hash: B256,
        ping_block: u64
    },
    PongIssued {
        ping_hash: B256,
        ping_block: u64,
        pong_hash: B256,
        pong_nonce: u64,
        pong_timestamp: u64
    },
    Completed {
        ping_hash: B256,
        ping_block: Option<u64>,
        pong_hash: B256,
        pong_block: u64,
        pong_nonce: u64,
        pong_timestamp: Option<u64>
    }
}

impl Exchange {
    pub fn ping_hash(&self) -> B256 {
        match self {
            Exchange::Detected { ping_hash, .. } => *ping_hash,
            Exchange::PongIssued { ping_hash, .. } => *ping_hash,
            Exchange::Completed { ping_hash, .. } => *ping_hash
        }
    }

    pub fn as_detected(&self) -> Option<(B256, u64)> {
        match self {
            Exchange::Detected { ping_hash, ping_block } => Some((*ping_hash, *ping_block)),
            _ => None
        }
    }

    pub fn as_pong_issued(&self) -> Option<(B256, u64, B256, u64, u64)> {
        match self {
            Exchange::PongIssued { ping_hash, ping_block, pong_hash, pong_nonce, pong_timestamp } => {
                Some((*ping_hash, *ping_block, *pong_hash, *pong_nonce, *pong_timestamp))
            }
            _ => None
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Exchange::Completed { .. })
    }

    /// Rank used to enforce the forward-only ordering: `Detected(0) < PongIssued(1) < Completed(2)`.
    pub fn rank(&self) -> u8 {
        match self {
            Exchange::Detected { .. } => 0,
            Exchange::PongIssued { .. } => 1,
            Exchange::Completed { .. } => 2
        }
    }
}
