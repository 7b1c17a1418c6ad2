use alloy_primitives::{Address, Bytes, B256};

/// A finalized `Ping()` log (spec §4.A `getPings`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingLog {
    pub tx_hash:      B256,
    pub block_number: u64
}

/// A finalized `Pong(bytes32)` log (spec §4.A `getPongs`). `ping_hash` is
/// the indexed argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PongLog {
    pub tx_hash:      B256,
    pub block_number: u64,
    pub ping_hash:    B256
}

/// The subset of an on-chain (or mempool-pending) transaction the core
/// needs: sender, nonce, EIP-1559 fee fields, and mined status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tx {
    pub hash:                     B256,
    pub from:                     Address,
    pub to:                       Option<Address>,
    pub input:                    Bytes,
    pub nonce:                    u64,
    pub max_fee_per_gas:          u128,
    pub max_priority_fee_per_gas: u128,
    pub block_number:             Option<u64>
}

/// Cached EIP-1559 fee estimate (spec §4.A `currentFeeData`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeData {
    pub max_fee:      u128,
    pub priority_fee: u128
}

/// A transaction found in one provider's mempool view, tagged with the
/// provider that saw it so a later fee bump can be replayed against the
/// same provider (spec §4.A `bumpTransactionFees`).
#[derive(Debug, Clone)]
pub struct MempoolHit {
    pub provider_name: String,
    pub tx:             Tx
}

/// One of our own pongs discovered by scanning every configured
/// provider's pending block (spec §4.D.v).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MempoolPong {
    pub ping_hash:  B256,
    pub ping_block: u64,
    pub pong_hash:  B256,
    pub pong_nonce: u64
}
