//! Component A (spec §4.A): the chain gateway interface the core
//! consumes, plus an `alloy`-backed implementation.
//!
//! The core never talks to an RPC endpoint directly — it only ever calls
//! through [`ChainGateway`]. Every method may fail; failure propagates as
//! an iteration abort (spec §7).

mod alloy_gateway;
mod error;
mod types;

pub use alloy_gateway::{AlloyChainGateway, GatewayConfig, ProviderSpec};
use alloy_primitives::{Address, B256};
use async_trait::async_trait;
pub use error::GatewayError;
pub use types::{FeeData, MempoolHit, MempoolPong, PingLog, PongLog, Tx};

#[async_trait]
pub trait ChainGateway: Send + Sync {
    async fn current_block_height(&self) -> Result<u64, GatewayError>;

    async fn get_pings(&self, from_block: u64, to_block: u64) -> Result<Vec<PingLog>, GatewayError>;

    async fn get_pongs(&self, from_block: u64, to_block: u64) -> Result<Vec<PongLog>, GatewayError>;

    async fn get_transaction(&self, tx_hash: B256) -> Result<Option<Tx>, GatewayError>;

    fn wallet_address(&self) -> Address;

    async fn wallet_nonce(&self) -> Result<u64, GatewayError>;

    async fn refresh_fee_data(&self) -> Result<(), GatewayError>;

    fn current_fee_data(&self) -> Option<FeeData>;

    /// Submits a `pong(pingHash)` using the cached fee data. When `nonce`
    /// is `None` a fresh nonce is fetched from the wallet provider.
    async fn pong(&self, ping_hash: B256, nonce: Option<u64>) -> Result<B256, GatewayError>;

    async fn search_mempool_transaction(&self, tx_hash: B256) -> Result<Option<MempoolHit>, GatewayError>;

    async fn bump_transaction_fees(
        &self,
        stale_tx: &Tx,
        new_fees: FeeData,
        provider_name: &str
    ) -> Result<(), GatewayError>;

    async fn scan_my_mempool_pongs(&self) -> Result<Vec<MempoolPong>, GatewayError>;
}
