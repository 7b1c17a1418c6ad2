//! Scripted [`ChainGateway`] for exercising the executor and run loop
//! without a live chain (SPEC_FULL.md "Test tooling"): the gateway is an
//! external collaborator per spec.md §1, so tests drive the core against
//! a fake of its interface and the real `SledExchangeStore`.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex
    }
};

use alloy_primitives::{Address, B256};
use async_trait::async_trait;
use pingpong_gateway::{ChainGateway, FeeData, GatewayError, MempoolHit, MempoolPong, PingLog, PongLog, Tx};

#[derive(Default)]
pub struct MockGateway {
    wallet:        Address,
    block_height:  AtomicU64,
    pings:         Mutex<Vec<PingLog>>,
    pongs:         Mutex<Vec<PongLog>>,
    transactions:  Mutex<HashMap<B256, Tx>>,
    fee_data:      Mutex<Option<FeeData>>,
    mempool_hits:  Mutex<HashMap<B256, MempoolHit>>,
    mempool_pongs: Mutex<Vec<MempoolPong>>,
    next_nonce:    AtomicU64,
    next_pong_tag: AtomicU64,
    /// Every `pong()` call, recorded as `(ping_hash, nonce, assigned_hash)`.
    pub submitted: Mutex<Vec<(B256, u64, B256)>>,
    /// Every `bump_transaction_fees` call.
    pub bumped:    Mutex<Vec<(B256, FeeData, String)>>
}

impl MockGateway {
    pub fn new(wallet: Address) -> Self {
        Self { wallet, next_nonce: AtomicU64::new(0), ..Default::default() }
    }

    pub fn set_block_height(&self, height: u64) {
        self.block_height.store(height, Ordering::SeqCst);
    }

    pub fn push_ping(&self, log: PingLog) {
        self.pings.lock().unwrap().push(log);
    }

    pub fn push_pong(&self, log: PongLog) {
        self.pongs.lock().unwrap().push(log);
    }

    pub fn set_transaction(&self, tx: Tx) {
        self.transactions.lock().unwrap().insert(tx.hash, tx);
    }

    pub fn set_fee_data(&self, fee_data: FeeData) {
        *self.fee_data.lock().unwrap() = Some(fee_data);
    }

    pub fn set_next_nonce(&self, nonce: u64) {
        self.next_nonce.store(nonce, Ordering::SeqCst);
    }

    pub fn set_mempool_hit(&self, tx_hash: B256, hit: MempoolHit) {
        self.mempool_hits.lock().unwrap().insert(tx_hash, hit);
    }

    pub fn set_mempool_pongs(&self, pongs: Vec<MempoolPong>) {
        *self.mempool_pongs.lock().unwrap() = pongs;
    }

    fn fabricate_pong_hash(&self, ping_hash: B256) -> B256 {
        let tag = self.next_pong_tag.fetch_add(1, Ordering::SeqCst);
        let mut bytes = ping_hash.0;
        bytes[0] = bytes[0].wrapping_add(1);
        bytes[31] = tag as u8;
        B256::from(bytes)
    }
}

#[async_trait]
impl ChainGateway for MockGateway {
    async fn current_block_height(&self) -> Result<u64, GatewayError> {
        Ok(self.block_height.load(Ordering::SeqCst))
    }

    async fn get_pings(&self, from_block: u64, to_block: u64) -> Result<Vec<PingLog>, GatewayError> {
        Ok(self
            .pings
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.block_number >= from_block && p.block_number <= to_block)
            .copied()
            .collect())
    }

    async fn get_pongs(&self, from_block: u64, to_block: u64) -> Result<Vec<PongLog>, GatewayError> {
        Ok(self
            .pongs
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.block_number >= from_block && p.block_number <= to_block)
            .copied()
            .collect())
    }

    async fn get_transaction(&self, tx_hash: B256) -> Result<Option<Tx>, GatewayError> {
        Ok(self.transactions.lock().unwrap().get(&tx_hash).copied())
    }

    fn wallet_address(&self) -> Address {
        self.wallet
    }

    async fn wallet_nonce(&self) -> Result<u64, GatewayError> {
        Ok(self.next_nonce.load(Ordering::SeqCst))
    }

    async fn refresh_fee_data(&self) -> Result<(), GatewayError> {
        Ok(())
    }

    fn current_fee_data(&self) -> Option<FeeData> {
        *self.fee_data.lock().unwrap()
    }

    async fn pong(&self, ping_hash: B256, nonce: Option<u64>) -> Result<B256, GatewayError> {
        let nonce = match nonce {
            Some(nonce) => nonce,
            None => self.next_nonce.load(Ordering::SeqCst)
        };
        let pong_hash = self.fabricate_pong_hash(ping_hash);
        self.submitted.lock().unwrap().push((ping_hash, nonce, pong_hash));
        Ok(pong_hash)
    }

    async fn search_mempool_transaction(&self, tx_hash: B256) -> Result<Option<MempoolHit>, GatewayError> {
        Ok(self.mempool_hits.lock().unwrap().get(&tx_hash).cloned())
    }

    async fn bump_transaction_fees(
        &self,
        stale_tx: &Tx,
        new_fees: FeeData,
        provider_name: &str
    ) -> Result<(), GatewayError> {
        self.bumped.lock().unwrap().push((stale_tx.hash, new_fees, provider_name.to_string()));
        Ok(())
    }

    async fn scan_my_mempool_pongs(&self) -> Result<Vec<MempoolPong>, GatewayError> {
        Ok(self.mempool_pongs.lock().unwrap().clone())
    }
}

pub fn tx(hash: B256, from: Address, nonce: u64, max_fee: u128, priority_fee: u128, block_number: Option<u64>) -> Tx {
    Tx {
        hash,
        from,
        to: None,
        input: Default::default(),
        nonce,
        max_fee_per_gas: max_fee,
        max_priority_fee_per_gas: priority_fee,
        block_number
    }
}
