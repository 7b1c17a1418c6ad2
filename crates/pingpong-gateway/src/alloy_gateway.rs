use std::{sync::Arc, time::Duration};

use alloy_eips::BlockNumberOrTag;
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, B256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::{BlockTransactions, Filter, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::SolCall;
use alloy_transport_http::{Client, Http};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use pingpong_types::contract::{pongCall, PingEvent, PongEvent};
use tokio::sync::RwLock;
use url::Url;

use crate::{
    error::GatewayError,
    types::{FeeData, MempoolHit, MempoolPong, PingLog, PongLog, Tx},
    ChainGateway
};

type DynProvider = Arc<dyn Provider<Http<Client>> + Send + Sync>;

/// One configured RPC endpoint: a human-readable name (used to replay a
/// fee bump through the same provider that saw the stale tx) and its URL.
#[derive(Debug, Clone)]
pub struct ProviderSpec {
    pub name: String,
    pub url:  Url
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub contract_address: Address,
    /// 0x-prefixed hex-encoded secp256k1 private key.
    pub private_key: String,
    /// At least one provider; order determines which is "primary"
    /// (used for log scans, nonce/fee queries, and the first pong of an
    /// iteration). Every provider participates in mempool scans.
    pub providers: Vec<ProviderSpec>
}

struct NamedProvider {
    name:     String,
    provider: DynProvider
}

/// The production [`ChainGateway`]: one `alloy` HTTP provider per
/// configured RPC endpoint, a single wallet shared across all of them, a
/// cached EIP-1559 fee estimate, and a token-bucket rate limiter shared
/// by every outbound call (spec §5 "Rate limiting").
pub struct AlloyChainGateway {
    providers:        Vec<NamedProvider>,
    wallet_address:   Address,
    contract_address: Address,
    fee_data:         RwLock<Option<FeeData>>,
    limiter:          DefaultDirectRateLimiter
}

impl AlloyChainGateway {
    /// `min_rpc_spacing` is the minimum gap enforced between any two
    /// outbound RPC calls (spec §5 "Rate limiting": `1000 / PROVIDERS_RPS`
    /// ms) — see [`pingpong_types::BotConfig::min_rpc_spacing`].
    pub fn new(config: GatewayConfig, min_rpc_spacing: Duration) -> Result<Self, GatewayError> {
        if config.providers.is_empty() {
            return Err(GatewayError::NoProvidersConfigured);
        }

        let signer: PrivateKeySigner = config
            .private_key
            .parse()
            .map_err(|e: <PrivateKeySigner as std::str::FromStr>::Err| GatewayError::InvalidPrivateKey(e.to_string()))?;
        let wallet_address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let providers = config
            .providers
            .into_iter()
            .map(|spec| {
                let provider: DynProvider = Arc::new(
                    ProviderBuilder::new()
                        .wallet(wallet.clone())
                        .on_http(spec.url)
                );
                NamedProvider { name: spec.name, provider }
            })
            .collect();

        // `with_period` sizes the bucket's burst at 1: exactly one token is
        // replenished every `min_rpc_spacing`, so calls are spaced out
        // rather than allowed to fire in an initial burst of `providers_rps`
        // before spacing kicks in.
        let quota = Quota::with_period(min_rpc_spacing).expect("min_rpc_spacing must be a positive duration");

        Ok(Self {
            providers,
            wallet_address,
            contract_address: config.contract_address,
            fee_data: RwLock::new(None),
            limiter: RateLimiter::direct(quota)
        })
    }

    fn primary(&self) -> &NamedProvider {
        &self.providers[0]
    }

    fn provider_by_name(&self, name: &str) -> Result<&NamedProvider, GatewayError> {
        self.providers
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| GatewayError::UnknownProvider(name.to_string()))
    }

    async fn throttle(&self) {
        self.limiter.until_ready().await;
    }

    fn decode_our_pong(&self, tx: &alloy_rpc_types::Transaction) -> Option<(B256, u64)> {
        if tx.from != self.wallet_address {
            return None;
        }
        if tx.to != Some(self.contract_address) {
            return None;
        }
        let input = &tx.input;
        if input.len() < 36 || input[0..4] != pongCall::SELECTOR {
            return None;
        }
        let ping_hash = B256::from_slice(&input[4..36]);
        Some((ping_hash, tx.nonce))
    }

    fn to_core_tx(tx: alloy_rpc_types::Transaction) -> Tx {
        Tx {
            hash: tx.hash,
            from: tx.from,
            to: tx.to,
            input: tx.input.clone(),
            nonce: tx.nonce,
            max_fee_per_gas: tx.max_fee_per_gas.unwrap_or_else(|| tx.gas_price.unwrap_or_default()),
            max_priority_fee_per_gas: tx.max_priority_fee_per_gas.unwrap_or_default(),
            block_number: tx.block_number
        }
    }
}

#[async_trait]
impl ChainGateway for AlloyChainGateway {
    async fn current_block_height(&self) -> Result<u64, GatewayError> {
        self.throttle().await;
        self.primary()
            .provider
            .get_block_number()
            .await
            .map_err(|source| GatewayError::Rpc { provider: self.primary().name.clone(), source })
    }

    async fn get_pings(&self, from_block: u64, to_block: u64) -> Result<Vec<PingLog>, GatewayError> {
        self.throttle().await;
        let filter = Filter::new()
            .address(self.contract_address)
            .event_signature(PingEvent::SIGNATURE_HASH)
            .from_block(from_block)
            .to_block(to_block);
        let logs = self
            .primary()
            .provider
            .get_logs(&filter)
            .await
            .map_err(|source| GatewayError::Rpc { provider: self.primary().name.clone(), source })?;
        Ok(logs
            .into_iter()
            .filter_map(|log| {
                Some(PingLog {
                    tx_hash:      log.transaction_hash?,
                    block_number: log.block_number?
                })
            })
            .collect())
    }

    async fn get_pongs(&self, from_block: u64, to_block: u64) -> Result<Vec<PongLog>, GatewayError> {
        self.throttle().await;
        let filter = Filter::new()
            .address(self.contract_address)
            .event_signature(PongEvent::SIGNATURE_HASH)
            .from_block(from_block)
            .to_block(to_block);
        let logs = self
            .primary()
            .provider
            .get_logs(&filter)
            .await
            .map_err(|source| GatewayError::Rpc { provider: self.primary().name.clone(), source })?;
        Ok(logs
            .into_iter()
            .filter_map(|log| {
                let ping_hash = *log.topics().get(1)?;
                Some(PongLog {
                    tx_hash: log.transaction_hash?,
                    block_number: log.block_number?,
                    ping_hash
                })
            })
            .collect())
    }

    async fn get_transaction(&self, tx_hash: B256) -> Result<Option<Tx>, GatewayError> {
        self.throttle().await;
        let tx = self
            .primary()
            .provider
            .get_transaction_by_hash(tx_hash)
            .await
            .map_err(|source| GatewayError::Rpc { provider: self.primary().name.clone(), source })?;
        Ok(tx.map(Self::to_core_tx))
    }

    fn wallet_address(&self) -> Address {
        self.wallet_address
    }

    async fn wallet_nonce(&self) -> Result<u64, GatewayError> {
        self.throttle().await;
        self.primary()
            .provider
            .get_transaction_count(self.wallet_address)
            .pending()
            .await
            .map_err(|source| GatewayError::Rpc { provider: self.primary().name.clone(), source })
    }

    async fn refresh_fee_data(&self) -> Result<(), GatewayError> {
        self.throttle().await;
        let estimate = self
            .primary()
            .provider
            .estimate_eip1559_fees(None)
            .await
            .map_err(|source| GatewayError::Rpc { provider: self.primary().name.clone(), source })?;
        *self.fee_data.write().await = Some(FeeData {
            max_fee:      estimate.max_fee_per_gas,
            priority_fee: estimate.max_priority_fee_per_gas
        });
        Ok(())
    }

    fn current_fee_data(&self) -> Option<FeeData> {
        self.fee_data.try_read().ok().and_then(|g| *g)
    }

    async fn pong(&self, ping_hash: B256, nonce: Option<u64>) -> Result<B256, GatewayError> {
        let fees = self.current_fee_data().ok_or(GatewayError::FeeDataUnavailable)?;
        let nonce = match nonce {
            Some(nonce) => nonce,
            None => self.wallet_nonce().await?
        };
        let calldata = pongCall { pingHash: ping_hash }.abi_encode();

        self.throttle().await;
        let request = TransactionRequest::default()
            .with_from(self.wallet_address)
            .with_to(self.contract_address)
            .with_input(calldata)
            .with_nonce(nonce)
            .with_max_fee_per_gas(fees.max_fee)
            .with_max_priority_fee_per_gas(fees.priority_fee);

        let pending = self
            .primary()
            .provider
            .send_transaction(request)
            .await
            .map_err(|source| GatewayError::Rpc { provider: self.primary().name.clone(), source })?;
        Ok(*pending.tx_hash())
    }

    async fn search_mempool_transaction(&self, tx_hash: B256) -> Result<Option<MempoolHit>, GatewayError> {
        for named in &self.providers {
            self.throttle().await;
            let tx = named
                .provider
                .get_transaction_by_hash(tx_hash)
                .await
                .map_err(|source| GatewayError::Rpc { provider: named.name.clone(), source })?;
            if let Some(tx) = tx {
                return Ok(Some(MempoolHit { provider_name: named.name.clone(), tx: Self::to_core_tx(tx) }));
            }
        }
        Ok(None)
    }

    async fn bump_transaction_fees(
        &self,
        stale_tx: &Tx,
        new_fees: FeeData,
        provider_name: &str
    ) -> Result<(), GatewayError> {
        let named = self.provider_by_name(provider_name)?;
        let mut request = TransactionRequest::default()
            .with_from(self.wallet_address)
            .with_input(stale_tx.input.clone())
            .with_nonce(stale_tx.nonce)
            .with_max_fee_per_gas(new_fees.max_fee)
            .with_max_priority_fee_per_gas(new_fees.priority_fee);
        if let Some(to) = stale_tx.to {
            request = request.with_to(to);
        }

        self.throttle().await;
        named
            .provider
            .send_transaction(request)
            .await
            .map_err(|source| GatewayError::Rpc { provider: named.name.clone(), source })?;
        Ok(())
    }

    async fn scan_my_mempool_pongs(&self) -> Result<Vec<MempoolPong>, GatewayError> {
        let mut found = std::collections::HashMap::new();

        for named in &self.providers {
            self.throttle().await;
            let block = named
                .provider
                .get_block_by_number(BlockNumberOrTag::Pending, false)
                .await
                .map_err(|source| GatewayError::Rpc { provider: named.name.clone(), source })?;
            let Some(block) = block else { continue };
            let BlockTransactions::Hashes(hashes) = block.transactions else { continue };

            for hash in hashes {
                self.throttle().await;
                let tx = named
                    .provider
                    .get_transaction_by_hash(hash)
                    .await
                    .map_err(|source| GatewayError::Rpc { provider: named.name.clone(), source })?;
                let Some(tx) = tx else { continue };
                if let Some((ping_hash, pong_nonce)) = self.decode_our_pong(&tx) {
                    // Resolve the real block the Ping transaction landed in,
                    // the same way `process_pongs` resolves the pong's
                    // transaction during recovery — `pingBlock` is a
                    // concrete `u64` per spec §3/§4.A, not a sentinel. If the
                    // ping itself isn't mined yet (or has vanished), skip it
                    // this round rather than inventing a block number; the
                    // next sweep will pick it up once it confirms. Providers
                    // are queried in configured order and the first one to
                    // report a given pingHash wins (spec §9 open question);
                    // later disagreement is logged, not silently overwritten.
                    self.throttle().await;
                    let ping_tx = self
                        .primary()
                        .provider
                        .get_transaction_by_hash(ping_hash)
                        .await
                        .map_err(|source| GatewayError::Rpc { provider: self.primary().name.clone(), source })?;
                    let Some(ping_block) = ping_tx.and_then(|tx| tx.block_number) else {
                        tracing::debug!(%ping_hash, "ping for in-flight mempool pong not yet confirmed; skipping for now");
                        continue;
                    };

                    match found.entry(ping_hash) {
                        std::collections::hash_map::Entry::Vacant(entry) => {
                            entry.insert(MempoolPong { ping_hash, ping_block, pong_hash: hash, pong_nonce });
                        }
                        std::collections::hash_map::Entry::Occupied(entry) => {
                            let existing = entry.get();
                            if existing.pong_hash != hash || existing.pong_nonce != pong_nonce {
                                tracing::warn!(
                                    %ping_hash,
                                    provider = %named.name,
                                    existing_pong_hash = %existing.pong_hash,
                                    conflicting_pong_hash = %hash,
                                    "providers disagree on our in-flight pong; keeping the first-seen one"
                                );
                            }
                        }
                    }
                }
            }
        }

        Ok(found.into_values().collect())
    }
}
