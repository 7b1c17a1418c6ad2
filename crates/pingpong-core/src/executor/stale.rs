use pingpong_gateway::FeeData;
use pingpong_store::PongIssuedFields;
use tracing::debug;

use super::{now_secs, Executor};
use crate::{error::CoreError, fees::calculate_bump_fees};

impl Executor {
    /// Component E (spec §4.E): reconciles `PongIssued` exchanges that
    /// have been unconfirmed for longer than `STALE_PONG_TIMEOUT_MINUTES`.
    pub(crate) async fn process_stale_pongs(&self) -> Result<(), CoreError> {
        let now = now_secs();
        let stale = self
            .store
            .get_stale_pong_issued_exchanges(now, self.config.stale_pong_timeout_secs())?;
        if stale.is_empty() {
            return Ok(());
        }

        self.gateway.refresh_fee_data().await?;
        let current_fees = self.gateway.current_fee_data().ok_or(CoreError::FeeDataUnavailable)?;

        for exchange in stale {
            let (ping_hash, ping_block, pong_hash, _pong_nonce, _pong_timestamp) =
                exchange.as_pong_issued().expect("get_stale_pong_issued_exchanges only returns PongIssued records");

            match self.gateway.search_mempool_transaction(pong_hash).await? {
                None => {
                    // Dropped from every mempool we can see: resubmit with a fresh nonce.
                    let nonce = self.gateway.wallet_nonce().await?;
                    let new_pong_hash = self.gateway.pong(ping_hash, Some(nonce)).await?;
                    self.store.put_pong_issued(PongIssuedFields {
                        ping_hash,
                        ping_block,
                        pong_hash: new_pong_hash,
                        pong_nonce: nonce,
                        pong_timestamp: None
                    })?;
                }
                Some(hit) if hit.tx.block_number.is_some() => {
                    // Actually mined; the next processPongs pass will complete it.
                }
                Some(hit) => {
                    match calculate_bump_fees(
                        hit.tx.max_fee_per_gas,
                        hit.tx.max_priority_fee_per_gas,
                        current_fees.max_fee,
                        current_fees.priority_fee
                    ) {
                        None => {
                            debug!(%ping_hash, "stale pong's fees already meet the current estimate");
                        }
                        Some(bumped) => {
                            let new_fees = FeeData { max_fee: bumped.max_fee, priority_fee: bumped.priority_fee };
                            self.gateway
                                .bump_transaction_fees(&hit.tx, new_fees, &hit.provider_name)
                                .await?;
                            self.store.put_pong_issued(PongIssuedFields {
                                ping_hash,
                                ping_block,
                                pong_hash,
                                pong_nonce: hit.tx.nonce,
                                pong_timestamp: Some(now_secs())
                            })?;
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
