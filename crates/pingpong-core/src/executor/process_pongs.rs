use pingpong_store::CompletedFields;
use pingpong_types::Exchange;
use tracing::debug;

use super::Executor;
use crate::error::CoreError;

impl Executor {
    /// spec §4.D.i. In normal mode a `Pong` only completes an exchange
    /// whose stored record is `PongIssued` with a matching `pongHash` —
    /// anything else is someone else's pong, or a stale duplicate, and
    /// is ignored. In recovery mode the sender's identity is the only
    /// signal we trust, since storage may have just been wiped.
    pub(crate) async fn process_pongs(&self, from_block: u64, to_block: u64, recovery: bool) -> Result<(), CoreError> {
        let pongs = self.gateway.get_pongs(from_block, to_block).await?;

        for pong in pongs {
            if recovery {
                let tx = self
                    .gateway
                    .get_transaction(pong.tx_hash)
                    .await?
                    .ok_or(CoreError::MissingTransaction(pong.tx_hash))?;

                if tx.from != self.gateway.wallet_address() {
                    debug!(ping_hash = %pong.ping_hash, pong_hash = %pong.tx_hash, "ignoring pong from another wallet");
                    continue;
                }

                self.store.put_completed_exchange(CompletedFields {
                    ping_hash:      pong.ping_hash,
                    ping_block:     None,
                    pong_hash:      pong.tx_hash,
                    pong_block:     pong.block_number,
                    pong_nonce:     tx.nonce,
                    pong_timestamp: None
                })?;
            } else {
                match self.store.get_exchange(pong.ping_hash)? {
                    Some(Exchange::PongIssued { pong_hash, ping_block, pong_nonce, pong_timestamp, .. })
                        if pong_hash == pong.tx_hash =>
                    {
                        self.store.put_completed_exchange(CompletedFields {
                            ping_hash:      pong.ping_hash,
                            ping_block:     Some(ping_block),
                            pong_hash:      pong.tx_hash,
                            pong_block:     pong.block_number,
                            pong_nonce,
                            pong_timestamp: Some(pong_timestamp)
                        })?;
                    }
                    other => {
                        debug!(
                            ping_hash = %pong.ping_hash,
                            pong_hash = %pong.tx_hash,
                            stored = ?other,
                            "ignoring pong that doesn't match our stored PongIssued record"
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
