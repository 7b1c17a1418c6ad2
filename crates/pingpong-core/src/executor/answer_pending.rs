use pingpong_store::PongIssuedFields;

use super::Executor;
use crate::error::CoreError;

impl Executor {
    /// spec §4.D.iv. Consecutive nonces from a single wallet-nonce
    /// snapshot, submitted and persisted one at a time — never batched —
    /// so a crash mid-loop leaves at most one submitted-but-unstored
    /// pong, which the next recovery's mempool scan will reclaim.
    pub(crate) async fn answer_pending_pings(&self) -> Result<(), CoreError> {
        let pending = self.store.get_ping_detected_exchanges()?;
        if pending.is_empty() {
            return Ok(());
        }

        let mut nonce = self.gateway.wallet_nonce().await?;

        for exchange in pending {
            let (ping_hash, ping_block) =
                exchange.as_detected().expect("get_ping_detected_exchanges only returns Detected records");

            let pong_hash = self.gateway.pong(ping_hash, Some(nonce)).await?;
            self.store.put_pong_issued(PongIssuedFields {
                ping_hash,
                ping_block,
                pong_hash,
                pong_nonce: nonce,
                pong_timestamp: None
            })?;
            nonce += 1;
        }

        Ok(())
    }
}
