use pingpong_store::PongIssuedFields;

use super::Executor;
use crate::error::CoreError;

impl Executor {
    /// spec §4.D.v, run only during `RecoveryStart`. Lets a
    /// freshly-reinitialized bot rediscover pongs it had in flight
    /// before a crash, so recovery never double-issues for them.
    pub(crate) async fn process_mempool(&self) -> Result<(), CoreError> {
        let pongs = self.gateway.scan_my_mempool_pongs().await?;

        for pong in pongs {
            self.store.put_pong_issued(PongIssuedFields {
                ping_hash:      pong.ping_hash,
                ping_block:     pong.ping_block,
                pong_hash:      pong.pong_hash,
                pong_nonce:     pong.pong_nonce,
                pong_timestamp: None
            })?;
        }

        Ok(())
    }
}
