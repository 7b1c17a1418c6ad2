use super::Executor;
use crate::error::CoreError;

impl Executor {
    /// spec §4.D.ii. Idempotent across iterations: an already-known
    /// `pingHash` is left untouched rather than re-detected.
    pub(crate) async fn process_pings(&self, from_block: u64, to_block: u64) -> Result<(), CoreError> {
        let pings = self.gateway.get_pings(from_block, to_block).await?;

        for ping in pings {
            if self.store.get_exchange(ping.tx_hash)?.is_some() {
                continue;
            }
            self.store.put_ping_detected(ping.tx_hash, ping.block_number)?;
        }

        Ok(())
    }
}
