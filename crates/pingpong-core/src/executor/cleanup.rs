use super::Executor;
use crate::error::CoreError;

impl Executor {
    /// spec §4.D.iii. Bounded: a `Completed` exchange's `pongBlock` is
    /// always at least `CONFIRMATION_BLOCKS` behind head, so a replayed
    /// log in that range can never resurrect a just-deleted record.
    pub(crate) async fn cleanup(&self) -> Result<(), CoreError> {
        let removed = self.store.remove_completed_exchanges()?;
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "cleaned up completed exchanges");
        }
        Ok(())
    }
}
