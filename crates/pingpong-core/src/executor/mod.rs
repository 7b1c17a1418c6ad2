mod answer_pending;
mod cleanup;
mod mempool;
mod process_pings;
mod process_pongs;
mod stale;

use std::sync::Arc;

use pingpong_gateway::ChainGateway;
use pingpong_store::ExchangeStore;
use pingpong_types::{BotConfig, Iteration};
use tracing::instrument;

use crate::error::CoreError;

/// Component D (spec §4.D): dispatches the per-phase actions according
/// to iteration type. Phase order within each branch is load-bearing —
/// see spec §4.D for why pongs are always processed before pings, and
/// why `Recovery` defers `answerPendingPings`/`processStalePongs` to
/// `RecoveryEnd`.
pub struct Executor {
    gateway: Arc<dyn ChainGateway>,
    store:   Arc<dyn ExchangeStore>,
    config:  BotConfig
}

impl Executor {
    pub fn new(gateway: Arc<dyn ChainGateway>, store: Arc<dyn ExchangeStore>, config: BotConfig) -> Self {
        Self { gateway, store, config }
    }

    #[instrument(skip(self), fields(iteration = ?iteration))]
    pub async fn execute(&self, iteration: &Iteration) -> Result<(), CoreError> {
        match iteration {
            Iteration::RecoveryStart { .. } => self.process_mempool().await,
            Iteration::Normal { from_block, to_block, .. } => {
                self.process_pongs(*from_block, *to_block, false).await?;
                self.process_pings(*from_block, *to_block).await?;
                self.cleanup().await?;
                self.answer_pending_pings().await?;
                self.process_stale_pongs().await?;
                Ok(())
            }
            Iteration::Recovery { from_block, to_block, .. } => {
                self.process_pongs(*from_block, *to_block, true).await?;
                self.process_pings(*from_block, *to_block).await?;
                self.cleanup().await?;
                Ok(())
            }
            Iteration::RecoveryEnd { .. } => self.answer_pending_pings().await
        }
    }
}

pub(crate) fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_secs()
}
