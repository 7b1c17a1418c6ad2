use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc
};

use pingpong_gateway::ChainGateway;
use pingpong_store::ExchangeStore;
use pingpong_types::{BotConfig, IterationState};
use tokio::sync::Notify;
use tracing::{debug, error, info, instrument};

use crate::{error::CoreError, executor::Executor, planner::plan};

/// Component F (spec §4.F): `loop { iterate(); sleep(COOLDOWN_PERIOD) }`,
/// cooperating with a [`RunLoopHandle::stop`] caller to halt gracefully
/// between ticks rather than mid-iteration.
pub struct RunLoop {
    gateway:         Arc<dyn ChainGateway>,
    store:           Arc<dyn ExchangeStore>,
    executor:        Executor,
    config:          BotConfig,
    stop_requested:  Arc<AtomicBool>,
    wake_on_stop:    Arc<Notify>
}

/// A cheaply-cloneable handle that can request graceful shutdown from
/// outside the run loop — e.g. a signal handler.
#[derive(Clone)]
pub struct RunLoopHandle {
    stop_requested: Arc<AtomicBool>,
    wake_on_stop:   Arc<Notify>
}

impl RunLoopHandle {
    /// Requests a graceful halt. Lets the current iteration finish; the
    /// run loop resolves instead of sleeping once it does (spec §5
    /// "Cancellation / timeouts").
    pub fn stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
        self.wake_on_stop.notify_waiters();
    }
}

impl RunLoop {
    pub fn new(gateway: Arc<dyn ChainGateway>, store: Arc<dyn ExchangeStore>, config: BotConfig) -> Self {
        let executor = Executor::new(gateway.clone(), store.clone(), config.clone());
        Self {
            gateway,
            store,
            executor,
            config,
            stop_requested: Arc::new(AtomicBool::new(false)),
            wake_on_stop: Arc::new(Notify::new())
        }
    }

    pub fn handle(&self) -> RunLoopHandle {
        RunLoopHandle { stop_requested: self.stop_requested.clone(), wake_on_stop: self.wake_on_stop.clone() }
    }

    /// Runs until `stop()` is called on a handle or a fatal [`CoreError`]
    /// is hit (spec §7: only storage errors are fatal — everything else
    /// aborts the current iteration and is reconciled by the next tick's
    /// recovery pass).
    pub async fn run(&self) -> Result<(), CoreError> {
        loop {
            if let Err(err) = self.iterate().await {
                if err.is_fatal() {
                    error!(error = %err, "fatal error, exiting run loop");
                    return Err(err);
                }
                error!(error = %err, "iteration aborted; next tick will recover");
            }

            if self.stop_requested.load(Ordering::SeqCst) {
                info!("graceful shutdown requested, stopping run loop");
                return Ok(());
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.cooldown_period()) => {}
                _ = self.wake_on_stop.notified() => {}
            }

            if self.stop_requested.load(Ordering::SeqCst) {
                info!("graceful shutdown requested, stopping run loop");
                return Ok(());
            }
        }
    }

    #[instrument(skip(self))]
    async fn iterate(&self) -> Result<(), CoreError> {
        let previous = self.store.get_iteration()?;
        let head = self.gateway.current_block_height().await?;

        let Some(next) = plan(previous.as_ref(), head, &self.config) else {
            debug!(head, "nothing newly confirmed; skipping this tick");
            return Ok(());
        };

        // Durable barrier: the Started marker must land before any side
        // effect of this iteration becomes externally visible (spec §5).
        self.store.set_iteration(&next)?;
        self.executor.execute(&next).await?;
        self.store.set_iteration(&next.with_state(IterationState::Completed))?;

        Ok(())
    }
}
