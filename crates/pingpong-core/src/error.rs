use alloy_primitives::B256;
use pingpong_gateway::GatewayError;
use pingpong_store::StoreError;
use thiserror::Error;

/// Errors that can abort an iteration (spec §7). Any variant here
/// triggers abort-before-`Completed`, which is exactly the signal the
/// planner needs on the next tick to enter recovery.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("gateway call failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
    #[error("pong log {0} refers to a transaction that could not be retrieved during recovery")]
    MissingTransaction(B256),
    #[error("fee data has not been refreshed yet")]
    FeeDataUnavailable
}

impl CoreError {
    /// Storage errors are the only fatal class (spec §7): a write failure
    /// or a closed engine can't be reconciled by the next recovery pass,
    /// so the run loop propagates these instead of continuing. Gateway
    /// errors, missing-transaction and fee-data-unavailable are all
    /// "abort this iteration, let the next tick's planner recover".
    pub fn is_fatal(&self) -> bool {
        matches!(self, CoreError::Store(_))
    }
}
