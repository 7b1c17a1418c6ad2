//! Components C–F (spec §4.C–§4.F): the iteration planner, the phase
//! executor, the stale-pong reconciler and the run loop that ties them
//! together over a [`ChainGateway`](pingpong_gateway::ChainGateway) and an
//! [`ExchangeStore`](pingpong_store::ExchangeStore).

pub mod error;
pub mod executor;
pub mod fees;
pub mod planner;
pub mod run_loop;

pub use error::CoreError;
pub use executor::Executor;
pub use planner::plan;
pub use run_loop::{RunLoop, RunLoopHandle};
