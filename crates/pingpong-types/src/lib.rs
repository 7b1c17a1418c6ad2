//! Shared data model for the ping/pong responder: the `Exchange` and
//! `Iteration` state machines (spec §3), the contract wire constants
//! (spec §6), and the runtime configuration shared across crates.

pub mod config;
pub mod contract;
pub mod exchange;
pub mod iteration;

pub use config::BotConfig;
pub use exchange::Exchange;
pub use iteration::{Iteration, IterationState};
