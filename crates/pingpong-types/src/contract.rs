//! Wire-format constants for the observed contract (spec §6 "Wire
//! formats"): the `Ping()`/`Pong(bytes32)` event topics and the
//! `pong(bytes32)` function selector, all derived by the `sol!` macro
//! rather than hand-computed so they can never drift from the ABI.

use alloy_sol_types::sol;

sol! {
    #[derive(Debug)]
    interface PingPong {
        event Ping();
        event Pong(bytes32 indexed pingHash);

        function pong(bytes32 pingHash) external;
    }
}

pub use PingPong::{pongCall, Ping as PingEvent, Pong as PongEvent};
