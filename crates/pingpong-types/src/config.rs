use std::path::PathBuf;

use alloy_primitives::Address;

/// Runtime configuration shared by the gateway, store and core crates.
/// Loaded once at process start by `bin/pingpong-bot` (spec §6
/// "Configuration") and threaded through by value/reference from there.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// The observed contract's address.
    pub contract_address: Address,
    /// First block the bot will ever consider "ours" to scan.
    pub starting_block: u64,
    /// Filesystem root for the store and logs.
    pub data_path: PathBuf,
    /// Blocks behind head at which logs are treated as final.
    pub confirmation_blocks: u64,
    /// Minutes after which an unconfirmed `PongIssued` is considered stale.
    pub stale_pong_timeout_minutes: u64,
    /// Sleep between iterations.
    pub cooldown_period_minutes: u64,
    /// Upper bound on blocks scanned per iteration.
    pub max_blocks_batch_size: u64,
    /// Token-bucket budget shared by all configured RPC providers.
    pub providers_rps: u32
}

impl BotConfig {
    pub fn stale_pong_timeout_secs(&self) -> u64 {
        self.stale_pong_timeout_minutes * 60
    }

    pub fn cooldown_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.cooldown_period_minutes * 60)
    }

    pub fn min_rpc_spacing(&self) -> std::time::Duration {
        std::time::Duration::from_millis(1000 / self.providers_rps.max(1) as u64)
    }
}

pub const DEFAULT_CONFIRMATION_BLOCKS: u64 = 20;
pub const DEFAULT_STALE_PONG_TIMEOUT_MINUTES: u64 = 15;
pub const DEFAULT_COOLDOWN_PERIOD_MINUTES: u64 = 2;
pub const DEFAULT_MAX_BLOCKS_BATCH_SIZE: u64 = 1000;
pub const DEFAULT_PROVIDERS_RPS: u32 = 3;

/// Sentinel meaning "disabled" for optional provider API key configuration.
pub const DISABLED_SENTINEL: &str = "-";

pub fn is_disabled(value: &str) -> bool {
    value == DISABLED_SENTINEL
}
