use std::path::PathBuf;

use alloy_primitives::Address;
use clap::Parser;
use pingpong_types::config::{
    is_disabled, DEFAULT_CONFIRMATION_BLOCKS, DEFAULT_COOLDOWN_PERIOD_MINUTES, DEFAULT_MAX_BLOCKS_BATCH_SIZE,
    DEFAULT_PROVIDERS_RPS, DEFAULT_STALE_PONG_TIMEOUT_MINUTES
};
use pingpong_types::BotConfig;

/// Process configuration (spec §6 "Configuration"), loaded once at start
/// via `clap`'s derive API with the `env` feature — the teacher's own CLI
/// pattern (`#[derive(Parser)]` structs with `#[arg(long, env = "...")]`).
#[derive(Parser, Debug)]
#[command(about = "Answers every Ping with exactly one Pong", version)]
pub struct Cli {
    /// The observed contract's address.
    #[arg(long, env = "CONTRACT_ADDRESS")]
    pub contract_address: Address,

    /// 0x-prefixed hex-encoded secp256k1 private key for the wallet that
    /// submits pongs.
    #[arg(long, env = "WALLET_PRIVATE_KEY")]
    pub wallet_private_key: String,

    /// First block the bot will ever consider "ours" to scan.
    #[arg(long, env = "STARTING_BLOCK")]
    pub starting_block: u64,

    /// Filesystem root for the exchange store and log files.
    #[arg(long, env = "DATA_PATH", default_value = "./data")]
    pub data_path: PathBuf,

    #[arg(long, env = "CONFIRMATION_BLOCKS", default_value_t = DEFAULT_CONFIRMATION_BLOCKS)]
    pub confirmation_blocks: u64,

    #[arg(long, env = "STALE_PONG_TIMEOUT_MINUTES", default_value_t = DEFAULT_STALE_PONG_TIMEOUT_MINUTES)]
    pub stale_pong_timeout_minutes: u64,

    #[arg(long, env = "COOLDOWN_PERIOD_MINUTES", default_value_t = DEFAULT_COOLDOWN_PERIOD_MINUTES)]
    pub cooldown_period_minutes: u64,

    #[arg(long, env = "MAX_BLOCKS_BATCH_SIZE", default_value_t = DEFAULT_MAX_BLOCKS_BATCH_SIZE)]
    pub max_blocks_batch_size: u64,

    #[arg(long, env = "PROVIDERS_RPS", default_value_t = DEFAULT_PROVIDERS_RPS)]
    pub providers_rps: u32,

    /// Up to three RPC provider endpoints. `"-"` means disabled; at least
    /// one must be enabled.
    #[arg(long, env = "PROVIDER_1_URL", default_value = "-")]
    pub provider_1_url: String,
    #[arg(long, env = "PROVIDER_2_URL", default_value = "-")]
    pub provider_2_url: String,
    #[arg(long, env = "PROVIDER_3_URL", default_value = "-")]
    pub provider_3_url: String
}

impl Cli {
    pub fn bot_config(&self) -> BotConfig {
        BotConfig {
            contract_address:           self.contract_address,
            starting_block:             self.starting_block,
            data_path:                  self.data_path.clone(),
            confirmation_blocks:        self.confirmation_blocks,
            stale_pong_timeout_minutes: self.stale_pong_timeout_minutes,
            cooldown_period_minutes:    self.cooldown_period_minutes,
            max_blocks_batch_size:      self.max_blocks_batch_size,
            providers_rps:              self.providers_rps
        }
    }

    /// `(name, url)` pairs for every enabled provider slot, in priority
    /// order. The first is the "primary" used for log scans, nonce/fee
    /// queries and the first pong of an iteration (spec §4.A).
    pub fn enabled_providers(&self) -> Vec<(&'static str, &str)> {
        [
            ("provider-1", self.provider_1_url.as_str()),
            ("provider-2", self.provider_2_url.as_str()),
            ("provider-3", self.provider_3_url.as_str()),
        ]
        .into_iter()
        .filter(|(_, url)| !is_disabled(url))
        .collect()
    }
}
