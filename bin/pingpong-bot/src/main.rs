mod cli;
mod logging;

use std::sync::Arc;

use clap::Parser;
use cli::Cli;
use pingpong_core::RunLoop;
use pingpong_gateway::{AlloyChainGateway, ChainGateway, GatewayConfig, ProviderSpec};
use pingpong_store::{ExchangeStore, SledExchangeStore};
use tracing::{error, info};

/// Process bootstrap (spec §6 "Process surface"): load configuration,
/// install logging, wire the gateway and store into the run loop, and
/// cooperate with SIGTERM/SIGINT/SIGHUP for graceful shutdown. Exit code
/// 0 on graceful shutdown, 1 on unhandled fault.
#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    let _log_guards = logging::init(&cli.data_path)?;

    info!(contract = %cli.contract_address, starting_block = cli.starting_block, "starting pingpong-bot");

    let providers = cli
        .enabled_providers()
        .into_iter()
        .map(|(name, url)| -> eyre::Result<ProviderSpec> {
            Ok(ProviderSpec { name: name.to_string(), url: url.parse()? })
        })
        .collect::<eyre::Result<Vec<_>>>()?;

    let gateway_config =
        GatewayConfig { contract_address: cli.contract_address, private_key: cli.wallet_private_key.clone(), providers };
    let bot_config = cli.bot_config();
    let gateway: Arc<dyn ChainGateway> =
        Arc::new(AlloyChainGateway::new(gateway_config, bot_config.min_rpc_spacing())?);

    let store: Arc<dyn ExchangeStore> = Arc::new(SledExchangeStore::open(cli.data_path.join("db"))?);

    let run_loop = RunLoop::new(gateway.clone(), store.clone(), bot_config);
    let stop_handle = run_loop.handle();

    let shutdown = tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        info!("shutdown signal received, finishing the current iteration");
        stop_handle.stop();
    });

    let result = run_loop.run().await;

    shutdown.abort();
    store.close()?;
    drop(gateway);

    match result {
        Ok(()) => {
            info!("pingpong-bot exiting gracefully");
            Ok(())
        }
        Err(err) => {
            error!(error = %err, "pingpong-bot exiting after a fatal error");
            Err(err.into())
        }
    }
}

#[cfg(unix)]
async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = sigterm.recv() => {}
        _ = sighup.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
