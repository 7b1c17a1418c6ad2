#[path = "support/mod.rs"]
mod support;

use std::sync::Arc;

use alloy_primitives::{address, b256, B256};
use pingpong_core::Executor;
use pingpong_gateway::{FeeData, MempoolHit, MempoolPong, PingLog, PongLog};
use pingpong_store::{ExchangeStore, SledExchangeStore};
use pingpong_types::{BotConfig, Exchange, Iteration, IterationState};
use support::{tx, MockGateway};

const WALLET: alloy_primitives::Address = address!("1111111111111111111111111111111111111111");
const OTHER: alloy_primitives::Address = address!("2222222222222222222222222222222222222222");
const H1: B256 = b256!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
const H2: B256 = b256!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");

fn config() -> BotConfig {
    BotConfig {
        contract_address:           Default::default(),
        starting_block:             1,
        data_path:                  "/tmp/pingpong-core-tests".into(),
        confirmation_blocks:        20,
        stale_pong_timeout_minutes: 15,
        cooldown_period_minutes:    2,
        max_blocks_batch_size:      1000,
        providers_rps:              3
    }
}

fn harness() -> (Arc<MockGateway>, Arc<SledExchangeStore>, Executor, tempfile::TempDir) {
    let gateway = Arc::new(MockGateway::new(WALLET));
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SledExchangeStore::open(dir.path().join("db")).unwrap());
    let executor = Executor::new(gateway.clone(), store.clone(), config());
    (gateway, store, executor, dir)
}

#[tokio::test]
async fn process_pings_is_idempotent() {
    let (gateway, store, executor, _dir) = harness();
    gateway.push_ping(PingLog { tx_hash: H1, block_number: 5 });

    let iteration = Iteration::Normal { state: IterationState::Started, from_block: 1, to_block: 10 };
    executor.execute(&iteration).await.unwrap();
    let after_first = store.get_exchange(H1).unwrap().unwrap();

    executor.execute(&iteration).await.unwrap();
    let after_second = store.get_exchange(H1).unwrap().unwrap();

    assert_eq!(after_first, after_second);
    assert!(matches!(after_first, Exchange::Detected { .. }));
}

#[tokio::test]
async fn normal_pong_completes_matching_exchange() {
    let (gateway, store, executor, _dir) = harness();
    store
        .put_pong_issued(pingpong_store::PongIssuedFields {
            ping_hash:      H1,
            ping_block:     5,
            pong_hash:      H2,
            pong_nonce:     0,
            pong_timestamp: Some(0)
        })
        .unwrap();
    gateway.push_pong(PongLog { tx_hash: H2, block_number: 30, ping_hash: H1 });

    let iteration = Iteration::Normal { state: IterationState::Started, from_block: 1, to_block: 40 };
    executor.execute(&iteration).await.unwrap();

    let exchange = store.get_exchange(H1).unwrap().unwrap();
    assert!(matches!(exchange, Exchange::Completed { pong_block: 30, .. }));
}

#[tokio::test]
async fn sibling_bots_pong_is_ignored() {
    let (gateway, store, executor, _dir) = harness();
    let sibling_pong = b256!("cccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc");
    store
        .put_pong_issued(pingpong_store::PongIssuedFields {
            ping_hash:      H1,
            ping_block:     5,
            pong_hash:      H2,
            pong_nonce:     0,
            pong_timestamp: Some(0)
        })
        .unwrap();
    gateway.push_pong(PongLog { tx_hash: sibling_pong, block_number: 30, ping_hash: H1 });

    let iteration = Iteration::Normal { state: IterationState::Started, from_block: 1, to_block: 40 };
    executor.execute(&iteration).await.unwrap();

    let exchange = store.get_exchange(H1).unwrap().unwrap();
    assert!(matches!(exchange, Exchange::PongIssued { pong_hash, .. } if pong_hash == H2));
}

#[tokio::test]
async fn recovery_pongs_trust_sender_identity() {
    let (gateway, store, executor, _dir) = harness();
    gateway.push_pong(PongLog { tx_hash: H2, block_number: 30, ping_hash: H1 });
    gateway.set_transaction(tx(H2, WALLET, 7, 100, 10, Some(30)));

    let iteration =
        Iteration::Recovery { state: IterationState::Started, from_block: 1, to_block: 40, recovery_until_block: 40 };
    executor.execute(&iteration).await.unwrap();

    let exchange = store.get_exchange(H1).unwrap().unwrap();
    assert!(matches!(exchange, Exchange::Completed { pong_nonce: 7, pong_block: 30, .. }));
}

#[tokio::test]
async fn recovery_ignores_other_wallets_pong() {
    let (gateway, store, executor, _dir) = harness();
    gateway.push_pong(PongLog { tx_hash: H2, block_number: 30, ping_hash: H1 });
    gateway.set_transaction(tx(H2, OTHER, 7, 100, 10, Some(30)));

    let iteration =
        Iteration::Recovery { state: IterationState::Started, from_block: 1, to_block: 40, recovery_until_block: 40 };
    executor.execute(&iteration).await.unwrap();

    assert!(store.get_exchange(H1).unwrap().is_none());
}

#[tokio::test]
async fn recovery_aborts_when_transaction_missing() {
    let (gateway, _store, executor, _dir) = harness();
    gateway.push_pong(PongLog { tx_hash: H2, block_number: 30, ping_hash: H1 });

    let iteration =
        Iteration::Recovery { state: IterationState::Started, from_block: 1, to_block: 40, recovery_until_block: 40 };
    let result = executor.execute(&iteration).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn answer_pending_pings_assigns_consecutive_nonces() {
    let (gateway, store, executor, _dir) = harness();
    store.put_ping_detected(H1, 1).unwrap();
    store.put_ping_detected(H2, 2).unwrap();
    gateway.set_next_nonce(50);

    let iteration = Iteration::RecoveryEnd { state: IterationState::Started, to_block: 10 };
    executor.execute(&iteration).await.unwrap();

    let submitted = gateway.submitted.lock().unwrap();
    let mut nonces: Vec<u64> = submitted.iter().map(|(_, nonce, _)| *nonce).collect();
    nonces.sort_unstable();
    assert_eq!(nonces, vec![50, 51]);

    for hash in [H1, H2] {
        assert!(matches!(store.get_exchange(hash).unwrap(), Some(Exchange::PongIssued { .. })));
    }
}

#[tokio::test]
async fn cleanup_removes_completed_in_normal_iteration() {
    let (_gateway, store, executor, _dir) = harness();
    store
        .put_completed_exchange(pingpong_store::CompletedFields {
            ping_hash:      H1,
            ping_block:     Some(1),
            pong_hash:      H2,
            pong_block:     5,
            pong_nonce:     0,
            pong_timestamp: Some(0)
        })
        .unwrap();

    let iteration = Iteration::Normal { state: IterationState::Started, from_block: 100, to_block: 110 };
    executor.execute(&iteration).await.unwrap();

    assert!(store.get_exchange(H1).unwrap().is_none());
}

#[tokio::test]
async fn recovery_start_only_scans_mempool() {
    let (gateway, store, executor, _dir) = harness();
    gateway.set_mempool_pongs(vec![MempoolPong { ping_hash: H1, ping_block: 0, pong_hash: H2, pong_nonce: 3 }]);

    let iteration = Iteration::RecoveryStart { state: IterationState::Started, to_block: 0 };
    executor.execute(&iteration).await.unwrap();

    assert!(matches!(store.get_exchange(H1).unwrap(), Some(Exchange::PongIssued { pong_nonce: 3, .. })));
}

#[tokio::test]
async fn stale_pong_is_reissued_when_dropped_from_mempool() {
    let (gateway, store, executor, _dir) = harness();
    gateway.set_fee_data(FeeData { max_fee: 10, priority_fee: 2 });
    gateway.set_next_nonce(9);
    store
        .put_pong_issued(pingpong_store::PongIssuedFields {
            ping_hash:      H1,
            ping_block:     1,
            pong_hash:      H2,
            pong_nonce:     0,
            pong_timestamp: Some(0)
        })
        .unwrap();

    let mut cfg = config();
    cfg.stale_pong_timeout_minutes = 0;
    let executor = Executor::new(gateway.clone(), store.clone(), cfg);

    let iteration = Iteration::Normal { state: IterationState::Started, from_block: 100, to_block: 110 };
    executor.execute(&iteration).await.unwrap();

    let submitted = gateway.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].1, 9);

    let exchange = store.get_exchange(H1).unwrap().unwrap();
    assert!(matches!(exchange, Exchange::PongIssued { pong_hash, .. } if pong_hash != H2));
}

#[tokio::test]
async fn stale_pong_mined_is_left_alone() {
    let (gateway, store, _executor, _dir) = harness();
    gateway.set_fee_data(FeeData { max_fee: 10, priority_fee: 2 });
    gateway.set_mempool_hit(H2, MempoolHit { provider_name: "primary".into(), tx: tx(H2, WALLET, 0, 10, 2, Some(99)) });
    store
        .put_pong_issued(pingpong_store::PongIssuedFields {
            ping_hash:      H1,
            ping_block:     1,
            pong_hash:      H2,
            pong_nonce:     0,
            pong_timestamp: Some(0)
        })
        .unwrap();

    let mut cfg = config();
    cfg.stale_pong_timeout_minutes = 0;
    let executor = Executor::new(gateway.clone(), store.clone(), cfg);

    let iteration = Iteration::Normal { state: IterationState::Started, from_block: 100, to_block: 110 };
    executor.execute(&iteration).await.unwrap();

    assert!(gateway.submitted.lock().unwrap().is_empty());
    let exchange = store.get_exchange(H1).unwrap().unwrap();
    assert!(matches!(exchange, Exchange::PongIssued { pong_hash, .. } if pong_hash == H2));
}

#[tokio::test]
async fn stale_pong_unmined_gets_fee_bump() {
    let (gateway, store, _executor, _dir) = harness();
    gateway.set_fee_data(FeeData { max_fee: 12, priority_fee: 6 });
    gateway.set_mempool_hit(H2, MempoolHit { provider_name: "primary".into(), tx: tx(H2, WALLET, 0, 11, 3, None) });
    store
        .put_pong_issued(pingpong_store::PongIssuedFields {
            ping_hash:      H1,
            ping_block:     1,
            pong_hash:      H2,
            pong_nonce:     0,
            pong_timestamp: Some(0)
        })
        .unwrap();

    let mut cfg = config();
    cfg.stale_pong_timeout_minutes = 0;
    let executor = Executor::new(gateway.clone(), store.clone(), cfg);

    let iteration = Iteration::Normal { state: IterationState::Started, from_block: 100, to_block: 110 };
    executor.execute(&iteration).await.unwrap();

    let bumped = gateway.bumped.lock().unwrap();
    assert_eq!(bumped.len(), 1);
    assert_eq!(bumped[0].1, FeeData { max_fee: 13, priority_fee: 6 });
    assert_eq!(bumped[0].2, "primary");
}
