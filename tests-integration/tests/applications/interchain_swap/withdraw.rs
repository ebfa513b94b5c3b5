use ibc_app_interchain_swap::handler::multi_asset_withdraw;
use ibc_app_interchain_swap::query::query_order;
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::{Amount, Coin, OrderKind, OrderStatus, Timeout};
use ibc_testkit::fixtures::applications::interchain_swap::{
    channel_a, channel_b, MultiAssetWithdrawConfig, ALICE, BOB, DENOM_A, DENOM_B,
    INITIAL_BALANCE,
};
use ibc_testkit::fixtures::core::context::swap_port;
use ibc_testkit::fixtures::core::signer::account;
use ibc_testkit::relayer::PacketOutcome;
use rstest::rstest;

use super::{active_pool, asset_balance, assert_escrow_invariants, assert_pools_in_sync, pool};

#[test_log::test]
fn test_multi_asset_withdraw() {
    let (mut relayer, pool_id) = active_pool();

    let order_id = multi_asset_withdraw(
        relayer.get_ctx_a_mut(),
        MultiAssetWithdrawConfig::builder()
            .pool_id(pool_id.clone())
            .pool_token(Coin::new(pool_id.clone(), 50u64))
            .build(),
    )
    .unwrap();

    let ctx_a = relayer.get_ctx_a();
    let order = query_order(ctx_a, order_id, &pool_id).unwrap();
    assert_eq!(order.kind, OrderKind::Withdraw);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(ctx_a.balance(ALICE, &pool_id), Amount::from(50u64));
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert!(relayed[0].is_success());
    assert_eq!(
        relayed[0].ack_result().unwrap().tokens,
        vec![Coin::new(DENOM_A, 25u64), Coin::new(DENOM_B, 25u64)]
    );

    assert_eq!(
        relayer.get_ctx_a().balance(ALICE, DENOM_A),
        Amount::from(INITIAL_BALANCE - 75)
    );
    assert_eq!(
        relayer.get_ctx_b().balance(BOB, DENOM_B),
        Amount::from(INITIAL_BALANCE - 75)
    );
    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        assert_eq!(pool(ctx, &pool_id).supply.amount, Amount::from(150u64));
        assert_eq!(asset_balance(ctx, &pool_id, DENOM_A), Amount::from(75u64));
        assert_eq!(asset_balance(ctx, &pool_id, DENOM_B), Amount::from(75u64));
    }
    assert_eq!(
        query_order(relayer.get_ctx_a(), order_id, &pool_id)
            .unwrap()
            .status,
        OrderStatus::Complete
    );
    assert_eq!(
        relayer.get_ctx_a().events_of_kind("multi_asset_withdraw").len(),
        1
    );
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_multi_asset_withdraw_timeout_remints_pool_tokens() {
    let (mut relayer, pool_id) = active_pool();

    let order_id = multi_asset_withdraw(
        relayer.get_ctx_a_mut(),
        MultiAssetWithdrawConfig::builder()
            .pool_id(pool_id.clone())
            .pool_token(Coin::new(pool_id.clone(), 50u64))
            .timeout(Timeout::at_height(10))
            .build(),
    )
    .unwrap();
    relayer.advance_blocks(5);

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert_eq!(relayed[0].outcome, PacketOutcome::TimedOut);

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(ctx_a.balance(ALICE, &pool_id), Amount::from(100u64));
    assert_eq!(
        ctx_a.balance(ALICE, DENOM_A),
        Amount::from(INITIAL_BALANCE - 100)
    );
    assert_eq!(
        query_order(ctx_a, order_id, &pool_id).unwrap().status,
        OrderStatus::Expired
    );
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[rstest]
#[case::more_than_held(150, true)]
#[case::wrong_denom(50, false)]
fn test_multi_asset_withdraw_rejected(#[case] amount: u64, #[case] pool_denom: bool) {
    let (mut relayer, pool_id) = active_pool();
    let denom = if pool_denom { pool_id.clone() } else { DENOM_A.to_string() };

    let res = multi_asset_withdraw(
        relayer.get_ctx_a_mut(),
        MultiAssetWithdrawConfig::builder()
            .pool_id(pool_id.clone())
            .pool_token(Coin::new(denom, amount))
            .build(),
    );

    match res {
        Err(InterchainSwapError::InsufficientFunds { .. }) => assert!(pool_denom),
        Err(InterchainSwapError::InvalidPoolToken { .. }) => assert!(!pool_denom),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(relayer.get_ctx_a().outbound_packets().is_empty());
    assert_eq!(
        relayer.get_ctx_a().balance(ALICE, &pool_id),
        Amount::from(100u64)
    );
}

#[test]
fn test_withdraw_all_liquidity() {
    let (mut relayer, pool_id) = active_pool();

    multi_asset_withdraw(
        relayer.get_ctx_a_mut(),
        MultiAssetWithdrawConfig::builder()
            .pool_id(pool_id.clone())
            .pool_token(Coin::new(pool_id.clone(), 100u64))
            .build(),
    )
    .unwrap();
    assert!(relayer.relay_packets_a_to_b().unwrap()[0].is_success());

    multi_asset_withdraw(
        relayer.get_ctx_b_mut(),
        MultiAssetWithdrawConfig::builder()
            .pool_id(pool_id.clone())
            .pool_token(Coin::new(pool_id.clone(), 100u64))
            .receiver(account(BOB))
            .counterparty_receiver(account(ALICE))
            .build(),
    )
    .unwrap();
    assert!(relayer.relay_packets_b_to_a().unwrap()[0].is_success());

    let (ctx_a, ctx_b) = (relayer.get_ctx_a(), relayer.get_ctx_b());
    assert_eq!(ctx_a.balance(ALICE, DENOM_A), Amount::from(INITIAL_BALANCE));
    assert_eq!(ctx_b.balance(BOB, DENOM_B), Amount::from(INITIAL_BALANCE));
    assert!(ctx_a.balance(ALICE, &pool_id).is_zero());
    assert!(ctx_b.balance(BOB, &pool_id).is_zero());
    assert!(ctx_a
        .escrow_balance(&swap_port(), &channel_a(), DENOM_A)
        .is_zero());
    assert!(ctx_b
        .escrow_balance(&swap_port(), &channel_b(), DENOM_B)
        .is_zero());
    assert!(pool(ctx_a, &pool_id).supply.is_zero());
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}
