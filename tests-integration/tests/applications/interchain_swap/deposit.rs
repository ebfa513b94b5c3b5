use ibc_app_interchain_swap::handler::{
    expire_orders, make_multi_asset_deposit, multi_asset_withdraw, single_asset_deposit,
    take_multi_asset_deposit,
};
use ibc_app_interchain_swap::query::query_order;
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::packet::InterchainMessageType;
use ibc_app_interchain_swap_types::{Amount, Coin, OrderKind, OrderStatus, Timeout};
use ibc_testkit::fixtures::applications::interchain_swap::{
    MakeMultiAssetDepositConfig, MultiAssetWithdrawConfig, SingleAssetDepositConfig,
    TakeMultiAssetDepositConfig, ALICE, CAROL, DAVE, DENOM_A, DENOM_B, INITIAL_BALANCE,
};
use ibc_testkit::fixtures::core::signer::account;
use ibc_testkit::relayer::utils::SwapRelayerOps;
use ibc_testkit::relayer::PacketOutcome;

use super::{
    active_pool, asset_balance, assert_escrow_invariants, assert_pools_in_sync, error_ack, pool,
    tampered_packet,
};

#[test_log::test]
fn test_single_asset_deposit() {
    let (mut relayer, pool_id) = active_pool();

    let shares = single_asset_deposit(
        relayer.get_ctx_a_mut(),
        SingleAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .build(),
    )
    .unwrap();
    assert_eq!(shares.denom, pool_id);
    assert!(!shares.is_zero());
    assert!(shares.amount < Amount::from(10u64));

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(ctx_a.balance(CAROL, &pool_id), shares.amount);
    assert_eq!(
        ctx_a.balance(CAROL, DENOM_A),
        Amount::from(INITIAL_BALANCE - 10)
    );
    assert_eq!(asset_balance(ctx_a, &pool_id, DENOM_A), Amount::from(110u64));
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert_eq!(
        relayed[0].msg_type(),
        InterchainMessageType::SingleAssetDeposit
    );
    assert!(relayed[0].is_success());
    assert_eq!(relayed[0].ack_result().unwrap().tokens, vec![shares.clone()]);

    let supply = Amount::from(200u64).checked_add(shares.amount).unwrap();
    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        assert_eq!(pool(ctx, &pool_id).supply.amount, supply);
    }
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_single_asset_deposit_of_remote_asset_rejected() {
    let (mut relayer, pool_id) = active_pool();

    let res = single_asset_deposit(
        relayer.get_ctx_a_mut(),
        SingleAssetDepositConfig::builder()
            .pool_id(pool_id)
            .token(Coin::new(DENOM_B, 10u64))
            .build(),
    );

    assert!(matches!(res, Err(InterchainSwapError::AssetNotLocal { .. })));
}

#[test]
fn test_single_asset_deposit_timeout_keeps_local_state() {
    let (mut relayer, pool_id) = active_pool();

    let shares = single_asset_deposit(
        relayer.get_ctx_a_mut(),
        SingleAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .timeout(Timeout::at_height(10))
            .build(),
    )
    .unwrap();
    relayer.advance_blocks(5);

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert_eq!(relayed[0].outcome, PacketOutcome::TimedOut);

    // the deposit settled on A when it was made; only the replication was lost
    let ctx_a = relayer.get_ctx_a();
    assert_eq!(ctx_a.balance(CAROL, &pool_id), shares.amount);
    assert_eq!(asset_balance(ctx_a, &pool_id, DENOM_A), Amount::from(110u64));
    assert_eq!(
        asset_balance(relayer.get_ctx_b(), &pool_id, DENOM_A),
        Amount::from(100u64)
    );
    assert_escrow_invariants(&relayer);
}

#[test_log::test]
fn test_multi_asset_deposit() {
    let (mut relayer, pool_id) = active_pool();

    let order_id = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .build(),
    )
    .unwrap();
    assert_eq!(order_id, 1);

    let order = query_order(relayer.get_ctx_a(), order_id, &pool_id).unwrap();
    assert_eq!(order.kind, OrderKind::Deposit);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.key(), format!("{pool_id}-1"));
    assert_eq!(
        relayer.get_ctx_a().balance(CAROL, DENOM_A),
        Amount::from(INITIAL_BALANCE - 10)
    );
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert!(relayed[0].is_success());
    assert_eq!(relayed[0].ack_result().unwrap().order_id, Some(order_id));
    assert_eq!(
        query_order(relayer.get_ctx_b(), order_id, &pool_id)
            .unwrap()
            .status,
        OrderStatus::Pending
    );
    assert_escrow_invariants(&relayer);

    take_multi_asset_deposit(
        relayer.get_ctx_b_mut(),
        TakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .order_id(order_id)
            .build(),
    )
    .unwrap();
    assert_eq!(
        relayer.get_ctx_b().balance(DAVE, DENOM_B),
        Amount::from(INITIAL_BALANCE - 10)
    );
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_packets_b_to_a().unwrap();
    assert!(relayed[0].is_success());

    assert_eq!(
        relayer.get_ctx_a().balance(CAROL, &pool_id),
        Amount::from(10u64)
    );
    assert_eq!(
        relayer.get_ctx_b().balance(DAVE, &pool_id),
        Amount::from(10u64)
    );
    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        let pool = pool(ctx, &pool_id);
        assert_eq!(pool.supply.amount, Amount::from(220u64));
        assert_eq!(asset_balance(ctx, &pool_id, DENOM_A), Amount::from(110u64));
        assert_eq!(asset_balance(ctx, &pool_id, DENOM_B), Amount::from(110u64));
        assert_eq!(
            query_order(ctx, order_id, &pool_id).unwrap().status,
            OrderStatus::Complete
        );
    }
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
    assert!(relayer.get_ctx_a().escrow.is_empty());
    assert!(relayer.get_ctx_b().escrow.is_empty());
}

#[test]
fn test_multi_asset_deposit_ratio_mismatch_refunds_maker() {
    let (mut relayer, pool_id) = active_pool();

    let order_id = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .destination_deposit(Coin::new(DENOM_B, 20u64))
            .build(),
    )
    .unwrap();

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert!(!relayed[0].is_success());
    assert!(relayed[0]
        .ack_error()
        .unwrap()
        .contains("deposit ratio mismatch"));

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(ctx_a.balance(CAROL, DENOM_A), Amount::from(INITIAL_BALANCE));
    assert_eq!(
        query_order(ctx_a, order_id, &pool_id).unwrap().status,
        OrderStatus::Expired
    );
    assert!(matches!(
        query_order(relayer.get_ctx_b(), order_id, &pool_id),
        Err(InterchainSwapError::OrderNotFound { .. })
    ));
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_multi_asset_deposit_expired_before_funding() {
    let (mut relayer, pool_id) = active_pool();

    let order_id = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .timeout(Timeout::at_height(20))
            .build(),
    )
    .unwrap();
    relayer.relay_packets_a_to_b().unwrap();

    take_multi_asset_deposit(
        relayer.get_ctx_b_mut(),
        TakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .order_id(order_id)
            .build(),
    )
    .unwrap();
    relayer.advance_blocks(20);

    let relayed = relayer.relay_packets_b_to_a().unwrap();
    assert!(relayed[0].ack_error().is_some());

    assert_eq!(
        relayer.get_ctx_a().balance(CAROL, DENOM_A),
        Amount::from(INITIAL_BALANCE)
    );
    assert_eq!(
        relayer.get_ctx_b().balance(DAVE, DENOM_B),
        Amount::from(INITIAL_BALANCE)
    );
    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        assert_eq!(
            query_order(ctx, order_id, &pool_id).unwrap().status,
            OrderStatus::Expired
        );
        assert!(!ctx.events_of_kind("order").is_empty());
    }
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_expire_orders_sweeps_unfunded_orders() {
    let (mut relayer, pool_id) = active_pool();

    let order_id = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .timeout(Timeout::at_height(20))
            .build(),
    )
    .unwrap();
    relayer.relay_packets_a_to_b().unwrap();

    assert!(expire_orders(relayer.get_ctx_a_mut()).unwrap().is_empty());

    relayer.advance_blocks(20);
    let expired = expire_orders(relayer.get_ctx_a_mut()).unwrap();
    assert_eq!(expired, vec![format!("{pool_id}-{order_id}")]);
    assert_eq!(
        relayer.get_ctx_a().balance(CAROL, DENOM_A),
        Amount::from(INITIAL_BALANCE)
    );
    assert!(expire_orders(relayer.get_ctx_a_mut()).unwrap().is_empty());
    assert_escrow_invariants(&relayer);

    let res = take_multi_asset_deposit(
        relayer.get_ctx_b_mut(),
        TakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .order_id(order_id)
            .build(),
    );
    assert!(matches!(res, Err(InterchainSwapError::OrderExpired { .. })));
    assert_eq!(
        query_order(relayer.get_ctx_b(), order_id, &pool_id)
            .unwrap()
            .status,
        OrderStatus::Expired
    );
    assert!(relayer.get_ctx_b().outbound_packets().is_empty());
}

#[test]
fn test_take_multi_asset_deposit_by_other_account_rejected() {
    let (mut relayer, pool_id) = active_pool();
    let order_id = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .build(),
    )
    .unwrap();
    relayer.relay_packets_a_to_b().unwrap();

    let res = take_multi_asset_deposit(
        relayer.get_ctx_b_mut(),
        TakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .order_id(order_id)
            .sender(account(ALICE))
            .build(),
    );

    assert!(matches!(res, Err(InterchainSwapError::InvalidTaker { .. })));
}

#[test]
fn test_take_multi_asset_deposit_twice_rejected() {
    let (mut relayer, pool_id) = active_pool();
    let order_id = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .build(),
    )
    .unwrap();
    relayer.relay_packets_a_to_b().unwrap();

    let msg = TakeMultiAssetDepositConfig::builder()
        .pool_id(pool_id.clone())
        .order_id(order_id)
        .build();
    take_multi_asset_deposit(relayer.get_ctx_b_mut(), msg.clone()).unwrap();
    let res = take_multi_asset_deposit(relayer.get_ctx_b_mut(), msg);

    assert!(matches!(
        res,
        Err(InterchainSwapError::InvalidOrderStatus { .. })
    ));
    assert_eq!(
        relayer.get_ctx_b().balance(DAVE, DENOM_B),
        Amount::from(INITIAL_BALANCE - 10)
    );
}

#[test_log::test]
fn test_multi_asset_deposits_made_on_both_chains() {
    let (mut relayer, pool_id) = active_pool();

    // an order only chain A records
    multi_asset_withdraw(
        relayer.get_ctx_a_mut(),
        MultiAssetWithdrawConfig::builder()
            .pool_id(pool_id.clone())
            .pool_token(Coin::new(pool_id.clone(), 10u64))
            .build(),
    )
    .unwrap();
    assert!(relayer.relay_packets_a_to_b().unwrap()[0].is_success());

    let order_on_b = make_multi_asset_deposit(
        relayer.get_ctx_b_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .build(),
    )
    .unwrap();
    let order_on_a = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .build(),
    )
    .unwrap();
    assert_eq!(order_on_b, 2);
    assert_eq!(order_on_a, 3);

    let relayed = relayer.relay_all().unwrap();
    assert_eq!(relayed.len(), 2);
    assert!(relayed.iter().all(|packet| packet.is_success()));
    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        for order_id in [order_on_a, order_on_b] {
            assert_eq!(
                query_order(ctx, order_id, &pool_id).unwrap().status,
                OrderStatus::Pending
            );
        }
    }

    take_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        TakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .order_id(order_on_b)
            .sender(account(CAROL))
            .build(),
    )
    .unwrap();
    take_multi_asset_deposit(
        relayer.get_ctx_b_mut(),
        TakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .order_id(order_on_a)
            .build(),
    )
    .unwrap();

    let relayed = relayer.relay_all().unwrap();
    assert_eq!(relayed.len(), 2);
    assert!(relayed.iter().all(|packet| packet.is_success()));

    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        for order_id in [order_on_a, order_on_b] {
            assert_eq!(
                query_order(ctx, order_id, &pool_id).unwrap().status,
                OrderStatus::Complete
            );
        }
        assert!(ctx.escrow.is_empty());
    }
    assert_eq!(
        relayer.get_ctx_a().balance(CAROL, DENOM_A),
        Amount::from(INITIAL_BALANCE - 20)
    );
    assert_eq!(
        relayer.get_ctx_b().balance(DAVE, DENOM_B),
        Amount::from(INITIAL_BALANCE - 20)
    );
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_multi_asset_deposit_with_inflated_shares_is_rejected() {
    let (mut relayer, pool_id) = active_pool();

    let order_id = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .build(),
    )
    .unwrap();

    let packet = tampered_packet(relayer.get_ctx_a(), |state_change| {
        let shares = &mut state_change.pool_tokens[0];
        shares.amount = shares.amount.checked_add(Amount::from(1u64)).unwrap();
    });
    let ack = SwapRelayerOps::recv_packet_on_b(relayer.get_ctx_b_mut(), &packet);
    assert!(error_ack(&packet, &ack).contains("pool token mismatch"));
    assert!(matches!(
        query_order(relayer.get_ctx_b(), order_id, &pool_id),
        Err(InterchainSwapError::OrderNotFound { .. })
    ));

    relayer.ack_packet_on_a(&packet, &ack).unwrap();
    assert_eq!(
        relayer.get_ctx_a().balance(CAROL, DENOM_A),
        Amount::from(INITIAL_BALANCE)
    );
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}
