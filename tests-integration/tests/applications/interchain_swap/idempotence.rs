use ibc_app_interchain_swap::handler::{
    make_multi_asset_deposit, multi_asset_withdraw, single_asset_deposit, swap,
    take_multi_asset_deposit,
};
use ibc_app_interchain_swap_types::{Amount, Coin, OrderStatus};
use ibc_testkit::fixtures::applications::interchain_swap::{
    channel_a, channel_b, MakeMultiAssetDepositConfig, MultiAssetWithdrawConfig,
    SingleAssetDepositConfig, SwapConfig, TakeMultiAssetDepositConfig, ALICE, BOB, CAROL, DAVE,
    DENOM_A, DENOM_B, INITIAL_BALANCE,
};
use ibc_testkit::fixtures::core::channel::PacketConfig;
use ibc_testkit::fixtures::core::context::swap_port;
use ibc_testkit::relayer::utils::{decode_acknowledgement, SwapRelayerOps};

use super::{active_pool, asset_balance, assert_escrow_invariants, assert_pools_in_sync, pool};

#[test]
fn test_duplicate_acknowledgement_is_ignored() {
    let (mut relayer, pool_id) = active_pool();
    multi_asset_withdraw(
        relayer.get_ctx_a_mut(),
        MultiAssetWithdrawConfig::builder()
            .pool_id(pool_id.clone())
            .pool_token(Coin::new(pool_id.clone(), 50u64))
            .build(),
    )
    .unwrap();

    let delivered = relayer.recv_packets_a_to_b();
    assert_eq!(delivered.len(), 1);
    let (packet, ack) = &delivered[0];

    relayer.ack_packet_on_a(packet, ack).unwrap();
    let settled = relayer.get_ctx_a().balance(ALICE, DENOM_A);
    assert_eq!(settled, Amount::from(INITIAL_BALANCE - 75));

    relayer.ack_packet_on_a(packet, ack).unwrap();
    relayer.timeout_packet_on_a(packet).unwrap();

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(ctx_a.balance(ALICE, DENOM_A), settled);
    assert_eq!(ctx_a.balance(ALICE, &pool_id), Amount::from(50u64));
    assert_eq!(pool(ctx_a, &pool_id).supply.amount, Amount::from(150u64));
    assert!(ctx_a
        .logs()
        .iter()
        .any(|log| log.contains("already processed")));
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_duplicate_timeout_refunds_once() {
    let (mut relayer, pool_id) = active_pool();
    swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder().pool_id(pool_id.clone()).build(),
    )
    .unwrap();

    let timed_out = relayer.timeout_packets_on_b().unwrap();
    assert_eq!(timed_out.len(), 1);
    assert_eq!(
        relayer.get_ctx_b().balance(BOB, DENOM_B),
        Amount::from(INITIAL_BALANCE - 100)
    );

    relayer.timeout_packet_on_b(&timed_out[0]).unwrap();

    let ctx_b = relayer.get_ctx_b();
    assert_eq!(ctx_b.balance(BOB, DENOM_B), Amount::from(INITIAL_BALANCE - 100));
    assert_eq!(
        ctx_b.escrow_balance(&swap_port(), &channel_b(), DENOM_B),
        Amount::from(100u64)
    );
    assert_eq!(ctx_b.events_of_kind("timeout").len(), 1);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_undecodable_packet_gets_error_acknowledgement() {
    let (mut relayer, pool_id) = active_pool();
    let packet = PacketConfig::builder()
        .chan_id_on_a(channel_a())
        .chan_id_on_b(channel_b())
        .data(b"not json".to_vec())
        .build();

    let ack = SwapRelayerOps::recv_packet_on_b(relayer.get_ctx_b_mut(), &packet);
    let status = decode_acknowledgement(&packet, &ack).unwrap();

    assert!(!status.is_successful());
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test_log::test]
fn test_interleaved_operations_keep_chains_in_sync() {
    let (mut relayer, pool_id) = active_pool();

    let order_id = make_multi_asset_deposit(
        relayer.get_ctx_a_mut(),
        MakeMultiAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
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

    swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder().pool_id(pool_id.clone()).build(),
    )
    .unwrap();
    let shares = single_asset_deposit(
        relayer.get_ctx_a_mut(),
        SingleAssetDepositConfig::builder()
            .pool_id(pool_id.clone())
            .build(),
    )
    .unwrap();
    multi_asset_withdraw(
        relayer.get_ctx_a_mut(),
        MultiAssetWithdrawConfig::builder()
            .pool_id(pool_id.clone())
            .pool_token(Coin::new(pool_id.clone(), 20u64))
            .build(),
    )
    .unwrap();
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_all().unwrap();
    assert_eq!(relayed.len(), 4);
    assert!(relayed.iter().all(|packet| packet.is_success()));

    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        assert_eq!(
            ctx.orders.get(&pool_id, order_id).unwrap().status,
            OrderStatus::Complete
        );
        assert!(ctx.orders.iter().all(|order| order.status.is_terminal()));
        assert!(ctx.escrow.is_empty());
        assert!(!asset_balance(ctx, &pool_id, DENOM_A).is_zero());
    }
    assert_eq!(
        relayer.get_ctx_a().balance(CAROL, &pool_id),
        shares.amount.checked_add(Amount::from(10u64)).unwrap()
    );
    assert_eq!(
        relayer.get_ctx_b().balance(DAVE, &pool_id),
        Amount::from(10u64)
    );
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}
