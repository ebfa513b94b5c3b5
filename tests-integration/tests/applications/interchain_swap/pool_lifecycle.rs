use core::mem::discriminant;

use ibc_app_interchain_swap::handler::{make_pool, take_pool};
use ibc_app_interchain_swap::module::{on_chan_close_confirm_validate, on_chan_close_init_validate};
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::msgs::MsgMakePool;
use ibc_app_interchain_swap_types::{
    Amount, Coin, Decimal, PoolAsset, PoolSide, PoolStatus, Timeout,
};
use ibc_testkit::fixtures::applications::interchain_swap::{
    channel_a, channel_b, dummy_liquidity, MakePoolConfig, TakePoolConfig, ALICE, BOB, CHAIN_B,
    DAVE, DENOM_A, DENOM_B, INITIAL_BALANCE,
};
use ibc_testkit::fixtures::core::context::swap_port;
use ibc_testkit::fixtures::core::signer::account;
use ibc_testkit::relayer::utils::SwapRelayerOps;
use ibc_testkit::relayer::PacketOutcome;
use rstest::rstest;

use super::{
    activate_pool, assert_escrow_invariants, assert_pools_in_sync, connected_chains, error_ack,
    pool, tampered_packet,
};

#[test_log::test]
fn test_make_and_take_pool() {
    let mut relayer = connected_chains();

    let pool_id = make_pool(relayer.get_ctx_a_mut(), MakePoolConfig::builder().build()).unwrap();

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(pool(ctx_a, &pool_id).status, PoolStatus::Created);
    assert_eq!(
        ctx_a.balance(ALICE, DENOM_A),
        Amount::from(INITIAL_BALANCE - 100)
    );
    assert_eq!(
        ctx_a.escrow_balance(&swap_port(), &channel_a(), DENOM_A),
        Amount::from(100u64)
    );
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert_eq!(relayed.len(), 1);
    assert!(relayed[0].is_success());
    assert_eq!(
        relayed[0].ack_result().unwrap().pool_id.as_deref(),
        Some(pool_id.as_str())
    );

    let pool_on_b = pool(relayer.get_ctx_b(), &pool_id);
    assert_eq!(pool_on_b.status, PoolStatus::Created);
    assert_eq!(pool_on_b.endpoint.channel_id, channel_b());
    assert_eq!(pool_on_b.endpoint.counterparty_channel_id, channel_a());

    take_pool(
        relayer.get_ctx_b_mut(),
        TakePoolConfig::builder().pool_id(pool_id.clone()).build(),
    )
    .unwrap();
    assert_eq!(
        relayer.get_ctx_b().balance(BOB, DENOM_B),
        Amount::from(INITIAL_BALANCE - 100)
    );
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_packets_b_to_a().unwrap();
    assert_eq!(relayed.len(), 1);
    assert_eq!(
        relayed[0].ack_result().unwrap().tokens,
        vec![Coin::new(pool_id.clone(), 100u64)]
    );

    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        let pool = pool(ctx, &pool_id);
        assert_eq!(pool.status, PoolStatus::Active);
        assert_eq!(pool.supply, Coin::new(pool_id.clone(), 200u64));
        assert!(!ctx.events_of_kind("pool_status").is_empty());
    }
    assert_eq!(
        relayer.get_ctx_a().balance(ALICE, &pool_id),
        Amount::from(100u64)
    );
    assert_eq!(
        relayer.get_ctx_b().balance(BOB, &pool_id),
        Amount::from(100u64)
    );

    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
    assert!(relayer.get_ctx_a().escrow.is_empty());
    assert!(relayer.get_ctx_b().escrow.is_empty());
}

#[test]
fn test_weighted_pool_splits_initial_supply() {
    let mut relayer = connected_chains();
    let liquidity = vec![
        PoolAsset::new(
            PoolSide::Source,
            Coin::new(DENOM_A, 100u64),
            Decimal::percent(80),
            6,
        ),
        PoolAsset::new(
            PoolSide::Destination,
            Coin::new(DENOM_B, 100u64),
            Decimal::percent(20),
            6,
        ),
    ];

    let pool_id = activate_pool(
        &mut relayer,
        MakePoolConfig::builder().liquidity(liquidity).build(),
    );

    assert_eq!(
        relayer.get_ctx_a().balance(ALICE, &pool_id),
        Amount::from(160u64)
    );
    assert_eq!(
        relayer.get_ctx_b().balance(BOB, &pool_id),
        Amount::from(40u64)
    );
    assert_pools_in_sync(&relayer, &pool_id);
}

#[test]
fn test_make_pool_rejected_by_counterparty_refunds_creator() {
    let mut relayer = connected_chains();

    let pool_id = make_pool(
        relayer.get_ctx_a_mut(),
        MakePoolConfig::builder()
            .destination_chain_id("chain-c")
            .build(),
    )
    .unwrap();

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert!(!relayed[0].is_success());
    assert!(relayed[0].ack_error().is_some());

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(pool(ctx_a, &pool_id).status, PoolStatus::Failed);
    assert_eq!(ctx_a.balance(ALICE, DENOM_A), Amount::from(INITIAL_BALANCE));
    assert!(relayer.get_ctx_b().pools.get(&pool_id).is_err());
    assert_escrow_invariants(&relayer);

    // a failed pool can be made again
    let remade = make_pool(relayer.get_ctx_a_mut(), MakePoolConfig::builder().build()).unwrap();
    assert_eq!(remade, pool_id);
    assert!(relayer.relay_packets_a_to_b().unwrap()[0].is_success());
    assert_eq!(
        pool(relayer.get_ctx_a(), &pool_id).status,
        PoolStatus::Created
    );
    assert_eq!(
        pool(relayer.get_ctx_b(), &pool_id).status,
        PoolStatus::Created
    );
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_make_pool_timeout_marks_pool_failed() {
    let mut relayer = connected_chains();

    let pool_id = make_pool(
        relayer.get_ctx_a_mut(),
        MakePoolConfig::builder()
            .timeout(Timeout::at_height(10))
            .build(),
    )
    .unwrap();

    relayer.advance_blocks(5);
    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert_eq!(relayed[0].outcome, PacketOutcome::TimedOut);

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(pool(ctx_a, &pool_id).status, PoolStatus::Failed);
    assert_eq!(ctx_a.balance(ALICE, DENOM_A), Amount::from(INITIAL_BALANCE));
    assert!(!ctx_a.events_of_kind("timeout").is_empty());
    assert!(relayer.get_ctx_b().pools.get(&pool_id).is_err());
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_take_pool_timeout_refunds_taker() {
    let mut relayer = connected_chains();
    let pool_id = make_pool(relayer.get_ctx_a_mut(), MakePoolConfig::builder().build()).unwrap();
    relayer.relay_packets_a_to_b().unwrap();

    take_pool(
        relayer.get_ctx_b_mut(),
        TakePoolConfig::builder()
            .pool_id(pool_id.clone())
            .timeout(Timeout::at_height(10))
            .build(),
    )
    .unwrap();
    relayer.advance_blocks(5);
    let relayed = relayer.relay_packets_b_to_a().unwrap();
    assert_eq!(relayed[0].outcome, PacketOutcome::TimedOut);

    assert_eq!(
        relayer.get_ctx_b().balance(BOB, DENOM_B),
        Amount::from(INITIAL_BALANCE)
    );
    assert_eq!(
        pool(relayer.get_ctx_a(), &pool_id).status,
        PoolStatus::Created
    );
    assert_eq!(
        pool(relayer.get_ctx_b(), &pool_id).status,
        PoolStatus::Created
    );
    assert_escrow_invariants(&relayer);

    // the taker may try again
    take_pool(
        relayer.get_ctx_b_mut(),
        TakePoolConfig::builder().pool_id(pool_id.clone()).build(),
    )
    .unwrap();
    assert!(relayer.relay_packets_b_to_a().unwrap()[0].is_success());
    assert_pools_in_sync(&relayer, &pool_id);
    assert_eq!(
        pool(relayer.get_ctx_a(), &pool_id).status,
        PoolStatus::Active
    );
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_take_pool_by_other_account_rejected() {
    let mut relayer = connected_chains();
    let pool_id = make_pool(relayer.get_ctx_a_mut(), MakePoolConfig::builder().build()).unwrap();
    relayer.relay_packets_a_to_b().unwrap();

    let res = take_pool(
        relayer.get_ctx_b_mut(),
        TakePoolConfig::builder()
            .pool_id(pool_id.clone())
            .creator(account(DAVE))
            .build(),
    );

    assert!(matches!(res, Err(InterchainSwapError::InvalidTaker { .. })));
    assert!(relayer.get_ctx_b().take_outbound_packets().is_empty());
}

#[test]
fn test_take_active_pool_rejected() {
    let mut relayer = connected_chains();
    let pool_id = activate_pool(&mut relayer, MakePoolConfig::builder().build());

    let res = take_pool(
        relayer.get_ctx_b_mut(),
        TakePoolConfig::builder().pool_id(pool_id).build(),
    );

    assert!(matches!(
        res,
        Err(InterchainSwapError::PoolAlreadyActive { .. })
    ));
}

#[test]
fn test_make_existing_pool_rejected() {
    let mut relayer = connected_chains();
    make_pool(relayer.get_ctx_a_mut(), MakePoolConfig::builder().build()).unwrap();

    let res = make_pool(relayer.get_ctx_a_mut(), MakePoolConfig::builder().build());

    assert!(matches!(
        res,
        Err(InterchainSwapError::PoolAlreadyExists { .. })
    ));
}

#[rstest]
#[case::fee_above_maximum(
    MakePoolConfig::builder().swap_fee(Decimal::percent(20)).build(),
    InterchainSwapError::InvalidSwapFee { fee: String::new(), max: String::new() },
)]
#[case::foreign_source_chain(
    MakePoolConfig::builder().source_chain_id(CHAIN_B).build(),
    InterchainSwapError::InvalidChainId { chain_id: String::new(), expected: String::new() },
)]
#[case::single_asset(
    MakePoolConfig::builder().liquidity(dummy_liquidity(100, 100)[..1].to_vec()).build(),
    InterchainSwapError::InvalidLiquidityComposition { reason: String::new() },
)]
#[case::missing_timeout(
    MakePoolConfig::builder().timeout(Timeout::default()).build(),
    InterchainSwapError::MissingTimeout,
)]
#[case::creator_lacks_funds(
    MakePoolConfig::builder().liquidity(dummy_liquidity(2 * INITIAL_BALANCE, 100)).build(),
    InterchainSwapError::InsufficientFunds { requested: String::new(), available: String::new() },
)]
fn test_make_pool_validation(#[case] msg: MsgMakePool, #[case] expected: InterchainSwapError) {
    let mut relayer = connected_chains();

    let err = make_pool(relayer.get_ctx_a_mut(), msg).unwrap_err();

    assert_eq!(discriminant(&err), discriminant(&expected), "got {err}");
    let ctx_a = relayer.get_ctx_a();
    assert!(ctx_a.pools.is_empty());
    assert!(ctx_a.outbound_packets().is_empty());
    assert_eq!(ctx_a.balance(ALICE, DENOM_A), Amount::from(INITIAL_BALANCE));
}

#[test]
fn test_channel_cannot_be_closed() {
    let relayer = connected_chains();

    let res = on_chan_close_init_validate(relayer.get_ctx_a(), &swap_port(), &channel_a());
    assert!(matches!(res, Err(InterchainSwapError::CantCloseChannel)));

    let res = on_chan_close_confirm_validate(relayer.get_ctx_b(), &swap_port(), &channel_b());
    assert!(matches!(res, Err(InterchainSwapError::CantCloseChannel)));
}

#[test]
fn test_take_pool_packet_for_another_pool_is_rejected() {
    let mut relayer = connected_chains();
    let pool_id = make_pool(relayer.get_ctx_a_mut(), MakePoolConfig::builder().build()).unwrap();
    relayer.relay_packets_a_to_b().unwrap();
    take_pool(
        relayer.get_ctx_b_mut(),
        TakePoolConfig::builder().pool_id(pool_id.clone()).build(),
    )
    .unwrap();

    let packet = tampered_packet(relayer.get_ctx_b(), |state_change| {
        state_change.pool_id = Some("pool-unrelated".to_string());
    });
    let ack = SwapRelayerOps::recv_packet_on_b(relayer.get_ctx_a_mut(), &packet);
    assert!(error_ack(&packet, &ack).contains("pool id mismatch"));

    let ctx_a = relayer.get_ctx_a();
    assert_eq!(pool(ctx_a, &pool_id).status, PoolStatus::Created);
    assert_eq!(ctx_a.balance(ALICE, &pool_id), Amount::zero());

    relayer.ack_packet_on_b(&packet, &ack).unwrap();
    assert_eq!(
        relayer.get_ctx_b().balance(BOB, DENOM_B),
        Amount::from(INITIAL_BALANCE)
    );
    assert_escrow_invariants(&relayer);
}
