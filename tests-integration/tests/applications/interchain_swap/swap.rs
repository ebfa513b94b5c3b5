use ibc_app_interchain_swap::handler::swap;
use ibc_app_interchain_swap::query::{query_left_swap, query_right_swap};
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::msgs::SwapType;
use ibc_app_interchain_swap_types::packet::InterchainMessageType;
use ibc_app_interchain_swap_types::{Amount, Coin, Decimal, PoolAsset, PoolSide, Timeout};
use ibc_testkit::fixtures::applications::interchain_swap::{
    channel_b, MakePoolConfig, SwapConfig, ALICE, BOB, DENOM_A, DENOM_B, INITIAL_BALANCE,
};
use ibc_testkit::fixtures::core::context::swap_port;
use ibc_testkit::fixtures::core::signer::account;
use ibc_testkit::relayer::PacketOutcome;
use rstest::rstest;

use super::{
    activate_pool, active_pool, asset_balance, assert_escrow_invariants, assert_pools_in_sync,
    connected_chains,
};

const DENOM_C: &str = "ujuno";

#[test_log::test]
fn test_left_swap_settled_by_counterparty() {
    let (mut relayer, pool_id) = active_pool();

    let quote = swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder().pool_id(pool_id.clone()).build(),
    )
    .unwrap();
    assert_eq!(quote.token_in, Coin::new(DENOM_B, 10u64));
    assert_eq!(quote.token_out, Coin::new(DENOM_A, 9u64));

    // the output is custodied on A, so B waits for the acknowledgement
    let ctx_b = relayer.get_ctx_b();
    assert_eq!(
        ctx_b.balance(BOB, DENOM_B),
        Amount::from(INITIAL_BALANCE - 110)
    );
    assert_eq!(asset_balance(ctx_b, &pool_id, DENOM_B), Amount::from(100u64));
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_packets_b_to_a().unwrap();
    assert_eq!(relayed.len(), 1);
    assert_eq!(relayed[0].msg_type(), InterchainMessageType::LeftSwap);
    assert!(relayed[0].is_success());

    assert_eq!(
        relayer.get_ctx_a().balance(ALICE, DENOM_A),
        Amount::from(INITIAL_BALANCE - 100 + 9)
    );
    for ctx in [relayer.get_ctx_a(), relayer.get_ctx_b()] {
        assert_eq!(asset_balance(ctx, &pool_id, DENOM_A), Amount::from(91u64));
        assert_eq!(asset_balance(ctx, &pool_id, DENOM_B), Amount::from(110u64));
    }
    assert_eq!(relayer.get_ctx_b().events_of_kind("swap").len(), 1);
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_right_swap_matches_quote() {
    let (mut relayer, pool_id) = active_pool();

    let expected_in =
        query_right_swap(relayer.get_ctx_b(), &pool_id, DENOM_B, &Coin::new(DENOM_A, 9u64))
            .unwrap();
    assert_eq!(expected_in, Coin::new(DENOM_B, 10u64));

    let quote = swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder()
            .pool_id(pool_id.clone())
            .swap_type(SwapType::Right)
            .token_out(Coin::new(DENOM_A, 9u64))
            .build(),
    )
    .unwrap();
    assert_eq!(quote.token_in, expected_in);

    let relayed = relayer.relay_packets_b_to_a().unwrap();
    assert_eq!(relayed[0].msg_type(), InterchainMessageType::RightSwap);
    assert!(relayed[0].is_success());

    assert_eq!(
        relayer.get_ctx_a().balance(ALICE, DENOM_A),
        Amount::from(INITIAL_BALANCE - 100 + 9)
    );
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_swap_settled_on_sender_chain() {
    let mut relayer = connected_chains();
    relayer
        .get_ctx_a_mut()
        .fund(ALICE, Coin::new(DENOM_C, INITIAL_BALANCE));
    let liquidity = vec![
        PoolAsset::new(
            PoolSide::Source,
            Coin::new(DENOM_A, 100u64),
            Decimal::percent(50),
            6,
        ),
        PoolAsset::new(
            PoolSide::Source,
            Coin::new(DENOM_C, 100u64),
            Decimal::percent(25),
            6,
        ),
        PoolAsset::new(
            PoolSide::Destination,
            Coin::new(DENOM_B, 100u64),
            Decimal::percent(25),
            6,
        ),
    ];
    let pool_id = activate_pool(
        &mut relayer,
        MakePoolConfig::builder().liquidity(liquidity).build(),
    );
    assert_eq!(
        relayer.get_ctx_a().balance(ALICE, &pool_id),
        Amount::from(225u64)
    );
    assert_eq!(
        relayer.get_ctx_b().balance(BOB, &pool_id),
        Amount::from(75u64)
    );

    let token_in = Coin::new(DENOM_C, 10u64);
    let expected_out = query_left_swap(relayer.get_ctx_a(), &pool_id, &token_in, DENOM_A).unwrap();

    let quote = swap(
        relayer.get_ctx_a_mut(),
        SwapConfig::builder()
            .pool_id(pool_id.clone())
            .sender(account(ALICE))
            .token_in(token_in.clone())
            .token_out(Coin::new(DENOM_A, 1u64))
            .recipient(account(ALICE))
            .build(),
    )
    .unwrap();
    assert_eq!(quote.token_out, expected_out);

    // settled before the packet is relayed
    let ctx_a = relayer.get_ctx_a();
    assert_eq!(
        ctx_a.balance(ALICE, DENOM_A),
        Amount::from(INITIAL_BALANCE - 100)
            .checked_add(expected_out.amount)
            .unwrap()
    );
    assert_eq!(
        ctx_a.balance(ALICE, DENOM_C),
        Amount::from(INITIAL_BALANCE - 110)
    );
    assert_escrow_invariants(&relayer);

    let relayed = relayer.relay_packets_a_to_b().unwrap();
    assert!(relayed[0].is_success());
    assert_eq!(
        asset_balance(relayer.get_ctx_b(), &pool_id, DENOM_C),
        Amount::from(110u64)
    );
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[test]
fn test_swap_timeout_refunds_sender() {
    let (mut relayer, pool_id) = active_pool();

    swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder()
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
        Amount::from(INITIAL_BALANCE - 100)
    );
    assert_eq!(
        relayer.get_ctx_a().balance(ALICE, DENOM_A),
        Amount::from(INITIAL_BALANCE - 100)
    );
    assert_eq!(
        asset_balance(relayer.get_ctx_b(), &pool_id, DENOM_B),
        Amount::from(100u64)
    );
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
    assert!(relayer.get_ctx_b().escrow.is_empty());
}

#[rstest]
#[case::output_below_bound(Coin::new(DENOM_A, 20u64), 100)]
#[case::no_tolerance(Coin::new(DENOM_A, 10u64), 0)]
fn test_swap_slippage_exceeded(#[case] token_out: Coin, #[case] slippage: u64) {
    let (mut relayer, pool_id) = active_pool();

    let res = swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder()
            .pool_id(pool_id)
            .token_out(token_out)
            .slippage(slippage)
            .build(),
    );

    assert!(matches!(
        res,
        Err(InterchainSwapError::SlippageExceeded { .. })
    ));
    let ctx_b = relayer.get_ctx_b();
    assert!(ctx_b.outbound_packets().is_empty());
    assert_eq!(
        ctx_b.balance(BOB, DENOM_B),
        Amount::from(INITIAL_BALANCE - 100)
    );
}

#[test]
fn test_swap_quote_stale_after_price_moves() {
    let (mut relayer, pool_id) = active_pool();
    let token_in = Coin::new(DENOM_B, 10u64);

    let quote = query_left_swap(relayer.get_ctx_b(), &pool_id, &token_in, DENOM_A).unwrap();
    assert_eq!(quote, Coin::new(DENOM_A, 9u64));

    // another trader sells the same asset first
    swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder().pool_id(pool_id.clone()).build(),
    )
    .unwrap();
    let relayed = relayer.relay_packets_b_to_a().unwrap();
    assert!(relayed[0].is_success());
    assert_pools_in_sync(&relayer, &pool_id);

    let moved = query_left_swap(relayer.get_ctx_b(), &pool_id, &token_in, DENOM_A).unwrap();
    assert!(moved.amount < quote.amount);

    let balance_before = relayer.get_ctx_b().balance(BOB, DENOM_B);
    let res = swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder()
            .pool_id(pool_id.clone())
            .token_in(token_in)
            .token_out(quote)
            .slippage(0)
            .build(),
    );

    assert!(matches!(
        res,
        Err(InterchainSwapError::SlippageExceeded { .. })
    ));
    let ctx_b = relayer.get_ctx_b();
    assert!(ctx_b.outbound_packets().is_empty());
    assert_eq!(ctx_b.balance(BOB, DENOM_B), balance_before);
    assert_eq!(
        balance_before,
        Amount::from(INITIAL_BALANCE - 110)
    );
    assert!(ctx_b.escrow.is_empty());
    assert_pools_in_sync(&relayer, &pool_id);
    assert_escrow_invariants(&relayer);
}

#[rstest]
#[case::beyond_tolerance(100, false)]
#[case::within_tolerance(2_000, true)]
fn test_swap_bounded_by_reference_price(#[case] slippage: u64, #[case] accepted: bool) {
    let (mut relayer, pool_id) = active_pool();
    relayer
        .get_ctx_b_mut()
        .set_reference_price(DENOM_B, DENOM_A, Decimal::one());

    let res = swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder()
            .pool_id(pool_id)
            .slippage(slippage)
            .build(),
    );

    if accepted {
        assert!(res.is_ok());
    } else {
        assert!(matches!(
            res,
            Err(InterchainSwapError::SlippageExceeded { .. })
        ));
    }
}

#[test]
fn test_swap_of_remote_asset_rejected() {
    let (mut relayer, pool_id) = active_pool();

    let res = swap(
        relayer.get_ctx_a_mut(),
        SwapConfig::builder()
            .pool_id(pool_id)
            .sender(account(ALICE))
            .build(),
    );

    assert!(matches!(res, Err(InterchainSwapError::AssetNotLocal { .. })));
}

#[test]
fn test_swap_disabled() {
    let (mut relayer, pool_id) = active_pool();
    relayer.get_ctx_b_mut().config.swap_enabled = false;

    let res = swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder().pool_id(pool_id).build(),
    );

    assert!(matches!(res, Err(InterchainSwapError::SwapDisabled)));
}

#[test]
fn test_swap_on_inactive_pool_rejected() {
    let mut relayer = connected_chains();
    let pool_id = ibc_app_interchain_swap::handler::make_pool(
        relayer.get_ctx_a_mut(),
        MakePoolConfig::builder().build(),
    )
    .unwrap();
    relayer.relay_packets_a_to_b().unwrap();

    let res = swap(
        relayer.get_ctx_b_mut(),
        SwapConfig::builder().pool_id(pool_id).build(),
    );

    assert!(matches!(res, Err(InterchainSwapError::PoolNotActive { .. })));
    assert_eq!(
        relayer
            .get_ctx_b()
            .escrow_balance(&swap_port(), &channel_b(), DENOM_B),
        Amount::zero()
    );
}
