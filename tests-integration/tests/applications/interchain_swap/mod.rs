pub mod deposit;
pub mod idempotence;
pub mod pool_lifecycle;
pub mod swap;
pub mod withdraw;

use ibc_app_interchain_swap::handler::{make_pool, take_pool};
use ibc_app_interchain_swap_types::msgs::MsgMakePool;
use ibc_app_interchain_swap_types::packet::{InterchainSwapPacketData, StateChange};
use ibc_app_interchain_swap_types::{Amount, InterchainLiquidityPool};
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_testkit::context::MockSwapContext;
use ibc_testkit::fixtures::applications::interchain_swap::{
    channel_a, channel_b, dummy_chain_a, dummy_chain_b, MakePoolConfig, TakePoolConfig,
};
use ibc_testkit::fixtures::core::channel::extract_swap_packet;
use ibc_testkit::fixtures::core::context::swap_port;
use ibc_testkit::relayer::utils::decode_acknowledgement;
use ibc_testkit::relayer::SwapRelayer;

/// Two chains joined by an open interchain swap channel, without any pool.
pub fn connected_chains() -> SwapRelayer {
    let mut relayer = SwapRelayer::new(dummy_chain_a(), dummy_chain_b());
    relayer
        .open_channel_on_a()
        .expect("channel handshake succeeds");
    relayer
}

/// Makes a pool on chain A, takes it on chain B and relays until the
/// pool is active on both chains.
pub fn activate_pool(relayer: &mut SwapRelayer, msg: MsgMakePool) -> String {
    let pool_id = make_pool(relayer.get_ctx_a_mut(), msg).expect("pool is made");
    let relayed = relayer.relay_packets_a_to_b().expect("relay succeeds");
    assert!(relayed.iter().all(|packet| packet.is_success()));

    take_pool(
        relayer.get_ctx_b_mut(),
        TakePoolConfig::builder().pool_id(pool_id.clone()).build(),
    )
    .expect("pool is taken");
    let relayed = relayer.relay_packets_b_to_a().expect("relay succeeds");
    assert!(relayed.iter().all(|packet| packet.is_success()));

    tracing::debug!(%pool_id, "pool active on both chains");
    pool_id
}

/// Two connected chains sharing the default 100/100 pool.
pub fn active_pool() -> (SwapRelayer, String) {
    let mut relayer = connected_chains();
    let pool_id = activate_pool(&mut relayer, MakePoolConfig::builder().build());
    (relayer, pool_id)
}

pub fn pool(ctx: &MockSwapContext, pool_id: &str) -> InterchainLiquidityPool {
    ctx.pools.get(pool_id).expect("pool exists").clone()
}

pub fn asset_balance(ctx: &MockSwapContext, pool_id: &str, denom: &str) -> Amount {
    pool(ctx, pool_id)
        .find_asset_by_denom(denom)
        .expect("denom is in the pool")
        .balance
        .amount
}

/// Both chains hold the same view of the pool's balances, supply and status.
pub fn assert_pools_in_sync(relayer: &SwapRelayer, pool_id: &str) {
    let pool_a = pool(relayer.get_ctx_a(), pool_id);
    let pool_b = pool(relayer.get_ctx_b(), pool_id);

    assert_eq!(pool_a.assets, pool_b.assets);
    assert_eq!(pool_a.supply, pool_b.supply);
    assert_eq!(pool_a.status, pool_b.status);
}

pub fn assert_escrow_invariants(relayer: &SwapRelayer) {
    relayer
        .get_ctx_a()
        .check_escrow_invariant(&swap_port(), &channel_a());
    relayer
        .get_ctx_b()
        .check_escrow_invariant(&swap_port(), &channel_b());
}

/// Takes the single packet in flight from `ctx` and rewrites its state change,
/// as a faulty counterparty would.
pub fn tampered_packet(ctx: &MockSwapContext, edit: impl FnOnce(&mut StateChange)) -> Packet {
    let mut outbound = ctx.take_outbound_packets();
    assert_eq!(outbound.len(), 1);
    let packet = extract_swap_packet(outbound.remove(0));

    let mut data = InterchainSwapPacketData::from_bytes(&packet.data).expect("swap packet");
    let mut state_change = data
        .decode_state_change()
        .expect("packet carries a state change");
    edit(&mut state_change);
    data.state_change = Some(serde_json::to_vec(&state_change).expect("state change encodes"));

    Packet {
        data: data.to_bytes(),
        ..packet
    }
}

/// Message of the error acknowledgement written for `packet`.
pub fn error_ack(packet: &Packet, ack: &Acknowledgement) -> String {
    match decode_acknowledgement(packet, ack).expect("acknowledgement decodes") {
        AcknowledgementStatus::Error(value) => value.to_string(),
        AcknowledgementStatus::Success(value) => panic!("unexpected success ack: {value}"),
    }
}
