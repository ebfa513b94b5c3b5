use ibc_app_interchain_swap_types::ack::AckResult;
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::events::MakePoolEvent;
use ibc_app_interchain_swap_types::msgs::{
    MsgMakeMultiAssetDeposit, MsgMakePool, MsgMultiAssetWithdraw, MsgSingleAssetDeposit, MsgSwap,
    MsgTakePool,
};
use ibc_app_interchain_swap_types::packet::{InterchainMessageType, InterchainSwapPacketData};
use ibc_app_interchain_swap_types::{
    Amount, ChannelEndpoint, Coin, InterchainLiquidityPool, Order, OrderKind,
    OrderStatus, PoolSide, PoolStatus,
};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;
use ibc_core::router::types::event::ModuleEvent;

use super::multi_asset_deposit::deposit_coins;
use super::multi_asset_withdraw::settle_withdraw;
use super::{
    ensure_pool_channel, expire_order, is_local_asset, parse_account, set_pool_status,
    settle_deposit_order,
};
use crate::amm::InterchainMarketMaker;
use crate::context::InterchainSwapExecutionContext;
use crate::escrow::EscrowKey;

/// Applies a received packet to the host state and returns the result carried by
/// the success acknowledgement.
///
/// Every branch checks the packet in full before mutating state, so an error
/// leaves the host untouched and is returned to the sender as an error
/// acknowledgement. The one exception is a deposit order that expired before the
/// counterparty funded it: the order is expired here and the error reports it.
pub fn process_recv_packet_execute<Ctx>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
) -> Result<AckResult, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    match data.msg_type {
        InterchainMessageType::Unspecified => Ok(AckResult::new(data.msg_type)),
        InterchainMessageType::MakePool => recv_make_pool(ctx_b, packet, data),
        InterchainMessageType::TakePool => recv_take_pool(ctx_b, packet, data),
        InterchainMessageType::SingleAssetDeposit => recv_single_asset_deposit(ctx_b, packet, data),
        InterchainMessageType::MakeMultiDeposit => recv_make_multi_deposit(ctx_b, packet, data),
        InterchainMessageType::TakeMultiDeposit => recv_take_multi_deposit(ctx_b, packet, data),
        InterchainMessageType::MultiWithdraw => recv_multi_withdraw(ctx_b, packet, data),
        InterchainMessageType::LeftSwap | InterchainMessageType::RightSwap => {
            recv_swap(ctx_b, packet, data)
        }
    }
}

/// Pool a packet refers to, or an empty string when it cannot be decoded.
pub fn packet_pool_id(data: &InterchainSwapPacketData) -> String {
    match data.msg_type {
        InterchainMessageType::MakePool => data
            .decode_msg::<MsgMakePool>()
            .map(|msg| msg.pool_id())
            .unwrap_or_default(),
        _ => data
            .decode_state_change()
            .ok()
            .and_then(|state_change| state_change.pool_id)
            .unwrap_or_default(),
    }
}

fn recv_make_pool<Ctx>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
) -> Result<AckResult, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let msg: MsgMakePool = data.decode_msg()?;
    msg.validate_basic()?;
    ctx_b.config().validate_swap_fee(msg.swap_fee)?;

    let chain_id = ctx_b.chain_id();
    if msg.destination_chain_id != chain_id {
        return Err(InterchainSwapError::InvalidChainId {
            chain_id: msg.destination_chain_id,
            expected: chain_id,
        });
    }

    let pool_id = msg.pool_id();
    ctx_b.pool_registry().ensure_available(&pool_id)?;

    let pool = InterchainLiquidityPool {
        id: pool_id.clone(),
        source_creator: msg.creator.clone(),
        destination_creator: msg.counterparty_creator.clone(),
        source_chain_id: msg.source_chain_id.clone(),
        destination_chain_id: msg.destination_chain_id.clone(),
        assets: msg.liquidity.clone(),
        swap_fee: msg.swap_fee,
        supply: Coin::new(pool_id.clone(), Amount::zero()),
        status: PoolStatus::Created,
        endpoint: ChannelEndpoint {
            port_id: packet.port_id_on_b.clone(),
            channel_id: packet.chan_id_on_b.clone(),
            counterparty_port_id: packet.port_id_on_a.clone(),
            counterparty_channel_id: packet.chan_id_on_a.clone(),
        },
    };
    ctx_b.pool_registry_mut().insert(pool)?;

    ctx_b.log_message(format!(
        "IBC interchain swap: recorded pool {pool_id} made on {}",
        msg.source_chain_id
    ))?;
    ctx_b.emit_event(ModuleEvent::from(MakePoolEvent {
        pool_id: pool_id.clone(),
        creator: msg.creator,
        counterparty_creator: msg.counterparty_creator,
        source_chain_id: msg.source_chain_id,
        destination_chain_id: msg.destination_chain_id,
        liquidity: msg.liquidity.into_iter().map(|asset| asset.balance).collect(),
    }))?;

    Ok(AckResult::new(data.msg_type).with_pool_id(pool_id))
}

fn recv_take_pool<Ctx>(
    ctx_a: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
) -> Result<AckResult, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let msg: MsgTakePool = data.decode_msg()?;

    let pool = ctx_a.pool_registry().get(&msg.pool_id)?;
    match pool.status {
        PoolStatus::Created => {}
        PoolStatus::Active => {
            return Err(InterchainSwapError::PoolAlreadyActive {
                pool_id: pool.id.clone(),
            })
        }
        status @ PoolStatus::Failed => {
            return Err(InterchainSwapError::PoolNotActive {
                pool_id: pool.id.clone(),
                status,
            })
        }
    }

    let carried_id = data
        .decode_state_change()?
        .pool_id
        .ok_or_else(|| missing_state_change(data))?;
    let computed_id = pool.computed_id();
    if computed_id != carried_id {
        return Err(InterchainSwapError::PoolIdMismatch {
            expected: computed_id,
            actual: carried_id,
        });
    }
    ensure_pool_channel(pool, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    if msg.creator != pool.destination_creator {
        return Err(InterchainSwapError::InvalidTaker {
            account: msg.creator.to_string(),
        });
    }

    let supply = pool.total_balance()?;
    let creator_shares = pool.pool_token(pool.side_weight(PoolSide::Source)?.mul_floor(supply)?);
    let creator = pool.source_creator.clone();
    let account = parse_account::<Ctx>(&creator)?;
    ctx_a.mint_pool_tokens_validate(&account, &creator_shares)?;

    ctx_a.escrow_ledger_mut().release_pool(&msg.pool_id);

    ctx_a.pool_registry_mut().get_mut(&msg.pool_id)?.supply.amount = supply;
    set_pool_status(ctx_a, &msg.pool_id, PoolStatus::Active)?;
    ctx_a.mint_pool_tokens_execute(&account, &creator_shares)?;

    ctx_a.log_message(format!(
        "IBC interchain swap: pool {} activated, minted {creator_shares} to {creator}",
        msg.pool_id
    ))?;

    Ok(AckResult::new(data.msg_type)
        .with_pool_id(msg.pool_id)
        .with_tokens(vec![creator_shares]))
}

fn recv_single_asset_deposit<Ctx>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
) -> Result<AckResult, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let msg: MsgSingleAssetDeposit = data.decode_msg()?;
    let state_change = data.decode_state_change()?;
    let shares = state_change
        .pool_tokens
        .first()
        .cloned()
        .ok_or_else(|| missing_state_change(data))?;

    let pool = ctx_b.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;
    ensure_pool_channel(pool, &packet.port_id_on_b, &packet.chan_id_on_b)?;
    pool.find_asset_by_denom(&msg.token.denom)?;
    if shares.denom != pool.pool_token_denom() {
        return Err(InterchainSwapError::InvalidPoolToken {
            denom: shares.denom,
            expected: pool.pool_token_denom().to_string(),
        });
    }

    let pool = ctx_b.pool_registry_mut().get_mut(&msg.pool_id)?;
    pool.add_asset(&msg.token)?;
    pool.add_supply(shares.amount)?;

    Ok(AckResult::new(data.msg_type)
        .with_pool_id(msg.pool_id)
        .with_tokens(vec![shares]))
}

fn recv_make_multi_deposit<Ctx>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
) -> Result<AckResult, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let msg: MsgMakeMultiAssetDeposit = data.decode_msg()?;
    msg.validate_basic()?;
    let state_change = data.decode_state_change()?;
    let order_id = state_change
        .order_id
        .ok_or_else(|| missing_state_change(data))?;
    if state_change.pool_tokens.len() != msg.deposits.len() {
        return Err(missing_state_change(data));
    }

    let pool = ctx_b.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;
    ensure_pool_channel(pool, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    let amm = InterchainMarketMaker::new(pool);
    let coins = deposit_coins(&msg.deposits);
    let quote = amm.deposit_multi_asset(&coins)?;
    amm.check_deposit_ratio(&coins, quote.ratio, ctx_b.config().deposit_ratio_tolerance_bps)?;

    let settlement = amm.allocate_shares(&msg.deposits, quote.total_shares)?;
    for (expected, actual) in settlement.iter().zip(state_change.pool_tokens.iter()) {
        if expected.balance != *actual {
            return Err(InterchainSwapError::PoolTokenMismatch {
                denom: actual.denom.clone(),
                expected: expected.balance.amount.to_string(),
                actual: actual.amount.to_string(),
            });
        }
    }

    let order = Order {
        id: order_id,
        pool_id: msg.pool_id.clone(),
        kind: OrderKind::Deposit,
        status: OrderStatus::Pending,
        deposits: msg.deposits,
        settlement,
        timeout: msg.timeout,
        created_at: ctx_b.host_height(),
    };
    ctx_b.order_registry_mut().insert(order)?;

    ctx_b.log_message(format!(
        "IBC interchain swap: recorded deposit order {}-{order_id}",
        msg.pool_id
    ))?;

    Ok(AckResult::new(data.msg_type)
        .with_pool_id(msg.pool_id)
        .with_order_id(order_id))
}

fn recv_take_multi_deposit<Ctx>(
    ctx_a: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
) -> Result<AckResult, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let state_change = data.decode_state_change()?;
    let (pool_id, order_id) = match (state_change.pool_id, state_change.order_id) {
        (Some(pool_id), Some(order_id)) => (pool_id, order_id),
        _ => return Err(missing_state_change(data)),
    };

    let order = ctx_a.order_registry().get(&pool_id, order_id)?.clone();
    order.ensure_pending()?;

    let pool = ctx_a.pool_registry().get(&pool_id)?;
    ensure_pool_channel(pool, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    if order.has_expired(ctx_a.host_height(), ctx_a.host_timestamp()) {
        expire_order(ctx_a, &order)?;
        return Err(InterchainSwapError::OrderExpired { order_id });
    }

    ctx_a.pool_registry().get(&pool_id)?.ensure_active()?;

    settle_deposit_order(ctx_a, &order)?;
    ctx_a
        .escrow_ledger_mut()
        .take(&EscrowKey::order(&pool_id, order_id));

    Ok(AckResult::new(data.msg_type)
        .with_pool_id(pool_id)
        .with_order_id(order_id)
        .with_tokens(
            order
                .settlement
                .into_iter()
                .map(|share| share.balance)
                .collect(),
        ))
}

fn recv_multi_withdraw<Ctx>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
) -> Result<AckResult, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let msg: MsgMultiAssetWithdraw = data.decode_msg()?;
    let state_change = data.decode_state_change()?;

    let pool = ctx_b.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;
    ensure_pool_channel(pool, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    let out_tokens = InterchainMarketMaker::new(pool).multi_asset_withdraw(&msg.pool_token)?;
    if out_tokens.len() != state_change.out_tokens.len() {
        return Err(missing_state_change(data));
    }
    for (expected, actual) in out_tokens.iter().zip(state_change.out_tokens.iter()) {
        if expected != actual {
            return Err(InterchainSwapError::WithdrawAmountMismatch {
                denom: expected.denom.clone(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    settle_withdraw(
        ctx_b,
        &msg.pool_id,
        &out_tokens,
        &msg.pool_token,
        &msg.counterparty_receiver,
    )?;

    let mut result = AckResult::new(data.msg_type)
        .with_pool_id(msg.pool_id)
        .with_tokens(out_tokens);
    if let Some(order_id) = state_change.order_id {
        result = result.with_order_id(order_id);
    }
    Ok(result)
}

fn recv_swap<Ctx>(
    ctx_b: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
) -> Result<AckResult, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let msg: MsgSwap = data.decode_msg()?;
    let state_change = data.decode_state_change()?;
    let (token_in, token_out) = match (
        state_change.in_tokens.first(),
        state_change.out_tokens.first(),
    ) {
        (Some(token_in), Some(token_out)) => (token_in.clone(), token_out.clone()),
        _ => return Err(missing_state_change(data)),
    };

    let pool = ctx_b.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;
    ensure_pool_channel(pool, &packet.port_id_on_b, &packet.chan_id_on_b)?;
    pool.find_asset_by_denom(&token_in.denom)?;

    let asset_out = pool.find_asset_by_denom(&token_out.denom)?;
    if token_out.amount >= asset_out.balance.amount {
        return Err(InterchainSwapError::InsufficientLiquidity {
            requested: token_out.to_string(),
            available: asset_out.balance.to_string(),
        });
    }

    if is_local_asset(ctx_b, pool, &token_out.denom)? {
        let endpoint = pool.endpoint.clone();
        let recipient = parse_account::<Ctx>(&msg.recipient)?;
        ctx_b.unescrow_coins_validate(
            &recipient,
            &endpoint.port_id,
            &endpoint.channel_id,
            &token_out,
        )?;
        ctx_b.unescrow_coins_execute(
            &recipient,
            &endpoint.port_id,
            &endpoint.channel_id,
            &token_out,
        )?;
    }

    let pool = ctx_b.pool_registry_mut().get_mut(&msg.pool_id)?;
    pool.add_asset(&token_in)?;
    pool.subtract_asset(&token_out)?;

    Ok(AckResult::new(data.msg_type)
        .with_pool_id(msg.pool_id)
        .with_tokens(vec![token_out]))
}

fn missing_state_change(data: &InterchainSwapPacketData) -> InterchainSwapError {
    InterchainSwapError::MissingStateChange {
        msg_type: data.msg_type.to_string(),
    }
}
