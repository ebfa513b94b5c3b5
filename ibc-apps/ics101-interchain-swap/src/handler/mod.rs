//! Implements the processing logic for ICS101 (interchain swap) messages.
mod expire_orders;
mod make_pool;
mod multi_asset_deposit;
mod multi_asset_withdraw;
mod on_acknowledgement;
mod on_recv_packet;
mod on_timeout;
mod single_asset_deposit;
mod swap;
mod take_pool;

pub use expire_orders::*;
pub use make_pool::*;
pub use multi_asset_deposit::*;
pub use multi_asset_withdraw::*;
pub use on_acknowledgement::*;
pub use on_recv_packet::*;
pub use on_timeout::*;
pub use single_asset_deposit::*;
pub use swap::*;
pub use take_pool::*;

use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::events::{OrderEvent, PoolStatusEvent};
use ibc_app_interchain_swap_types::packet::InterchainSwapPacketData;
use ibc_app_interchain_swap_types::{
    ChannelEndpoint, InterchainLiquidityPool, Order, OrderStatus, PoolAsset, PoolSide, PoolStatus,
    Timeout,
};
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

use crate::context::{
    InterchainSwapExecutionContext, InterchainSwapValidationContext, OutboundPacket,
    PoolTokenMintAuthority,
};
use crate::escrow::{EscrowEntry, EscrowKey, Refund};

pub(crate) fn parse_account<Ctx>(signer: &Signer) -> Result<Ctx::AccountId, InterchainSwapError>
where
    Ctx: InterchainSwapValidationContext,
{
    signer
        .clone()
        .try_into()
        .map_err(|_| InterchainSwapError::ParseAccountFailure)
}

/// Side of the pool whose assets the host chain custodies.
pub(crate) fn local_side(
    ctx: &impl InterchainSwapValidationContext,
    pool: &InterchainLiquidityPool,
) -> PoolSide {
    pool.local_side(&ctx.chain_id())
}

pub(crate) fn is_local_asset(
    ctx: &impl InterchainSwapValidationContext,
    pool: &InterchainLiquidityPool,
    denom: &str,
) -> Result<bool, InterchainSwapError> {
    Ok(pool.find_asset_by_denom(denom)?.side == local_side(ctx, pool))
}

pub(crate) fn ensure_local_asset<'p>(
    ctx: &impl InterchainSwapValidationContext,
    pool: &'p InterchainLiquidityPool,
    denom: &str,
) -> Result<&'p PoolAsset, InterchainSwapError> {
    let asset = pool.find_asset_by_denom(denom)?;
    if asset.side != local_side(ctx, pool) {
        return Err(InterchainSwapError::AssetNotLocal {
            denom: denom.to_string(),
        });
    }
    Ok(asset)
}

/// Fails unless the packet arrived on the channel the pool is bound to.
pub(crate) fn ensure_pool_channel(
    pool: &InterchainLiquidityPool,
    port_id: &PortId,
    channel_id: &ChannelId,
) -> Result<(), InterchainSwapError> {
    if &pool.endpoint.channel_id != channel_id || &pool.endpoint.port_id != port_id {
        return Err(InterchainSwapError::ChannelMismatch {
            channel_id: channel_id.clone(),
            expected: pool.endpoint.channel_id.clone(),
        });
    }
    Ok(())
}

/// Reserves the next sequence on the pool's channel, records the escrow entry that
/// resolves the packet's outcome and hands the packet to the host.
pub(crate) fn send_swap_packet<Ctx>(
    ctx: &mut Ctx,
    endpoint: &ChannelEndpoint,
    data: InterchainSwapPacketData,
    timeout: Timeout,
    entry: EscrowEntry,
) -> Result<Sequence, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let sequence = ctx.get_next_sequence_send(&endpoint.port_id, &endpoint.channel_id)?;

    let msg_type = data.msg_type;
    ctx.escrow_ledger_mut().record(
        EscrowKey::packet(&endpoint.port_id, &endpoint.channel_id, sequence),
        entry,
    );

    ctx.send_packet_execute(OutboundPacket {
        sequence,
        port_id_on_a: endpoint.port_id.clone(),
        chan_id_on_a: endpoint.channel_id.clone(),
        port_id_on_b: endpoint.counterparty_port_id.clone(),
        chan_id_on_b: endpoint.counterparty_channel_id.clone(),
        data: data.to_bytes(),
        timeout,
    })?;

    ctx.log_message(format!(
        "IBC interchain swap: sent {msg_type} packet on {}/{} with sequence {sequence}",
        endpoint.port_id, endpoint.channel_id
    ))?;

    Ok(sequence)
}

pub(crate) fn refund_validate<Ctx>(
    ctx: &Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
    refunds: &[Refund],
) -> Result<(), InterchainSwapError>
where
    Ctx: PoolTokenMintAuthority,
{
    for refund in refunds {
        let account = parse_account::<Ctx>(refund.account())?;
        match refund {
            Refund::Unescrow { coin, .. } => {
                ctx.unescrow_coins_validate(&account, port_id, channel_id, coin)?
            }
            Refund::Remint { coin, .. } => ctx.mint_pool_tokens_validate(&account, coin)?,
        }
    }
    Ok(())
}

pub(crate) fn refund_execute<Ctx>(
    ctx: &mut Ctx,
    port_id: &PortId,
    channel_id: &ChannelId,
    refunds: &[Refund],
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    for refund in refunds {
        let account = parse_account::<Ctx>(refund.account())?;
        match refund {
            Refund::Unescrow { coin, .. } => {
                ctx.unescrow_coins_execute(&account, port_id, channel_id, coin)?
            }
            Refund::Remint { coin, .. } => ctx.mint_pool_tokens_execute(&account, coin)?,
        }
        ctx.log_message(format!(
            "IBC interchain swap: refunded {} to {}",
            refund.coin(),
            refund.account()
        ))?;
    }
    Ok(())
}

pub(crate) fn set_pool_status<Ctx>(
    ctx: &mut Ctx,
    pool_id: &str,
    status: PoolStatus,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let pool = ctx.pool_registry_mut().get_mut(pool_id)?;
    pool.status = status;
    let supply = pool.supply.clone();

    ctx.emit_event(ModuleEvent::from(PoolStatusEvent {
        pool_id: pool_id.to_string(),
        status,
        supply,
    }))?;
    ctx.log_message(format!("IBC interchain swap: pool {pool_id} is {status}"))
}

pub(crate) fn set_order_status<Ctx>(
    ctx: &mut Ctx,
    pool_id: &str,
    order_id: u64,
    status: OrderStatus,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    ctx.order_registry_mut()
        .set_status(pool_id, order_id, status)?;

    let order_key = format!("{pool_id}-{order_id}");
    ctx.emit_event(ModuleEvent::from(OrderEvent {
        pool_id: pool_id.to_string(),
        order_key: order_key.clone(),
        status,
    }))?;
    ctx.log_message(format!("IBC interchain swap: order {order_key} is {status}"))
}

/// Refunds the escrow still held for an order and marks it expired.
pub(crate) fn expire_order<Ctx>(
    ctx: &mut Ctx,
    order: &Order,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    if let Some(entry) = ctx
        .escrow_ledger_mut()
        .take(&EscrowKey::order(&order.pool_id, order.id))
    {
        let endpoint = ctx.pool_registry().get(&order.pool_id)?.endpoint.clone();
        refund_execute(ctx, &endpoint.port_id, &endpoint.channel_id, &entry.refunds)?;
    }
    set_order_status(ctx, &order.pool_id, order.id, OrderStatus::Expired)
}

/// Grows the pool by every leg of a settled deposit order and mints the shares of
/// the depositors on this chain.
pub(crate) fn settle_deposit_order<Ctx>(
    ctx: &mut Ctx,
    order: &Order,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let pool = ctx.pool_registry().get(&order.pool_id)?;
    let side = local_side(ctx, pool);

    let mut local_shares = Vec::new();
    for (deposit, shares) in order.deposits.iter().zip(order.settlement.iter()) {
        if pool.find_asset_by_denom(&deposit.balance.denom)?.side == side {
            let account = parse_account::<Ctx>(&shares.sender)?;
            ctx.mint_pool_tokens_validate(&account, &shares.balance)?;
            local_shares.push((account, shares.balance.clone()));
        }
    }

    let total_shares = order.total_settlement()?;
    let pool = ctx.pool_registry_mut().get_mut(&order.pool_id)?;
    for deposit in &order.deposits {
        pool.add_asset(&deposit.balance)?;
    }
    pool.add_supply(total_shares)?;

    for (account, shares) in local_shares {
        ctx.mint_pool_tokens_execute(&account, &shares)?;
    }

    set_order_status(ctx, &order.pool_id, order.id, OrderStatus::Complete)
}
