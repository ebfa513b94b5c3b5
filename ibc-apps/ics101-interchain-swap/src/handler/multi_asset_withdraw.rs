use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::events::WithdrawEvent;
use ibc_app_interchain_swap_types::msgs::MsgMultiAssetWithdraw;
use ibc_app_interchain_swap_types::packet::{
    InterchainMessageType, InterchainSwapPacketData, StateChange,
};
use ibc_app_interchain_swap_types::{Coin, DepositAsset, Order, OrderKind, OrderStatus};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

use super::{local_side, parse_account, send_swap_packet, set_order_status};
use crate::amm::InterchainMarketMaker;
use crate::context::{InterchainSwapExecutionContext, PoolTokenMintAuthority};
use crate::escrow::{EscrowEntry, Refund};

/// Redeems pool tokens for a share of every pool asset and returns the order id.
/// Equivalent to calling [`multi_asset_withdraw_validate`], followed by
/// [`multi_asset_withdraw_execute`].
pub fn multi_asset_withdraw<Ctx>(
    ctx: &mut Ctx,
    msg: MsgMultiAssetWithdraw,
) -> Result<u64, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    multi_asset_withdraw_validate(ctx, &msg)?;
    multi_asset_withdraw_execute(ctx, msg)
}

pub fn multi_asset_withdraw_validate<Ctx>(
    ctx: &Ctx,
    msg: &MsgMultiAssetWithdraw,
) -> Result<(), InterchainSwapError>
where
    Ctx: PoolTokenMintAuthority,
{
    msg.validate_basic()?;

    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;

    InterchainMarketMaker::new(pool).multi_asset_withdraw(&msg.pool_token)?;

    let receiver = parse_account::<Ctx>(&msg.receiver)?;
    ctx.burn_pool_tokens_validate(&receiver, &msg.pool_token)?;

    ctx.get_next_sequence_send(&pool.endpoint.port_id, &pool.endpoint.channel_id)?;

    Ok(())
}

/// Burns the pool tokens, records the withdraw order and sends the
/// `MULTI_WITHDRAW` packet. Assets are released on each chain as the packet is
/// received and acknowledged.
pub fn multi_asset_withdraw_execute<Ctx>(
    ctx: &mut Ctx,
    msg: MsgMultiAssetWithdraw,
) -> Result<u64, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    let endpoint = pool.endpoint.clone();
    let side = local_side(ctx, pool);
    let out_tokens = InterchainMarketMaker::new(pool).multi_asset_withdraw(&msg.pool_token)?;

    let mut settlement = Vec::with_capacity(out_tokens.len());
    for token in &out_tokens {
        let recipient = if pool.find_asset_by_denom(&token.denom)?.side == side {
            msg.receiver.clone()
        } else {
            msg.counterparty_receiver.clone()
        };
        settlement.push(DepositAsset::new(recipient, token.clone()));
    }

    let receiver = parse_account::<Ctx>(&msg.receiver)?;
    ctx.burn_pool_tokens_execute(&receiver, &msg.pool_token)?;

    let order_id = ctx.order_registry().next_order_id(&msg.pool_id, side);
    let order = Order {
        id: order_id,
        pool_id: msg.pool_id.clone(),
        kind: OrderKind::Withdraw,
        status: OrderStatus::Initial,
        deposits: vec![DepositAsset::new(
            msg.receiver.clone(),
            msg.pool_token.clone(),
        )],
        settlement,
        timeout: msg.timeout,
        created_at: ctx.host_height(),
    };
    ctx.order_registry_mut().insert(order)?;

    let state_change = StateChange {
        out_tokens: out_tokens.clone(),
        pool_tokens: vec![msg.pool_token.clone()],
        pool_id: Some(msg.pool_id.clone()),
        order_id: Some(order_id),
        ..Default::default()
    };

    send_swap_packet(
        ctx,
        &endpoint,
        InterchainSwapPacketData::new(
            InterchainMessageType::MultiWithdraw,
            &msg,
            Some(&state_change),
        ),
        msg.timeout,
        EscrowEntry::new(InterchainMessageType::MultiWithdraw, &msg.pool_id)
            .with_order_id(order_id)
            .with_refunds(vec![Refund::Remint {
                account: msg.receiver.clone(),
                coin: msg.pool_token.clone(),
            }]),
    )?;

    set_order_status(ctx, &msg.pool_id, order_id, OrderStatus::Pending)?;

    {
        ctx.log_message(format!(
            "IBC interchain swap: {} redeemed {} from pool {}",
            msg.receiver, msg.pool_token, msg.pool_id
        ))?;

        let event = WithdrawEvent {
            pool_id: msg.pool_id,
            receiver: msg.receiver,
            pool_token: msg.pool_token,
            out_tokens,
        };
        ctx.emit_event(ModuleEvent::from(event))?;
    }

    Ok(order_id)
}

/// Releases the withdrawn assets custodied on this chain and shrinks the pool.
pub(crate) fn settle_withdraw<Ctx>(
    ctx: &mut Ctx,
    pool_id: &str,
    out_tokens: &[Coin],
    pool_token: &Coin,
    local_recipient: &Signer,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let pool = ctx.pool_registry().get(pool_id)?;
    let endpoint = pool.endpoint.clone();
    let side = local_side(ctx, pool);

    let mut local = Vec::new();
    for token in out_tokens {
        if pool.find_asset_by_denom(&token.denom)?.side == side {
            local.push(token.clone());
        }
    }

    let recipient = parse_account::<Ctx>(local_recipient)?;
    for token in &local {
        ctx.unescrow_coins_validate(&recipient, &endpoint.port_id, &endpoint.channel_id, token)?;
    }

    let pool = ctx.pool_registry_mut().get_mut(pool_id)?;
    for token in out_tokens {
        pool.subtract_asset(token)?;
    }
    pool.subtract_supply(pool_token.amount)?;

    for token in &local {
        ctx.unescrow_coins_execute(&recipient, &endpoint.port_id, &endpoint.channel_id, token)?;
    }

    Ok(())
}
