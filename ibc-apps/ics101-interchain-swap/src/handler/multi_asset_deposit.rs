use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::msgs::{MsgMakeMultiAssetDeposit, MsgTakeMultiAssetDeposit};
use ibc_app_interchain_swap_types::packet::{
    InterchainMessageType, InterchainSwapPacketData, StateChange,
};
use ibc_app_interchain_swap_types::{
    Coin, DepositAsset, InterchainLiquidityPool, Order, OrderKind, OrderStatus,
};
use ibc_core::primitives::prelude::*;

use super::{local_side, parse_account, send_swap_packet, set_order_status};
use crate::amm::InterchainMarketMaker;
use crate::context::{InterchainSwapExecutionContext, InterchainSwapValidationContext};
use crate::escrow::{EscrowEntry, EscrowKey, Refund};

/// Opens a two-phase multi-asset deposit and returns the order id. Equivalent to
/// calling [`make_multi_asset_deposit_validate`], followed by
/// [`make_multi_asset_deposit_execute`].
pub fn make_multi_asset_deposit<Ctx>(
    ctx: &mut Ctx,
    msg: MsgMakeMultiAssetDeposit,
) -> Result<u64, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    make_multi_asset_deposit_validate(ctx, &msg)?;
    make_multi_asset_deposit_execute(ctx, msg)
}

pub fn make_multi_asset_deposit_validate<Ctx>(
    ctx: &Ctx,
    msg: &MsgMakeMultiAssetDeposit,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapValidationContext,
{
    msg.validate_basic()?;

    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;

    let quote = InterchainMarketMaker::new(pool).deposit_multi_asset(&deposit_coins(&msg.deposits))?;
    if quote.total_shares.is_zero() {
        return Err(InterchainSwapError::ZeroAmount);
    }

    for deposit in local_legs(ctx, pool, &msg.deposits)? {
        let sender = parse_account::<Ctx>(&deposit.sender)?;
        ctx.escrow_coins_validate(
            &sender,
            &pool.endpoint.port_id,
            &pool.endpoint.channel_id,
            &deposit.balance,
        )?;
    }

    ctx.get_next_sequence_send(&pool.endpoint.port_id, &pool.endpoint.channel_id)?;

    Ok(())
}

/// Escrows the local legs, records a pending order and sends the
/// `MAKE_MULTI_DEPOSIT` packet carrying the pool tokens owed to each depositor.
pub fn make_multi_asset_deposit_execute<Ctx>(
    ctx: &mut Ctx,
    msg: MsgMakeMultiAssetDeposit,
) -> Result<u64, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    let endpoint = pool.endpoint.clone();
    let side = local_side(ctx, pool);
    let local: Vec<DepositAsset> = local_legs(ctx, pool, &msg.deposits)?
        .cloned()
        .collect();

    let amm = InterchainMarketMaker::new(pool);
    let quote = amm.deposit_multi_asset(&deposit_coins(&msg.deposits))?;
    let settlement = amm.allocate_shares(&msg.deposits, quote.total_shares)?;

    for deposit in &local {
        let sender = parse_account::<Ctx>(&deposit.sender)?;
        ctx.escrow_coins_execute(
            &sender,
            &endpoint.port_id,
            &endpoint.channel_id,
            &deposit.balance,
        )?;
    }

    let order_id = ctx.order_registry().next_order_id(&msg.pool_id, side);
    let order = Order {
        id: order_id,
        pool_id: msg.pool_id.clone(),
        kind: OrderKind::Deposit,
        status: OrderStatus::Initial,
        deposits: msg.deposits.clone(),
        settlement: settlement.clone(),
        timeout: msg.timeout,
        created_at: ctx.host_height(),
    };
    ctx.order_registry_mut().insert(order)?;

    let refunds = local
        .into_iter()
        .map(|deposit| Refund::Unescrow {
            account: deposit.sender,
            coin: deposit.balance,
        })
        .collect();
    ctx.escrow_ledger_mut().record(
        EscrowKey::order(&msg.pool_id, order_id),
        EscrowEntry::new(InterchainMessageType::MakeMultiDeposit, &msg.pool_id)
            .with_order_id(order_id)
            .with_refunds(refunds),
    );

    let state_change = StateChange {
        pool_tokens: settlement.into_iter().map(|share| share.balance).collect(),
        pool_id: Some(msg.pool_id.clone()),
        order_id: Some(order_id),
        ..Default::default()
    };

    send_swap_packet(
        ctx,
        &endpoint,
        InterchainSwapPacketData::new(
            InterchainMessageType::MakeMultiDeposit,
            &msg,
            Some(&state_change),
        ),
        msg.timeout,
        EscrowEntry::new(InterchainMessageType::MakeMultiDeposit, &msg.pool_id)
            .with_order_id(order_id),
    )?;

    set_order_status(ctx, &msg.pool_id, order_id, OrderStatus::Pending)?;

    Ok(order_id)
}

/// Funds and settles a pending multi-asset deposit opened on the counterparty
/// chain. Equivalent to calling [`take_multi_asset_deposit_validate`], followed by
/// [`take_multi_asset_deposit_execute`].
///
/// An order whose timeout has passed is marked `EXPIRED` before the error is
/// returned.
pub fn take_multi_asset_deposit<Ctx>(
    ctx: &mut Ctx,
    msg: MsgTakeMultiAssetDeposit,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    match take_multi_asset_deposit_validate(ctx, &msg) {
        Ok(()) => take_multi_asset_deposit_execute(ctx, msg),
        Err(err @ InterchainSwapError::OrderExpired { .. }) => {
            if ctx
                .order_registry()
                .get(&msg.pool_id, msg.order_id)?
                .is_pending()
            {
                set_order_status(ctx, &msg.pool_id, msg.order_id, OrderStatus::Expired)?;
            }
            Err(err)
        }
        Err(err) => Err(err),
    }
}

pub fn take_multi_asset_deposit_validate<Ctx>(
    ctx: &Ctx,
    msg: &MsgTakeMultiAssetDeposit,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapValidationContext,
{
    msg.validate_basic()?;

    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;

    let order = ctx.order_registry().get(&msg.pool_id, msg.order_id)?;
    order.ensure_pending()?;

    if ctx
        .escrow_ledger()
        .has_packet_in_flight(&msg.pool_id, msg.order_id)
    {
        return Err(InterchainSwapError::InvalidOrderStatus {
            order_id: order.id,
            status: order.status,
        });
    }

    if order.has_expired(ctx.host_height(), ctx.host_timestamp()) {
        return Err(InterchainSwapError::OrderExpired { order_id: order.id });
    }

    let local: Vec<&DepositAsset> = local_legs(ctx, pool, &order.deposits)?.collect();
    if let Some(leg) = local.iter().find(|leg| leg.sender != msg.sender) {
        return Err(InterchainSwapError::InvalidTaker {
            account: leg.sender.to_string(),
        });
    }

    let amm = InterchainMarketMaker::new(pool);
    let coins = deposit_coins(&order.deposits);
    let quote = amm.deposit_multi_asset(&coins)?;
    amm.check_deposit_ratio(&coins, quote.ratio, ctx.config().deposit_ratio_tolerance_bps)?;

    let sender = parse_account::<Ctx>(&msg.sender)?;
    for leg in local {
        ctx.escrow_coins_validate(
            &sender,
            &pool.endpoint.port_id,
            &pool.endpoint.channel_id,
            &leg.balance,
        )?;
    }

    ctx.get_next_sequence_send(&pool.endpoint.port_id, &pool.endpoint.channel_id)?;

    Ok(())
}

/// Escrows this chain's legs of the order and sends the `TAKE_MULTI_DEPOSIT`
/// packet. The order settles here once the counterparty acknowledges.
pub fn take_multi_asset_deposit_execute<Ctx>(
    ctx: &mut Ctx,
    msg: MsgTakeMultiAssetDeposit,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    let endpoint = pool.endpoint.clone();
    let order = ctx.order_registry().get(&msg.pool_id, msg.order_id)?;
    let local: Vec<Coin> = local_legs(ctx, pool, &order.deposits)?
        .map(|leg| leg.balance.clone())
        .collect();

    let sender = parse_account::<Ctx>(&msg.sender)?;
    for coin in &local {
        ctx.escrow_coins_execute(&sender, &endpoint.port_id, &endpoint.channel_id, coin)?;
    }

    let refunds = local
        .into_iter()
        .map(|coin| Refund::Unescrow {
            account: msg.sender.clone(),
            coin,
        })
        .collect();

    let state_change = StateChange {
        pool_id: Some(msg.pool_id.clone()),
        order_id: Some(msg.order_id),
        ..Default::default()
    };

    send_swap_packet(
        ctx,
        &endpoint,
        InterchainSwapPacketData::new(
            InterchainMessageType::TakeMultiDeposit,
            &msg,
            Some(&state_change),
        ),
        msg.timeout,
        EscrowEntry::new(InterchainMessageType::TakeMultiDeposit, &msg.pool_id)
            .with_order_id(msg.order_id)
            .with_refunds(refunds),
    )?;

    ctx.log_message(format!(
        "IBC interchain swap: {} took deposit order {}-{}",
        msg.sender, msg.pool_id, msg.order_id
    ))
}

pub(crate) fn deposit_coins(deposits: &[DepositAsset]) -> Vec<Coin> {
    deposits.iter().map(|deposit| deposit.balance.clone()).collect()
}

/// Deposit legs of assets custodied by the host chain.
pub(crate) fn local_legs<'d>(
    ctx: &impl InterchainSwapValidationContext,
    pool: &InterchainLiquidityPool,
    deposits: &'d [DepositAsset],
) -> Result<impl Iterator<Item = &'d DepositAsset>, InterchainSwapError> {
    let side = local_side(ctx, pool);
    let mut local = Vec::new();
    for deposit in deposits {
        if pool.find_asset_by_denom(&deposit.balance.denom)?.side == side {
            local.push(deposit);
        }
    }
    Ok(local.into_iter())
}
