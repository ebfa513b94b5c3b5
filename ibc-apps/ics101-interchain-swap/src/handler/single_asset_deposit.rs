use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::events::SingleAssetDepositEvent;
use ibc_app_interchain_swap_types::msgs::MsgSingleAssetDeposit;
use ibc_app_interchain_swap_types::packet::{
    InterchainMessageType, InterchainSwapPacketData, StateChange,
};
use ibc_app_interchain_swap_types::Coin;
use ibc_core::primitives::prelude::*;
use ibc_core::router::types::event::ModuleEvent;

use super::{ensure_local_asset, parse_account, send_swap_packet};
use crate::amm::InterchainMarketMaker;
use crate::context::{
    InterchainSwapExecutionContext, InterchainSwapValidationContext, PoolTokenMintAuthority,
};
use crate::escrow::EscrowEntry;

/// Deposits a single local asset into an active pool and returns the minted pool
/// tokens. Equivalent to calling [`single_asset_deposit_validate`], followed by
/// [`single_asset_deposit_execute`].
pub fn single_asset_deposit<Ctx>(
    ctx: &mut Ctx,
    msg: MsgSingleAssetDeposit,
) -> Result<Coin, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    single_asset_deposit_validate(ctx, &msg)?;
    single_asset_deposit_execute(ctx, msg)
}

pub fn single_asset_deposit_validate<Ctx>(
    ctx: &Ctx,
    msg: &MsgSingleAssetDeposit,
) -> Result<(), InterchainSwapError>
where
    Ctx: PoolTokenMintAuthority,
{
    msg.validate_basic()?;

    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;
    ensure_local_asset(ctx, pool, &msg.token.denom)?;

    let sender = parse_account::<Ctx>(&msg.sender)?;
    ctx.escrow_coins_validate(
        &sender,
        &pool.endpoint.port_id,
        &pool.endpoint.channel_id,
        &msg.token,
    )?;

    let shares = shares_for(ctx, msg)?;
    ctx.mint_pool_tokens_validate(&sender, &shares)?;

    ctx.get_next_sequence_send(&pool.endpoint.port_id, &pool.endpoint.channel_id)?;

    Ok(())
}

pub fn single_asset_deposit_execute<Ctx>(
    ctx: &mut Ctx,
    msg: MsgSingleAssetDeposit,
) -> Result<Coin, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let shares = shares_for(ctx, &msg)?;
    let endpoint = ctx.pool_registry().get(&msg.pool_id)?.endpoint.clone();
    let sender = parse_account::<Ctx>(&msg.sender)?;

    ctx.escrow_coins_execute(&sender, &endpoint.port_id, &endpoint.channel_id, &msg.token)?;

    let pool = ctx.pool_registry_mut().get_mut(&msg.pool_id)?;
    pool.add_asset(&msg.token)?;
    pool.add_supply(shares.amount)?;

    ctx.mint_pool_tokens_execute(&sender, &shares)?;

    let state_change = StateChange {
        in_tokens: vec![msg.token.clone()],
        pool_tokens: vec![shares.clone()],
        pool_id: Some(msg.pool_id.clone()),
        ..Default::default()
    };

    send_swap_packet(
        ctx,
        &endpoint,
        InterchainSwapPacketData::new(
            InterchainMessageType::SingleAssetDeposit,
            &msg,
            Some(&state_change),
        ),
        msg.timeout,
        EscrowEntry::new(InterchainMessageType::SingleAssetDeposit, &msg.pool_id),
    )?;

    {
        ctx.log_message(format!(
            "IBC interchain swap: {} deposited {} into pool {} for {shares}",
            msg.sender, msg.token, msg.pool_id
        ))?;

        let event = SingleAssetDepositEvent {
            pool_id: msg.pool_id,
            sender: msg.sender,
            token: msg.token,
            shares: shares.clone(),
        };
        ctx.emit_event(ModuleEvent::from(event))?;
    }

    Ok(shares)
}

fn shares_for<Ctx>(ctx: &Ctx, msg: &MsgSingleAssetDeposit) -> Result<Coin, InterchainSwapError>
where
    Ctx: InterchainSwapValidationContext,
{
    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    let shares = InterchainMarketMaker::new(pool).deposit_single_asset(&msg.token)?;
    if shares.is_zero() {
        return Err(InterchainSwapError::ZeroAmount);
    }
    Ok(shares)
}
