use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::events::TakePoolEvent;
use ibc_app_interchain_swap_types::msgs::MsgTakePool;
use ibc_app_interchain_swap_types::packet::{
    InterchainMessageType, InterchainSwapPacketData, StateChange,
};
use ibc_app_interchain_swap_types::{Coin, PoolSide, PoolStatus};
use ibc_core::primitives::prelude::*;
use ibc_core::router::types::event::ModuleEvent;

use super::{parse_account, send_swap_packet};
use crate::context::{InterchainSwapExecutionContext, InterchainSwapValidationContext};
use crate::escrow::{EscrowEntry, Refund};

/// Takes a pool made on the counterparty chain. Equivalent to calling
/// [`take_pool_validate`], followed by [`take_pool_execute`].
pub fn take_pool<Ctx>(ctx: &mut Ctx, msg: MsgTakePool) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    take_pool_validate(ctx, &msg)?;
    take_pool_execute(ctx, msg)
}

pub fn take_pool_validate<Ctx>(ctx: &Ctx, msg: &MsgTakePool) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapValidationContext,
{
    msg.validate_basic()?;

    let pool = ctx.pool_registry().get(&msg.pool_id)?;
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

    if msg.creator != pool.destination_creator {
        return Err(InterchainSwapError::InvalidTaker {
            account: msg.creator.to_string(),
        });
    }
    if msg.counter_creator != pool.source_creator {
        return Err(InterchainSwapError::InvalidTaker {
            account: msg.counter_creator.to_string(),
        });
    }

    let chain_id = ctx.chain_id();
    if pool.destination_chain_id != chain_id {
        return Err(InterchainSwapError::InvalidChainId {
            chain_id: pool.destination_chain_id.clone(),
            expected: chain_id,
        });
    }

    ctx.get_next_sequence_send(&pool.endpoint.port_id, &pool.endpoint.channel_id)?;

    let taker = parse_account::<Ctx>(&msg.creator)?;
    for asset in pool.assets_on_side(PoolSide::Destination) {
        ctx.escrow_coins_validate(
            &taker,
            &pool.endpoint.port_id,
            &pool.endpoint.channel_id,
            &asset.balance,
        )?;
    }

    Ok(())
}

/// Escrows the taker's side of the pool and sends the `TAKE_POOL` packet. The pool
/// stays `CREATED` on this chain until the counterparty acknowledges.
pub fn take_pool_execute<Ctx>(ctx: &mut Ctx, msg: MsgTakePool) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    let endpoint = pool.endpoint.clone();
    let liquidity: Vec<Coin> = pool
        .assets_on_side(PoolSide::Destination)
        .map(|asset| asset.balance.clone())
        .collect();

    let taker = parse_account::<Ctx>(&msg.creator)?;
    for coin in &liquidity {
        ctx.escrow_coins_execute(&taker, &endpoint.port_id, &endpoint.channel_id, coin)?;
    }

    let refunds = liquidity
        .iter()
        .map(|coin| Refund::Unescrow {
            account: msg.creator.clone(),
            coin: coin.clone(),
        })
        .collect();

    let state_change = StateChange {
        pool_id: Some(msg.pool_id.clone()),
        ..Default::default()
    };

    send_swap_packet(
        ctx,
        &endpoint,
        InterchainSwapPacketData::new(InterchainMessageType::TakePool, &msg, Some(&state_change)),
        msg.timeout,
        EscrowEntry::new(InterchainMessageType::TakePool, &msg.pool_id).with_refunds(refunds),
    )?;

    {
        ctx.log_message(format!(
            "IBC interchain swap: {} took pool {}",
            msg.creator, msg.pool_id
        ))?;

        let event = TakePoolEvent {
            pool_id: msg.pool_id,
            taker: msg.creator,
            liquidity,
        };
        ctx.emit_event(ModuleEvent::from(event))?;
    }

    Ok(())
}
