use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::events::MakePoolEvent;
use ibc_app_interchain_swap_types::msgs::MsgMakePool;
use ibc_app_interchain_swap_types::packet::{InterchainMessageType, InterchainSwapPacketData};
use ibc_app_interchain_swap_types::{
    Amount, ChannelEndpoint, Coin, InterchainLiquidityPool, PoolSide, PoolStatus,
};
use ibc_core::primitives::prelude::*;
use ibc_core::router::types::event::ModuleEvent;

use super::{parse_account, send_swap_packet};
use crate::context::{InterchainSwapExecutionContext, InterchainSwapValidationContext};
use crate::escrow::{EscrowEntry, Refund};

/// Makes a pool. Equivalent to calling [`make_pool_validate`], followed by [`make_pool_execute`].
pub fn make_pool<Ctx>(ctx: &mut Ctx, msg: MsgMakePool) -> Result<String, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    make_pool_validate(ctx, &msg)?;
    make_pool_execute(ctx, msg)
}

/// Validates the pool composition and the creator's funds. If this succeeds, then it
/// is legal to make the pool with [`make_pool_execute`].
pub fn make_pool_validate<Ctx>(ctx: &Ctx, msg: &MsgMakePool) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapValidationContext,
{
    msg.validate_basic()?;
    ctx.config().validate_swap_fee(msg.swap_fee)?;

    let chain_id = ctx.chain_id();
    if msg.source_chain_id != chain_id {
        return Err(InterchainSwapError::InvalidChainId {
            chain_id: msg.source_chain_id.clone(),
            expected: chain_id,
        });
    }

    let bound_port = ctx.get_port()?;
    if msg.source_port != bound_port {
        return Err(InterchainSwapError::InvalidPort {
            port_id: msg.source_port.clone(),
            exp_port_id: bound_port,
        });
    }

    ctx.pool_registry().ensure_available(&msg.pool_id())?;

    ctx.counterparty_channel(&msg.source_port, &msg.source_channel)?;
    ctx.get_next_sequence_send(&msg.source_port, &msg.source_channel)?;

    let creator = parse_account::<Ctx>(&msg.creator)?;
    for asset in msg.liquidity.iter().filter(|a| a.side == PoolSide::Source) {
        ctx.escrow_coins_validate(
            &creator,
            &msg.source_port,
            &msg.source_channel,
            &asset.balance,
        )?;
    }

    Ok(())
}

/// Escrows the creator's liquidity, records the pool and sends the `MAKE_POOL`
/// packet. A prior call to [`make_pool_validate`] MUST have succeeded.
pub fn make_pool_execute<Ctx>(ctx: &mut Ctx, msg: MsgMakePool) -> Result<String, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let (counterparty_port_id, counterparty_channel_id) =
        ctx.counterparty_channel(&msg.source_port, &msg.source_channel)?;

    let pool_id = msg.pool_id();
    let creator = parse_account::<Ctx>(&msg.creator)?;

    let source_liquidity: Vec<Coin> = msg
        .liquidity
        .iter()
        .filter(|asset| asset.side == PoolSide::Source)
        .map(|asset| asset.balance.clone())
        .collect();

    for coin in &source_liquidity {
        ctx.escrow_coins_execute(&creator, &msg.source_port, &msg.source_channel, coin)?;
    }

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
            port_id: msg.source_port.clone(),
            channel_id: msg.source_channel.clone(),
            counterparty_port_id,
            counterparty_channel_id,
        },
    };
    let endpoint = pool.endpoint.clone();
    ctx.pool_registry_mut().insert(pool)?;

    let refunds = source_liquidity
        .iter()
        .map(|coin| Refund::Unescrow {
            account: msg.creator.clone(),
            coin: coin.clone(),
        })
        .collect();

    send_swap_packet(
        ctx,
        &endpoint,
        InterchainSwapPacketData::new(InterchainMessageType::MakePool, &msg, None),
        msg.timeout,
        EscrowEntry::new(InterchainMessageType::MakePool, &pool_id).with_refunds(refunds),
    )?;

    {
        ctx.log_message(format!(
            "IBC interchain swap: {} made pool {pool_id} with {} on {}",
            msg.creator,
            source_liquidity
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            msg.source_chain_id
        ))?;

        let event = MakePoolEvent {
            pool_id: pool_id.clone(),
            creator: msg.creator,
            counterparty_creator: msg.counterparty_creator,
            source_chain_id: msg.source_chain_id,
            destination_chain_id: msg.destination_chain_id,
            liquidity: msg.liquidity.into_iter().map(|asset| asset.balance).collect(),
        };
        ctx.emit_event(ModuleEvent::from(event))?;
    }

    Ok(pool_id)
}
