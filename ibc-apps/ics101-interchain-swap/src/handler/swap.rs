use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::events::SwapEvent;
use ibc_app_interchain_swap_types::msgs::{MsgSwap, SwapType};
use ibc_app_interchain_swap_types::packet::{InterchainSwapPacketData, StateChange};
use ibc_app_interchain_swap_types::{Coin, Decimal};
use ibc_core::primitives::prelude::*;
use ibc_core::router::types::event::ModuleEvent;

use super::{ensure_local_asset, is_local_asset, parse_account, send_swap_packet};
use crate::amm::{max_amount_in, min_amount_out, InterchainMarketMaker};
use crate::context::{InterchainSwapExecutionContext, InterchainSwapValidationContext};
use crate::escrow::{EscrowEntry, Refund};

/// Amounts a swap settles at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapQuote {
    pub token_in: Coin,
    pub token_out: Coin,
}

/// Swaps a local asset against the pool. Equivalent to calling [`swap_validate`],
/// followed by [`swap_execute`].
pub fn swap<Ctx>(ctx: &mut Ctx, msg: MsgSwap) -> Result<SwapQuote, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    swap_validate(ctx, &msg)?;
    swap_execute(ctx, msg)
}

pub fn swap_validate<Ctx>(ctx: &Ctx, msg: &MsgSwap) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapValidationContext,
{
    msg.validate_basic()?;
    ctx.config().ensure_swap_enabled()?;

    let quote = quote_swap(ctx, msg)?;
    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    let (port_id, channel_id) = (&pool.endpoint.port_id, &pool.endpoint.channel_id);

    let sender = parse_account::<Ctx>(&msg.sender)?;
    ctx.escrow_coins_validate(&sender, port_id, channel_id, &quote.token_in)?;

    if is_local_asset(ctx, pool, &quote.token_out.denom)? {
        let recipient = parse_account::<Ctx>(&msg.recipient)?;
        ctx.unescrow_coins_validate(&recipient, port_id, channel_id, &quote.token_out)?;
    }

    ctx.get_next_sequence_send(port_id, channel_id)?;

    Ok(())
}

/// Escrows the input and either settles the swap on this chain, when the output
/// asset is custodied here, or sends the swap packet so the counterparty releases
/// the output.
pub fn swap_execute<Ctx>(ctx: &mut Ctx, msg: MsgSwap) -> Result<SwapQuote, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let quote = quote_swap(ctx, &msg)?;
    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    let endpoint = pool.endpoint.clone();
    let settles_locally = is_local_asset(ctx, pool, &quote.token_out.denom)?;

    let sender = parse_account::<Ctx>(&msg.sender)?;
    ctx.escrow_coins_execute(
        &sender,
        &endpoint.port_id,
        &endpoint.channel_id,
        &quote.token_in,
    )?;

    let entry = EscrowEntry::new(msg.swap_type.into(), &msg.pool_id);
    let entry = if settles_locally {
        let recipient = parse_account::<Ctx>(&msg.recipient)?;
        ctx.unescrow_coins_execute(
            &recipient,
            &endpoint.port_id,
            &endpoint.channel_id,
            &quote.token_out,
        )?;

        let pool = ctx.pool_registry_mut().get_mut(&msg.pool_id)?;
        pool.add_asset(&quote.token_in)?;
        pool.subtract_asset(&quote.token_out)?;

        entry
    } else {
        entry.with_refunds(vec![Refund::Unescrow {
            account: msg.sender.clone(),
            coin: quote.token_in.clone(),
        }])
    };

    let state_change = StateChange {
        in_tokens: vec![quote.token_in.clone()],
        out_tokens: vec![quote.token_out.clone()],
        pool_id: Some(msg.pool_id.clone()),
        ..Default::default()
    };

    send_swap_packet(
        ctx,
        &endpoint,
        InterchainSwapPacketData::new(msg.swap_type.into(), &msg, Some(&state_change)),
        msg.timeout,
        entry,
    )?;

    {
        ctx.log_message(format!(
            "IBC interchain swap: {} swapped {} for {} in pool {}",
            msg.sender, quote.token_in, quote.token_out, msg.pool_id
        ))?;

        let event = SwapEvent {
            pool_id: msg.pool_id,
            swap_type: msg.swap_type,
            sender: msg.sender,
            recipient: msg.recipient,
            token_in: quote.token_in.clone(),
            token_out: quote.token_out.clone(),
        };
        ctx.emit_event(ModuleEvent::from(event))?;
    }

    Ok(quote)
}

/// Prices the swap against the pool's current balances and enforces the slippage
/// bound of the message.
///
/// `LEFT` swaps fix the input and bound the output from below, `RIGHT` swaps fix
/// the output and bound the input from above. When the host provides a reference
/// price, the execution price may not deviate from it by more than the slippage.
pub fn quote_swap<Ctx>(ctx: &Ctx, msg: &MsgSwap) -> Result<SwapQuote, InterchainSwapError>
where
    Ctx: InterchainSwapValidationContext,
{
    let pool = ctx.pool_registry().get(&msg.pool_id)?;
    pool.ensure_active()?;
    ensure_local_asset(ctx, pool, &msg.token_in.denom)?;
    pool.find_asset_by_denom(&msg.token_out.denom)?;

    let amm = InterchainMarketMaker::new(pool);
    let quote = match msg.swap_type {
        SwapType::Left => {
            let token_out = amm.left_swap(&msg.token_in, &msg.token_out.denom)?;
            let min_out = min_amount_out(msg.token_out.amount, msg.slippage)?;
            if token_out.amount < min_out {
                return Err(InterchainSwapError::SlippageExceeded {
                    expected: format!(">={}", msg.token_out.with_amount(min_out)),
                    actual: token_out.to_string(),
                });
            }
            SwapQuote {
                token_in: msg.token_in.clone(),
                token_out,
            }
        }
        SwapType::Right => {
            let token_in = amm.right_swap(&msg.token_in.denom, &msg.token_out)?;
            let max_in = max_amount_in(msg.token_in.amount, msg.slippage)?;
            if token_in.amount > max_in {
                return Err(InterchainSwapError::SlippageExceeded {
                    expected: format!("<={}", msg.token_in.with_amount(max_in)),
                    actual: token_in.to_string(),
                });
            }
            SwapQuote {
                token_in,
                token_out: msg.token_out.clone(),
            }
        }
    };

    if quote.token_out.is_zero() {
        return Err(InterchainSwapError::ZeroAmount);
    }

    if let Some(reference) = ctx.reference_price(&quote.token_in.denom, &quote.token_out.denom) {
        let price = Decimal::from_ratio(quote.token_in.amount, quote.token_out.amount)?;
        let deviation = price.abs_diff(reference).checked_div(reference)?;
        if deviation > Decimal::bps(msg.slippage) {
            return Err(InterchainSwapError::SlippageExceeded {
                expected: reference.to_string(),
                actual: price.to_string(),
            });
        }
    }

    Ok(quote)
}
