use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::Order;
use ibc_core::primitives::prelude::*;

use super::expire_order;
use crate::context::InterchainSwapExecutionContext;

/// Expires every pending order whose timeout the host has reached, refunding the
/// liquidity still escrowed for it. Orders with a packet in flight are left to
/// that packet's acknowledgement or timeout. Meant to run once per block.
///
/// Returns the keys of the expired orders.
pub fn expire_orders<Ctx>(ctx: &mut Ctx) -> Result<Vec<String>, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let (height, timestamp) = (ctx.host_height(), ctx.host_timestamp());
    let ledger = ctx.escrow_ledger();

    let expired: Vec<Order> = ctx
        .order_registry()
        .pending()
        .filter(|order| order.has_expired(height, timestamp))
        .filter(|order| !ledger.has_packet_in_flight(&order.pool_id, order.id))
        .cloned()
        .collect();

    let mut keys = Vec::with_capacity(expired.len());
    for order in expired {
        expire_order(ctx, &order)?;
        keys.push(order.key());
    }

    if !keys.is_empty() {
        ctx.log_message(format!(
            "IBC interchain swap: expired orders {}",
            keys.join(",")
        ))?;
    }

    Ok(keys)
}
