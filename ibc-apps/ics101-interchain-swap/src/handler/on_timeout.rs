use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::packet::InterchainMessageType;
use ibc_app_interchain_swap_types::{OrderStatus, PoolStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;

use super::{expire_order, refund_execute, refund_validate, set_order_status, set_pool_status};
use crate::context::{InterchainSwapExecutionContext, PoolTokenMintAuthority};
use crate::escrow::{EscrowEntry, EscrowKey};

pub fn process_timeout_packet_validate<Ctx>(
    ctx_a: &Ctx,
    packet: &Packet,
) -> Result<(), InterchainSwapError>
where
    Ctx: PoolTokenMintAuthority,
{
    rollback_packet_validate(ctx_a, packet)
}

/// Gives back everything the timed-out packet took from its senders. Returns the
/// resolved escrow entry, or `None` if the packet's outcome was already applied.
pub fn process_timeout_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    packet: &Packet,
) -> Result<Option<EscrowEntry>, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    rollback_packet_execute(ctx_a, packet)
}

pub(crate) fn packet_escrow_key(packet: &Packet) -> EscrowKey {
    EscrowKey::packet(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a)
}

pub(crate) fn rollback_packet_validate<Ctx>(
    ctx_a: &Ctx,
    packet: &Packet,
) -> Result<(), InterchainSwapError>
where
    Ctx: PoolTokenMintAuthority,
{
    match ctx_a.escrow_ledger().get(&packet_escrow_key(packet)) {
        Some(entry) => refund_validate(
            ctx_a,
            &packet.port_id_on_a,
            &packet.chan_id_on_a,
            &entry.refunds,
        ),
        None => Ok(()),
    }
}

/// Refunds the packet's escrow entry and reverts the state the packet left
/// pending on this chain.
pub(crate) fn rollback_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    packet: &Packet,
) -> Result<Option<EscrowEntry>, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let key = packet_escrow_key(packet);
    let Some(entry) = ctx_a.escrow_ledger().get(&key).cloned() else {
        ctx_a.log_message(format!(
            "IBC interchain swap: packet {key} already processed"
        ))?;
        return Ok(None);
    };

    refund_execute(
        ctx_a,
        &packet.port_id_on_a,
        &packet.chan_id_on_a,
        &entry.refunds,
    )?;

    match (entry.msg_type, entry.order_id) {
        (InterchainMessageType::MakePool, _) => {
            set_pool_status(ctx_a, &entry.pool_id, PoolStatus::Failed)?
        }
        (InterchainMessageType::MakeMultiDeposit, Some(order_id)) => {
            let order = ctx_a.order_registry().get(&entry.pool_id, order_id)?.clone();
            if order.is_pending() {
                expire_order(ctx_a, &order)?;
            }
        }
        (
            InterchainMessageType::TakeMultiDeposit | InterchainMessageType::MultiWithdraw,
            Some(order_id),
        ) => {
            if ctx_a
                .order_registry()
                .get(&entry.pool_id, order_id)?
                .is_pending()
            {
                set_order_status(ctx_a, &entry.pool_id, order_id, OrderStatus::Expired)?;
            }
        }
        _ => {}
    }

    ctx_a.escrow_ledger_mut().take(&key);

    Ok(Some(entry))
}
