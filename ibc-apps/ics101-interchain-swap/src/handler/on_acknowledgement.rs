use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::msgs::MsgMultiAssetWithdraw;
use ibc_app_interchain_swap_types::packet::{InterchainMessageType, InterchainSwapPacketData};
use ibc_app_interchain_swap_types::{OrderStatus, PoolSide, PoolStatus};
use ibc_core::channel::types::acknowledgement::AcknowledgementStatus;
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::prelude::*;

use super::multi_asset_withdraw::settle_withdraw;
use super::on_timeout::{packet_escrow_key, rollback_packet_execute, rollback_packet_validate};
use super::{
    is_local_asset, parse_account, set_order_status, set_pool_status, settle_deposit_order,
};
use crate::context::{InterchainSwapExecutionContext, PoolTokenMintAuthority};
use crate::escrow::{EscrowEntry, EscrowKey};

pub fn process_ack_packet_validate<Ctx>(
    ctx_a: &Ctx,
    packet: &Packet,
    acknowledgement: &AcknowledgementStatus,
) -> Result<(), InterchainSwapError>
where
    Ctx: PoolTokenMintAuthority,
{
    if !acknowledgement.is_successful() {
        rollback_packet_validate(ctx_a, packet)?;
    }
    Ok(())
}

/// Applies the counterparty's verdict on a packet sent from this chain. A success
/// completes the operation, an error rolls it back as a timeout would. Returns the
/// resolved escrow entry, or `None` if the packet's outcome was already applied.
pub fn process_ack_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    packet: &Packet,
    data: &InterchainSwapPacketData,
    acknowledgement: &AcknowledgementStatus,
) -> Result<Option<EscrowEntry>, InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    if !acknowledgement.is_successful() {
        return rollback_packet_execute(ctx_a, packet);
    }

    let key = packet_escrow_key(packet);
    let Some(entry) = ctx_a.escrow_ledger().get(&key).cloned() else {
        ctx_a.log_message(format!(
            "IBC interchain swap: packet {key} already processed"
        ))?;
        return Ok(None);
    };

    match entry.msg_type {
        InterchainMessageType::MakePool => ack_make_pool(ctx_a, &entry)?,
        InterchainMessageType::TakePool => ack_take_pool(ctx_a, &entry)?,
        InterchainMessageType::TakeMultiDeposit => {
            let order_id = entry_order_id(&entry)?;
            let order = ctx_a.order_registry().get(&entry.pool_id, order_id)?.clone();
            order.ensure_pending()?;
            settle_deposit_order(ctx_a, &order)?;
        }
        InterchainMessageType::MultiWithdraw => ack_multi_withdraw(ctx_a, &entry, data)?,
        InterchainMessageType::LeftSwap | InterchainMessageType::RightSwap => {
            ack_swap(ctx_a, &entry, data)?
        }
        InterchainMessageType::Unspecified
        | InterchainMessageType::SingleAssetDeposit
        | InterchainMessageType::MakeMultiDeposit => {}
    }

    ctx_a.escrow_ledger_mut().take(&key);
    ctx_a.log_message(format!(
        "IBC interchain swap: {} packet {key} acknowledged",
        entry.msg_type
    ))?;

    Ok(Some(entry))
}

/// The creator's liquidity stays escrowed for the pool until the pool is taken.
fn ack_make_pool<Ctx>(ctx_a: &mut Ctx, entry: &EscrowEntry) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let status = ctx_a.pool_registry().get(&entry.pool_id)?.status;
    if status == PoolStatus::Created && !entry.refunds.is_empty() {
        ctx_a
            .escrow_ledger_mut()
            .record(EscrowKey::pool(&entry.pool_id), entry.clone());
    }
    Ok(())
}

/// Activates the pool on the taker's chain and mints the taker's share of the
/// initial supply.
fn ack_take_pool<Ctx>(ctx_b: &mut Ctx, entry: &EscrowEntry) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let pool = ctx_b.pool_registry().get(&entry.pool_id)?;
    if pool.status != PoolStatus::Created {
        return Err(InterchainSwapError::PoolAlreadyActive {
            pool_id: pool.id.clone(),
        });
    }

    let supply = pool.total_balance()?;
    let creator_amount = pool.side_weight(PoolSide::Source)?.mul_floor(supply)?;
    let taker_shares = pool.pool_token(
        supply
            .checked_sub(creator_amount)
            .ok_or(InterchainSwapError::Overflow)?,
    );
    let taker = pool.destination_creator.clone();
    let account = parse_account::<Ctx>(&taker)?;
    ctx_b.mint_pool_tokens_validate(&account, &taker_shares)?;

    ctx_b.pool_registry_mut().get_mut(&entry.pool_id)?.supply.amount = supply;
    set_pool_status(ctx_b, &entry.pool_id, PoolStatus::Active)?;
    ctx_b.mint_pool_tokens_execute(&account, &taker_shares)?;

    ctx_b.log_message(format!(
        "IBC interchain swap: pool {} activated, minted {taker_shares} to {taker}",
        entry.pool_id
    ))
}

/// Releases the withdrawn assets custodied here and completes the order.
fn ack_multi_withdraw<Ctx>(
    ctx_a: &mut Ctx,
    entry: &EscrowEntry,
    data: &InterchainSwapPacketData,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let order_id = entry_order_id(entry)?;
    let msg: MsgMultiAssetWithdraw = data.decode_msg()?;
    let state_change = data.decode_state_change()?;

    ctx_a
        .order_registry()
        .get(&entry.pool_id, order_id)?
        .ensure_pending()?;

    settle_withdraw(
        ctx_a,
        &entry.pool_id,
        &state_change.out_tokens,
        &msg.pool_token,
        &msg.receiver,
    )?;

    set_order_status(ctx_a, &entry.pool_id, order_id, OrderStatus::Complete)
}

/// Applies a swap settled by the counterparty to this chain's view of the pool.
/// Swaps settled here already updated the pool when they were sent.
fn ack_swap<Ctx>(
    ctx_a: &mut Ctx,
    entry: &EscrowEntry,
    data: &InterchainSwapPacketData,
) -> Result<(), InterchainSwapError>
where
    Ctx: InterchainSwapExecutionContext,
{
    let state_change = data.decode_state_change()?;
    let (Some(token_in), Some(token_out)) = (
        state_change.in_tokens.first(),
        state_change.out_tokens.first(),
    ) else {
        return Err(InterchainSwapError::MissingStateChange {
            msg_type: data.msg_type.to_string(),
        });
    };

    let pool = ctx_a.pool_registry().get(&entry.pool_id)?;
    if is_local_asset(ctx_a, pool, &token_out.denom)? {
        return Ok(());
    }

    let pool = ctx_a.pool_registry_mut().get_mut(&entry.pool_id)?;
    pool.add_asset(token_in)?;
    pool.subtract_asset(token_out)
}

fn entry_order_id(entry: &EscrowEntry) -> Result<u64, InterchainSwapError> {
    entry
        .order_id
        .ok_or_else(|| InterchainSwapError::MissingStateChange {
            msg_type: entry.msg_type.to_string(),
        })
}
