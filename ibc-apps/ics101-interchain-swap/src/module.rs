use ibc_app_interchain_swap_types::ack::{ack_error, ack_success};
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::events::{AckEvent, RecvEvent, TimeoutEvent};
use ibc_app_interchain_swap_types::packet::InterchainSwapPacketData;
use ibc_app_interchain_swap_types::VERSION;
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::channel::{Counterparty, Order};
use ibc_core::channel::types::packet::Packet;
use ibc_core::channel::types::Version;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::module::ModuleExtras;

use crate::context::{
    InterchainSwapExecutionContext, InterchainSwapValidationContext, PoolTokenMintAuthority,
};
use crate::handler::{
    packet_pool_id, process_ack_packet_execute, process_ack_packet_validate,
    process_recv_packet_execute, process_timeout_packet_execute, process_timeout_packet_validate,
};

fn verify_version(version: &Version) -> Result<(), InterchainSwapError> {
    if version.as_str() != VERSION {
        return Err(InterchainSwapError::InvalidVersion {
            version: version.as_str().to_string(),
            expected: VERSION.to_string(),
        });
    }
    Ok(())
}

fn verify_unordered(order: Order) -> Result<(), InterchainSwapError> {
    if order != Order::Unordered {
        return Err(InterchainSwapError::ChannelNotUnordered {
            expect_order: Order::Unordered,
            got_order: order,
        });
    }
    Ok(())
}

pub fn on_chan_open_init_validate(
    ctx: &impl InterchainSwapValidationContext,
    order: Order,
    _connection_hops: &[ConnectionId],
    port_id: &PortId,
    _channel_id: &ChannelId,
    _counterparty: &Counterparty,
    version: &Version,
) -> Result<(), InterchainSwapError> {
    verify_unordered(order)?;

    let bound_port = ctx.get_port()?;
    if port_id != &bound_port {
        return Err(InterchainSwapError::InvalidPort {
            port_id: port_id.clone(),
            exp_port_id: bound_port,
        });
    }

    if !version.is_empty() {
        verify_version(version)?;
    }

    Ok(())
}

pub fn on_chan_open_init_execute(
    _ctx: &mut impl InterchainSwapExecutionContext,
    _order: Order,
    _connection_hops: &[ConnectionId],
    _port_id: &PortId,
    _channel_id: &ChannelId,
    _counterparty: &Counterparty,
    _version: &Version,
) -> Result<(ModuleExtras, Version), InterchainSwapError> {
    Ok((ModuleExtras::empty(), Version::new(VERSION.to_string())))
}

pub fn on_chan_open_try_validate(
    ctx: &impl InterchainSwapValidationContext,
    order: Order,
    _connection_hops: &[ConnectionId],
    port_id: &PortId,
    _channel_id: &ChannelId,
    _counterparty: &Counterparty,
    counterparty_version: &Version,
) -> Result<(), InterchainSwapError> {
    verify_unordered(order)?;

    let bound_port = ctx.get_port()?;
    if port_id != &bound_port {
        return Err(InterchainSwapError::InvalidPort {
            port_id: port_id.clone(),
            exp_port_id: bound_port,
        });
    }

    verify_version(counterparty_version)
}

pub fn on_chan_open_try_execute(
    _ctx: &mut impl InterchainSwapExecutionContext,
    _order: Order,
    _connection_hops: &[ConnectionId],
    _port_id: &PortId,
    _channel_id: &ChannelId,
    _counterparty: &Counterparty,
    _counterparty_version: &Version,
) -> Result<(ModuleExtras, Version), InterchainSwapError> {
    Ok((ModuleExtras::empty(), Version::new(VERSION.to_string())))
}

pub fn on_chan_open_ack_validate(
    _ctx: &impl InterchainSwapValidationContext,
    _port_id: &PortId,
    _channel_id: &ChannelId,
    counterparty_version: &Version,
) -> Result<(), InterchainSwapError> {
    verify_version(counterparty_version)
}

pub fn on_chan_open_ack_execute(
    _ctx: &mut impl InterchainSwapExecutionContext,
    _port_id: &PortId,
    _channel_id: &ChannelId,
    _counterparty_version: &Version,
) -> Result<ModuleExtras, InterchainSwapError> {
    Ok(ModuleExtras::empty())
}

pub fn on_chan_open_confirm_validate(
    _ctx: &impl InterchainSwapValidationContext,
    _port_id: &PortId,
    _channel_id: &ChannelId,
) -> Result<(), InterchainSwapError> {
    Ok(())
}

pub fn on_chan_open_confirm_execute(
    _ctx: &mut impl InterchainSwapExecutionContext,
    _port_id: &PortId,
    _channel_id: &ChannelId,
) -> Result<ModuleExtras, InterchainSwapError> {
    Ok(ModuleExtras::empty())
}

pub fn on_chan_close_init_validate(
    _ctx: &impl InterchainSwapValidationContext,
    _port_id: &PortId,
    _channel_id: &ChannelId,
) -> Result<(), InterchainSwapError> {
    Err(InterchainSwapError::CantCloseChannel)
}

pub fn on_chan_close_init_execute(
    _ctx: &mut impl InterchainSwapExecutionContext,
    _port_id: &PortId,
    _channel_id: &ChannelId,
) -> Result<ModuleExtras, InterchainSwapError> {
    Err(InterchainSwapError::CantCloseChannel)
}

pub fn on_chan_close_confirm_validate(
    _ctx: &impl InterchainSwapValidationContext,
    _port_id: &PortId,
    _channel_id: &ChannelId,
) -> Result<(), InterchainSwapError> {
    Err(InterchainSwapError::CantCloseChannel)
}

pub fn on_chan_close_confirm_execute(
    _ctx: &mut impl InterchainSwapExecutionContext,
    _port_id: &PortId,
    _channel_id: &ChannelId,
) -> Result<ModuleExtras, InterchainSwapError> {
    Err(InterchainSwapError::CantCloseChannel)
}

pub fn on_recv_packet_execute(
    ctx_b: &mut impl InterchainSwapExecutionContext,
    packet: &Packet,
) -> (ModuleExtras, Acknowledgement) {
    let Ok(data) = InterchainSwapPacketData::from_bytes(&packet.data) else {
        let ack = ack_error(InterchainSwapError::PacketDataDeserialization);
        return (ModuleExtras::empty(), ack.into());
    };

    let ack = match process_recv_packet_execute(ctx_b, packet, &data) {
        Ok(result) => ack_success(&result),
        Err(error) => ack_error(error),
    };

    let recv_event = RecvEvent {
        msg_type: data.msg_type,
        pool_id: packet_pool_id(&data),
        success: ack.is_successful(),
    };
    let extras = ModuleExtras {
        events: vec![recv_event.into()],
        log: Vec::new(),
    };

    (extras, ack.into())
}

pub fn on_acknowledgement_packet_validate<Ctx>(
    ctx: &Ctx,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    _relayer: &Signer,
) -> Result<(), InterchainSwapError>
where
    Ctx: PoolTokenMintAuthority,
{
    InterchainSwapPacketData::from_bytes(&packet.data)?;

    let acknowledgement = serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref())
        .map_err(|_| InterchainSwapError::AckDeserialization)?;

    process_ack_packet_validate(ctx, packet, &acknowledgement)
}

pub fn on_acknowledgement_packet_execute(
    ctx: &mut impl InterchainSwapExecutionContext,
    packet: &Packet,
    acknowledgement: &Acknowledgement,
    _relayer: &Signer,
) -> (ModuleExtras, Result<(), InterchainSwapError>) {
    let Ok(data) = InterchainSwapPacketData::from_bytes(&packet.data) else {
        return (
            ModuleExtras::empty(),
            Err(InterchainSwapError::PacketDataDeserialization),
        );
    };

    let Ok(acknowledgement) =
        serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref())
    else {
        return (
            ModuleExtras::empty(),
            Err(InterchainSwapError::AckDeserialization),
        );
    };

    match process_ack_packet_execute(ctx, packet, &data, &acknowledgement) {
        Ok(Some(entry)) => {
            let ack_event = AckEvent {
                msg_type: entry.msg_type,
                pool_id: entry.pool_id,
                acknowledgement,
            };
            let extras = ModuleExtras {
                events: vec![ack_event.into()],
                log: Vec::new(),
            };
            (extras, Ok(()))
        }
        Ok(None) => (ModuleExtras::empty(), Ok(())),
        Err(err) => (ModuleExtras::empty(), Err(err)),
    }
}

pub fn on_timeout_packet_validate<Ctx>(
    ctx: &Ctx,
    packet: &Packet,
    _relayer: &Signer,
) -> Result<(), InterchainSwapError>
where
    Ctx: PoolTokenMintAuthority,
{
    InterchainSwapPacketData::from_bytes(&packet.data)?;

    process_timeout_packet_validate(ctx, packet)
}

pub fn on_timeout_packet_execute(
    ctx: &mut impl InterchainSwapExecutionContext,
    packet: &Packet,
    _relayer: &Signer,
) -> (ModuleExtras, Result<(), InterchainSwapError>) {
    if InterchainSwapPacketData::from_bytes(&packet.data).is_err() {
        return (
            ModuleExtras::empty(),
            Err(InterchainSwapError::PacketDataDeserialization),
        );
    }

    match process_timeout_packet_execute(ctx, packet) {
        Ok(Some(entry)) => {
            let timeout_event = TimeoutEvent {
                msg_type: entry.msg_type,
                pool_id: entry.pool_id,
                refunded: !entry.refunds.is_empty(),
            };
            let extras = ModuleExtras {
                events: vec![timeout_event.into()],
                log: Vec::new(),
            };
            (extras, Ok(()))
        }
        Ok(None) => (ModuleExtras::empty(), Ok(())),
        Err(err) => (ModuleExtras::empty(), Err(err)),
    }
}
