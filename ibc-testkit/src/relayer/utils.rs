use ibc_app_interchain_swap::module::{
    on_acknowledgement_packet_execute, on_acknowledgement_packet_validate,
    on_chan_open_ack_execute, on_chan_open_ack_validate, on_chan_open_confirm_execute,
    on_chan_open_confirm_validate, on_chan_open_init_execute, on_chan_open_init_validate,
    on_chan_open_try_execute, on_chan_open_try_validate, on_recv_packet_execute,
    on_timeout_packet_execute, on_timeout_packet_validate,
};
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::VERSION;
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::channel::{Counterparty, Order};
use ibc_core::channel::types::packet::Packet;
use ibc_core::channel::types::Version;
use ibc_core::host::types::identifiers::ConnectionId;
use ibc_core::primitives::Signer;
use ibc_core::router::types::module::ModuleExtras;

use crate::context::MockSwapContext;
use crate::relayer::error::RelayerError;

/// Implements the relayer operations of one direction: packets travel from `A` to
/// `B` and their acknowledgements or timeouts come back to `A`. The variable names
/// follow the IBC message fields.
///
/// For the opposite direction, pass the contexts in swapped order.
#[derive(Debug, Default)]
pub struct SwapRelayerOps;

impl SwapRelayerOps {
    /// Runs the channel opening handshake callbacks on both ends of the channels
    /// configured in the contexts.
    pub fn open_channel_on_a(
        ctx_a: &mut MockSwapContext,
        ctx_b: &mut MockSwapContext,
    ) -> Result<(), RelayerError> {
        let connection_hops = [ConnectionId::zero()];
        let version = Version::new(VERSION.to_string());

        let ends_a: Vec<_> = ctx_a.channels.clone().into_iter().collect();
        for ((port_id_on_a, chan_id_on_a), (port_id_on_b, chan_id_on_b)) in ends_a {
            let counterparty_of_a = Counterparty::new(port_id_on_b.clone(), None);
            on_chan_open_init_validate(
                &*ctx_a,
                Order::Unordered,
                &connection_hops,
                &port_id_on_a,
                &chan_id_on_a,
                &counterparty_of_a,
                &version,
            )
            .map_err(|error| callback_failed(ctx_a, error))?;
            let (extras, version_on_a) = on_chan_open_init_execute(
                ctx_a,
                Order::Unordered,
                &connection_hops,
                &port_id_on_a,
                &chan_id_on_a,
                &counterparty_of_a,
                &version,
            )
            .map_err(|error| callback_failed(ctx_a, error))?;
            ctx_a.record_extras(extras);

            let counterparty_of_b =
                Counterparty::new(port_id_on_a.clone(), Some(chan_id_on_a.clone()));
            on_chan_open_try_validate(
                &*ctx_b,
                Order::Unordered,
                &connection_hops,
                &port_id_on_b,
                &chan_id_on_b,
                &counterparty_of_b,
                &version_on_a,
            )
            .map_err(|error| callback_failed(ctx_b, error))?;
            let (extras, version_on_b) = on_chan_open_try_execute(
                ctx_b,
                Order::Unordered,
                &connection_hops,
                &port_id_on_b,
                &chan_id_on_b,
                &counterparty_of_b,
                &version_on_a,
            )
            .map_err(|error| callback_failed(ctx_b, error))?;
            ctx_b.record_extras(extras);

            on_chan_open_ack_validate(&*ctx_a, &port_id_on_a, &chan_id_on_a, &version_on_b)
                .map_err(|error| callback_failed(ctx_a, error))?;
            let extras =
                on_chan_open_ack_execute(ctx_a, &port_id_on_a, &chan_id_on_a, &version_on_b)
                    .map_err(|error| callback_failed(ctx_a, error))?;
            ctx_a.record_extras(extras);

            on_chan_open_confirm_validate(&*ctx_b, &port_id_on_b, &chan_id_on_b)
                .map_err(|error| callback_failed(ctx_b, error))?;
            let extras = on_chan_open_confirm_execute(ctx_b, &port_id_on_b, &chan_id_on_b)
                .map_err(|error| callback_failed(ctx_b, error))?;
            ctx_b.record_extras(extras);
        }

        Ok(())
    }

    /// Delivers `packet` to `B` and returns the acknowledgement written by `B`.
    pub fn recv_packet_on_b(ctx_b: &mut MockSwapContext, packet: &Packet) -> Acknowledgement {
        let (extras, acknowledgement) = on_recv_packet_execute(ctx_b, packet);
        ctx_b.record_extras(extras);
        acknowledgement
    }

    /// Delivers the acknowledgement of `packet` back to `A`.
    pub fn ack_packet_on_a(
        ctx_a: &mut MockSwapContext,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        signer: &Signer,
    ) -> Result<(), RelayerError> {
        on_acknowledgement_packet_validate(&*ctx_a, packet, acknowledgement, signer)
            .map_err(|error| callback_failed(ctx_a, error))?;

        let (extras, result) =
            on_acknowledgement_packet_execute(ctx_a, packet, acknowledgement, signer);
        finish_callback(ctx_a, extras, result)
    }

    /// Notifies `A` that `packet` timed out on `B`.
    pub fn timeout_packet_on_a(
        ctx_a: &mut MockSwapContext,
        packet: &Packet,
        signer: &Signer,
    ) -> Result<(), RelayerError> {
        on_timeout_packet_validate(&*ctx_a, packet, signer)
            .map_err(|error| callback_failed(ctx_a, error))?;

        let (extras, result) = on_timeout_packet_execute(ctx_a, packet, signer);
        finish_callback(ctx_a, extras, result)
    }
}

/// Decodes an acknowledgement written by the interchain swap module.
pub fn decode_acknowledgement(
    packet: &Packet,
    acknowledgement: &Acknowledgement,
) -> Result<AcknowledgementStatus, RelayerError> {
    serde_json::from_slice::<AcknowledgementStatus>(acknowledgement.as_ref()).map_err(|_| {
        RelayerError::InvalidAcknowledgement {
            sequence: packet.seq_on_a,
        }
    })
}

fn finish_callback(
    ctx: &MockSwapContext,
    extras: ModuleExtras,
    result: Result<(), InterchainSwapError>,
) -> Result<(), RelayerError> {
    ctx.record_extras(extras);
    result.map_err(|error| callback_failed(ctx, error))
}

fn callback_failed(ctx: &MockSwapContext, error: InterchainSwapError) -> RelayerError {
    RelayerError::CallbackFailed {
        chain_id: ctx.host_chain_id.clone(),
        error,
    }
}
