use ibc_app_interchain_swap_types::ack::AckResult;
use ibc_app_interchain_swap_types::packet::{InterchainMessageType, InterchainSwapPacketData};
use ibc_core::channel::types::acknowledgement::{Acknowledgement, AcknowledgementStatus};
use ibc_core::channel::types::packet::Packet;
use ibc_core::primitives::Signer;

use crate::context::MockSwapContext;
use crate::fixtures::core::channel::extract_swap_packet;
use crate::fixtures::core::signer::dummy_account_id;
use crate::relayer::error::RelayerError;
use crate::relayer::utils::{decode_acknowledgement, SwapRelayerOps};

/// What became of a relayed packet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketOutcome {
    /// Received by the counterparty, which wrote this acknowledgement.
    Acknowledged(AcknowledgementStatus),
    /// Expired before it could be received.
    TimedOut,
}

#[derive(Clone, Debug)]
pub struct RelayedPacket {
    pub packet: Packet,
    pub outcome: PacketOutcome,
}

impl RelayedPacket {
    pub fn msg_type(&self) -> InterchainMessageType {
        InterchainSwapPacketData::from_bytes(&self.packet.data)
            .map(|data| data.msg_type)
            .unwrap_or(InterchainMessageType::Unspecified)
    }

    pub fn is_success(&self) -> bool {
        matches!(&self.outcome, PacketOutcome::Acknowledged(ack) if ack.is_successful())
    }

    /// Result carried by a successful acknowledgement.
    pub fn ack_result(&self) -> Option<AckResult> {
        match &self.outcome {
            PacketOutcome::Acknowledged(AcknowledgementStatus::Success(value)) => {
                AckResult::decode(value).ok()
            }
            _ => None,
        }
    }

    /// Message of an error acknowledgement.
    pub fn ack_error(&self) -> Option<String> {
        match &self.outcome {
            PacketOutcome::Acknowledged(AcknowledgementStatus::Error(value)) => {
                Some(value.to_string())
            }
            _ => None,
        }
    }
}

/// Two chains joined by an interchain swap channel, and the relayer between them.
///
/// Packets are relayed in the order they were sent. A packet whose timeout the
/// receiving chain has reached is timed out on its sender instead of delivered.
#[derive(Debug)]
pub struct SwapRelayer {
    ctx_a: MockSwapContext,
    ctx_b: MockSwapContext,
    signer: Signer,
}

impl SwapRelayer {
    pub fn new(ctx_a: MockSwapContext, ctx_b: MockSwapContext) -> Self {
        Self {
            ctx_a,
            ctx_b,
            signer: dummy_account_id(),
        }
    }

    pub fn get_ctx_a(&self) -> &MockSwapContext {
        &self.ctx_a
    }

    pub fn get_ctx_b(&self) -> &MockSwapContext {
        &self.ctx_b
    }

    pub fn get_ctx_a_mut(&mut self) -> &mut MockSwapContext {
        &mut self.ctx_a
    }

    pub fn get_ctx_b_mut(&mut self) -> &mut MockSwapContext {
        &mut self.ctx_b
    }

    /// Runs the channel opening handshake from `A`.
    pub fn open_channel_on_a(&mut self) -> Result<(), RelayerError> {
        SwapRelayerOps::open_channel_on_a(&mut self.ctx_a, &mut self.ctx_b)
    }

    /// Advances both chains by `count` blocks.
    pub fn advance_blocks(&mut self, count: u64) {
        self.ctx_a.advance_blocks(count);
        self.ctx_b.advance_blocks(count);
    }

    /// Relays every packet sent by `A`, then delivers the acknowledgement or
    /// timeout of each back to `A`.
    pub fn relay_packets_a_to_b(&mut self) -> Result<Vec<RelayedPacket>, RelayerError> {
        relay_packets(&mut self.ctx_a, &mut self.ctx_b, &self.signer)
    }

    /// Relays every packet sent by `B`, then delivers the acknowledgement or
    /// timeout of each back to `B`.
    pub fn relay_packets_b_to_a(&mut self) -> Result<Vec<RelayedPacket>, RelayerError> {
        relay_packets(&mut self.ctx_b, &mut self.ctx_a, &self.signer)
    }

    /// Relays in both directions until no packet is left in flight.
    pub fn relay_all(&mut self) -> Result<Vec<RelayedPacket>, RelayerError> {
        let mut relayed = Vec::new();
        loop {
            let from_a = self.relay_packets_a_to_b()?;
            let from_b = self.relay_packets_b_to_a()?;
            if from_a.is_empty() && from_b.is_empty() {
                return Ok(relayed);
            }
            relayed.extend(from_a);
            relayed.extend(from_b);
        }
    }

    /// Delivers the packets sent by `A` to `B` without returning their
    /// acknowledgements, which the caller may deliver later with
    /// [`Self::ack_packet_on_a`].
    pub fn recv_packets_a_to_b(&mut self) -> Vec<(Packet, Acknowledgement)> {
        self.ctx_a
            .take_outbound_packets()
            .into_iter()
            .map(extract_swap_packet)
            .map(|packet| {
                let ack = SwapRelayerOps::recv_packet_on_b(&mut self.ctx_b, &packet);
                (packet, ack)
            })
            .collect()
    }

    /// Same as [`Self::recv_packets_a_to_b`], from `B` to `A`.
    pub fn recv_packets_b_to_a(&mut self) -> Vec<(Packet, Acknowledgement)> {
        self.ctx_b
            .take_outbound_packets()
            .into_iter()
            .map(extract_swap_packet)
            .map(|packet| {
                let ack = SwapRelayerOps::recv_packet_on_b(&mut self.ctx_a, &packet);
                (packet, ack)
            })
            .collect()
    }

    pub fn ack_packet_on_a(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
    ) -> Result<(), RelayerError> {
        SwapRelayerOps::ack_packet_on_a(&mut self.ctx_a, packet, acknowledgement, &self.signer)
    }

    pub fn ack_packet_on_b(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
    ) -> Result<(), RelayerError> {
        SwapRelayerOps::ack_packet_on_a(&mut self.ctx_b, packet, acknowledgement, &self.signer)
    }

    /// Takes the packets sent by `A` out of flight and times them out on `A`,
    /// whatever their timeout. Returns the timed-out packets.
    pub fn timeout_packets_on_a(&mut self) -> Result<Vec<Packet>, RelayerError> {
        let packets: Vec<Packet> = self
            .ctx_a
            .take_outbound_packets()
            .into_iter()
            .map(extract_swap_packet)
            .collect();
        for packet in &packets {
            self.timeout_packet_on_a(packet)?;
        }
        Ok(packets)
    }

    /// Same as [`Self::timeout_packets_on_a`], for the packets sent by `B`.
    pub fn timeout_packets_on_b(&mut self) -> Result<Vec<Packet>, RelayerError> {
        let packets: Vec<Packet> = self
            .ctx_b
            .take_outbound_packets()
            .into_iter()
            .map(extract_swap_packet)
            .collect();
        for packet in &packets {
            self.timeout_packet_on_b(packet)?;
        }
        Ok(packets)
    }

    pub fn timeout_packet_on_a(&mut self, packet: &Packet) -> Result<(), RelayerError> {
        SwapRelayerOps::timeout_packet_on_a(&mut self.ctx_a, packet, &self.signer)
    }

    pub fn timeout_packet_on_b(&mut self, packet: &Packet) -> Result<(), RelayerError> {
        SwapRelayerOps::timeout_packet_on_a(&mut self.ctx_b, packet, &self.signer)
    }
}

fn relay_packets(
    ctx_a: &mut MockSwapContext,
    ctx_b: &mut MockSwapContext,
    signer: &Signer,
) -> Result<Vec<RelayedPacket>, RelayerError> {
    let mut relayed = Vec::new();

    for outbound in ctx_a.take_outbound_packets() {
        let timed_out = outbound
            .timeout
            .has_expired(ctx_b.host_height, ctx_b.host_timestamp);
        let packet = extract_swap_packet(outbound);

        let outcome = if timed_out {
            SwapRelayerOps::timeout_packet_on_a(ctx_a, &packet, signer)?;
            PacketOutcome::TimedOut
        } else {
            let acknowledgement = SwapRelayerOps::recv_packet_on_b(ctx_b, &packet);
            let status = decode_acknowledgement(&packet, &acknowledgement)?;
            SwapRelayerOps::ack_packet_on_a(ctx_a, &packet, &acknowledgement, signer)?;
            PacketOutcome::Acknowledged(status)
        };

        tracing::debug!(
            from = %ctx_a.host_chain_id,
            to = %ctx_b.host_chain_id,
            sequence = %packet.seq_on_a,
            ?outcome,
            "relayed interchain swap packet"
        );
        relayed.push(RelayedPacket { packet, outcome });
    }

    Ok(relayed)
}
