use ibc_app_interchain_swap::context::OutboundPacket;
use ibc_core::channel::types::packet::Packet;
use ibc_core::channel::types::timeout::{TimeoutHeight, TimeoutTimestamp};
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use typed_builder::TypedBuilder;

use crate::fixtures::core::context::swap_port;

/// Configuration of the `Packet` type for building dummy packets.
///
/// Timeouts of interchain swap packets are enforced by the relayer against the
/// receiving host, so the built packets never time out by themselves.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = Packet))]
pub struct PacketConfig {
    #[builder(default = Sequence::from(1))]
    pub seq_on_a: Sequence,
    #[builder(default = swap_port())]
    pub port_id_on_a: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_a: ChannelId,
    #[builder(default = swap_port())]
    pub port_id_on_b: PortId,
    #[builder(default = ChannelId::zero())]
    pub chan_id_on_b: ChannelId,
    #[builder(default)]
    pub data: Vec<u8>,
}

impl From<PacketConfig> for Packet {
    fn from(config: PacketConfig) -> Self {
        Packet {
            seq_on_a: config.seq_on_a,
            port_id_on_a: config.port_id_on_a,
            chan_id_on_a: config.chan_id_on_a,
            port_id_on_b: config.port_id_on_b,
            chan_id_on_b: config.chan_id_on_b,
            data: config.data,
            timeout_height_on_b: TimeoutHeight::Never,
            timeout_timestamp_on_b: TimeoutTimestamp::Never,
        }
    }
}

/// Returns the channel packet committing the application's outbound packet.
pub fn extract_swap_packet(outbound: OutboundPacket) -> Packet {
    PacketConfig::builder()
        .seq_on_a(outbound.sequence)
        .port_id_on_a(outbound.port_id_on_a)
        .chan_id_on_a(outbound.chan_id_on_a)
        .port_id_on_b(outbound.port_id_on_b)
        .chan_id_on_b(outbound.chan_id_on_b)
        .data(outbound.data)
        .build()
}
