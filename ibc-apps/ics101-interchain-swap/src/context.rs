//! Defines the main context traits and IBC module callbacks

use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::{Coin, Decimal, InterchainSwapConfig, Timeout};
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

use crate::escrow::EscrowLedger;
use crate::registry::{OrderRegistry, PoolRegistry};

/// A packet ready to be committed by the host's channel layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutboundPacket {
    pub sequence: Sequence,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub data: Vec<u8>,
    pub timeout: Timeout,
}

/// Methods required in interchain swap validation, to be implemented by the host
pub trait InterchainSwapValidationContext {
    type AccountId: TryFrom<Signer>;

    /// get_port returns the portID for the interchain swap module.
    fn get_port(&self) -> Result<PortId, InterchainSwapError>;

    /// Identifier of the host chain, compared against the chain ids recorded on pools.
    fn chain_id(&self) -> String;

    fn config(&self) -> &InterchainSwapConfig;

    fn host_height(&self) -> u64;

    /// Host time in nanoseconds since the Unix epoch.
    fn host_timestamp(&self) -> u64;

    /// Returns the port and channel at the other end of the given channel.
    fn counterparty_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(PortId, ChannelId), InterchainSwapError>;

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, InterchainSwapError>;

    fn pool_registry(&self) -> &PoolRegistry;

    fn order_registry(&self) -> &OrderRegistry;

    fn escrow_ledger(&self) -> &EscrowLedger;

    /// Validates that the tokens can be escrowed successfully
    fn escrow_coins_validate(
        &self,
        from_account: &Self::AccountId,
        port_id: &PortId,
        channel_id: &ChannelId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError>;

    /// Validates that the tokens can be unescrowed successfully
    fn unescrow_coins_validate(
        &self,
        to_account: &Self::AccountId,
        port_id: &PortId,
        channel_id: &ChannelId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError>;

    /// Price of `denom_out` in `denom_in` from an external source.
    /// Implement only if the host chain runs a price oracle.
    fn reference_price(&self, _denom_in: &str, _denom_out: &str) -> Option<Decimal> {
        None
    }
}

/// Authority over the supply of pool tokens.
pub trait PoolTokenMintAuthority: InterchainSwapValidationContext {
    /// Validates the receiver account and the pool token
    fn mint_pool_tokens_validate(
        &self,
        account: &Self::AccountId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError>;

    /// Validates the holder account and the pool token
    fn burn_pool_tokens_validate(
        &self,
        account: &Self::AccountId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError>;

    fn mint_pool_tokens_execute(
        &mut self,
        account: &Self::AccountId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError>;

    fn burn_pool_tokens_execute(
        &mut self,
        account: &Self::AccountId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError>;
}

/// Methods required in interchain swap execution, to be implemented by the host
pub trait InterchainSwapExecutionContext: PoolTokenMintAuthority {
    fn pool_registry_mut(&mut self) -> &mut PoolRegistry;

    fn order_registry_mut(&mut self) -> &mut OrderRegistry;

    fn escrow_ledger_mut(&mut self) -> &mut EscrowLedger;

    /// Escrows the tokens
    fn escrow_coins_execute(
        &mut self,
        from_account: &Self::AccountId,
        port_id: &PortId,
        channel_id: &ChannelId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError>;

    /// Unescrows the tokens
    fn unescrow_coins_execute(
        &mut self,
        to_account: &Self::AccountId,
        port_id: &PortId,
        channel_id: &ChannelId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError>;

    /// Hands the packet to the channel layer and advances the send sequence.
    fn send_packet_execute(&mut self, packet: OutboundPacket) -> Result<(), InterchainSwapError>;

    fn emit_event(&mut self, event: ModuleEvent) -> Result<(), InterchainSwapError>;

    fn log_message(&mut self, message: String) -> Result<(), InterchainSwapError>;
}
