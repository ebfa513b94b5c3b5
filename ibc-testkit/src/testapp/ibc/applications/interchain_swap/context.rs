use ibc_app_interchain_swap::context::{
    InterchainSwapExecutionContext, InterchainSwapValidationContext, OutboundPacket,
    PoolTokenMintAuthority,
};
use ibc_app_interchain_swap::escrow::EscrowLedger;
use ibc_app_interchain_swap::registry::{OrderRegistry, PoolRegistry};
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::{Coin, Decimal, InterchainSwapConfig};
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

use crate::context::MockSwapContext;

impl InterchainSwapValidationContext for MockSwapContext {
    type AccountId = Signer;

    fn get_port(&self) -> Result<PortId, InterchainSwapError> {
        Ok(self.port_id.clone())
    }

    fn chain_id(&self) -> String {
        self.host_chain_id.clone()
    }

    fn config(&self) -> &InterchainSwapConfig {
        &self.config
    }

    fn host_height(&self) -> u64 {
        self.host_height
    }

    fn host_timestamp(&self) -> u64 {
        self.host_timestamp
    }

    fn counterparty_channel(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<(PortId, ChannelId), InterchainSwapError> {
        self.channels
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned()
            .ok_or_else(|| InterchainSwapError::DestinationChannelNotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })
    }

    fn get_next_sequence_send(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Sequence, InterchainSwapError> {
        self.next_sequence_send
            .get(&(port_id.clone(), channel_id.clone()))
            .copied()
            .ok_or_else(|| InterchainSwapError::DestinationChannelNotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })
    }

    fn pool_registry(&self) -> &PoolRegistry {
        &self.pools
    }

    fn order_registry(&self) -> &OrderRegistry {
        &self.orders
    }

    fn escrow_ledger(&self) -> &EscrowLedger {
        &self.escrow
    }

    fn escrow_coins_validate(
        &self,
        from_account: &Self::AccountId,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError> {
        self.bank.ensure_balance(from_account.as_ref(), coin)
    }

    fn unescrow_coins_validate(
        &self,
        _to_account: &Self::AccountId,
        port_id: &PortId,
        channel_id: &ChannelId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError> {
        self.bank
            .ensure_balance(&Self::escrow_address(port_id, channel_id), coin)
    }

    fn reference_price(&self, denom_in: &str, denom_out: &str) -> Option<Decimal> {
        self.reference_prices
            .get(&(denom_in.to_string(), denom_out.to_string()))
            .copied()
    }
}

impl PoolTokenMintAuthority for MockSwapContext {
    fn mint_pool_tokens_validate(
        &self,
        _account: &Self::AccountId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError> {
        self.pools.get(&coin.denom).map(|_| ())
    }

    fn burn_pool_tokens_validate(
        &self,
        account: &Self::AccountId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError> {
        self.bank.ensure_balance(account.as_ref(), coin)
    }

    fn mint_pool_tokens_execute(
        &mut self,
        account: &Self::AccountId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError> {
        self.bank.mint(account.as_ref(), coin)
    }

    fn burn_pool_tokens_execute(
        &mut self,
        account: &Self::AccountId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError> {
        self.bank.burn(account.as_ref(), coin)
    }
}

impl InterchainSwapExecutionContext for MockSwapContext {
    fn pool_registry_mut(&mut self) -> &mut PoolRegistry {
        &mut self.pools
    }

    fn order_registry_mut(&mut self) -> &mut OrderRegistry {
        &mut self.orders
    }

    fn escrow_ledger_mut(&mut self) -> &mut EscrowLedger {
        &mut self.escrow
    }

    fn escrow_coins_execute(
        &mut self,
        from_account: &Self::AccountId,
        port_id: &PortId,
        channel_id: &ChannelId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError> {
        self.bank.transfer(
            from_account.as_ref(),
            &Self::escrow_address(port_id, channel_id),
            coin,
        )
    }

    fn unescrow_coins_execute(
        &mut self,
        to_account: &Self::AccountId,
        port_id: &PortId,
        channel_id: &ChannelId,
        coin: &Coin,
    ) -> Result<(), InterchainSwapError> {
        self.bank.transfer(
            &Self::escrow_address(port_id, channel_id),
            to_account.as_ref(),
            coin,
        )
    }

    fn send_packet_execute(&mut self, packet: OutboundPacket) -> Result<(), InterchainSwapError> {
        let key = (packet.port_id_on_a.clone(), packet.chan_id_on_a.clone());
        let next_sequence = self.get_next_sequence_send(&key.0, &key.1)?;
        if packet.sequence != next_sequence {
            return Err(InterchainSwapError::Host {
                description: format!(
                    "packet sequence {} does not match next sequence {next_sequence}",
                    packet.sequence
                ),
            });
        }

        self.next_sequence_send.insert(key, next_sequence.increment());
        self.push_packet(packet);

        Ok(())
    }

    fn emit_event(&mut self, event: ModuleEvent) -> Result<(), InterchainSwapError> {
        self.push_event(event);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), InterchainSwapError> {
        self.push_log(message);
        Ok(())
    }
}
