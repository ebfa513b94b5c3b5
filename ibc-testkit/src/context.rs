//! Implementation of a mock chain hosting the interchain swap application.
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use ibc_app_interchain_swap::context::OutboundPacket;
use ibc_app_interchain_swap::escrow::EscrowLedger;
use ibc_app_interchain_swap::registry::{OrderRegistry, PoolRegistry};
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::{Amount, Coin, Decimal, InterchainSwapConfig, PoolStatus};
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core::router::types::event::ModuleEvent;
use ibc_core::router::types::module::ModuleExtras;
use parking_lot::Mutex;

use crate::fixtures::core::context::MockSwapContextConfig;
use crate::testapp::ibc::bank::MockBank;

pub const DEFAULT_BLOCK_TIME_SECS: u64 = 3;

/// Records produced by the application that the host hands to the outside world.
#[derive(Clone, Debug, Default)]
pub struct MockSwapStore {
    /// Packets committed by the application, not yet picked up by a relayer.
    pub packets: Vec<OutboundPacket>,

    /// Emitted events in order
    pub events: Vec<ModuleEvent>,

    /// Logs of the interchain swap module
    pub logs: Vec<String>,
}

/// A chain running the interchain swap application on top of a mock bank.
#[derive(Debug)]
pub struct MockSwapContext {
    /// Host chain identifier.
    pub host_chain_id: String,

    /// Port the application is bound to.
    pub port_id: PortId,

    pub config: InterchainSwapConfig,

    pub host_height: u64,

    /// Nanoseconds since the Unix epoch.
    pub host_timestamp: u64,

    /// Average time duration between blocks
    pub block_time: Duration,

    pub bank: MockBank,

    pub pools: PoolRegistry,

    pub orders: OrderRegistry,

    pub escrow: EscrowLedger,

    /// Counterparty end of every open channel, indexed by the local end.
    pub channels: BTreeMap<(PortId, ChannelId), (PortId, ChannelId)>,

    /// Tracks the sequence number for the next packet to be sent.
    pub next_sequence_send: BTreeMap<(PortId, ChannelId), Sequence>,

    /// Oracle prices, indexed by `(denom_in, denom_out)`.
    pub reference_prices: BTreeMap<(String, String), Decimal>,

    pub swap_store: Arc<Mutex<MockSwapStore>>,
}

/// Returns a MockSwapContext for chain `mock-0` with a single channel and no
/// balances.
impl Default for MockSwapContext {
    fn default() -> Self {
        MockSwapContextConfig::builder().build()
    }
}

/// A manual clone impl is provided because the tests are oblivious to the fact that the `swap_store`
/// is a shared ptr.
impl Clone for MockSwapContext {
    fn clone(&self) -> Self {
        let swap_store = {
            let swap_store = self.swap_store.lock().clone();
            Arc::new(Mutex::new(swap_store))
        };

        Self {
            host_chain_id: self.host_chain_id.clone(),
            port_id: self.port_id.clone(),
            config: self.config.clone(),
            host_height: self.host_height,
            host_timestamp: self.host_timestamp,
            block_time: self.block_time,
            bank: self.bank.clone(),
            pools: self.pools.clone(),
            orders: self.orders.clone(),
            escrow: self.escrow.clone(),
            channels: self.channels.clone(),
            next_sequence_send: self.next_sequence_send.clone(),
            reference_prices: self.reference_prices.clone(),
            swap_store,
        }
    }
}

/// Implementation of internal interface for use in testing. The methods in this interface should
/// _not_ be accessible to the application handlers.
impl MockSwapContext {
    /// Address of the account holding the coins escrowed on a channel.
    pub fn escrow_address(port_id: &PortId, channel_id: &ChannelId) -> String {
        format!("{port_id}/{channel_id}/escrow")
    }

    /// Opens a channel whose other end is `(counterparty_port_id, counterparty_channel_id)`.
    pub fn with_channel(
        mut self,
        port_id: PortId,
        channel_id: ChannelId,
        counterparty_port_id: PortId,
        counterparty_channel_id: ChannelId,
    ) -> Self {
        self.next_sequence_send
            .insert((port_id.clone(), channel_id.clone()), Sequence::from(1));
        self.channels.insert(
            (port_id, channel_id),
            (counterparty_port_id, counterparty_channel_id),
        );
        self
    }

    pub fn with_balance(mut self, account: &str, coin: Coin) -> Self {
        self.fund(account, coin);
        self
    }

    /// Replaces the application configuration with one read from JSON.
    pub fn with_config_json(mut self, json: &str) -> Result<Self, InterchainSwapError> {
        self.config = serde_json::from_str(json).map_err(|e| InterchainSwapError::Host {
            description: e.to_string(),
        })?;
        Ok(self)
    }

    /// Quotes `denom_in` per unit of `denom_out` for the swap price guard.
    pub fn set_reference_price(&mut self, denom_in: &str, denom_out: &str, price: Decimal) {
        self.reference_prices
            .insert((denom_in.to_string(), denom_out.to_string()), price);
    }

    /// Credits `coin` to `account` out of thin air.
    pub fn fund(&mut self, account: &str, coin: Coin) {
        self.bank
            .mint(account, &coin)
            .expect("minting into an account never overflows in tests");
    }

    /// Produces a new block: the height grows by one and the time by `block_time`.
    pub fn advance_block(&mut self) {
        self.host_height += 1;
        self.host_timestamp += self.block_time.as_nanos() as u64;
    }

    pub fn advance_blocks(&mut self, count: u64) {
        for _ in 0..count {
            self.advance_block();
        }
    }

    pub fn balance(&self, account: &str, denom: &str) -> Amount {
        self.bank.balance(account, denom)
    }

    pub fn escrow_balance(&self, port_id: &PortId, channel_id: &ChannelId, denom: &str) -> Amount {
        self.bank
            .balance(&Self::escrow_address(port_id, channel_id), denom)
    }

    /// Removes and returns the packets committed since the last call.
    pub fn take_outbound_packets(&self) -> Vec<OutboundPacket> {
        core::mem::take(&mut self.swap_store.lock().packets)
    }

    pub fn outbound_packets(&self) -> Vec<OutboundPacket> {
        self.swap_store.lock().packets.clone()
    }

    pub fn events(&self) -> Vec<ModuleEvent> {
        self.swap_store.lock().events.clone()
    }

    /// Events of the given kind, in emission order.
    pub fn events_of_kind(&self, kind: &str) -> Vec<ModuleEvent> {
        self.swap_store
            .lock()
            .events
            .iter()
            .filter(|event| event.kind == kind)
            .cloned()
            .collect()
    }

    pub fn logs(&self) -> Vec<String> {
        self.swap_store.lock().logs.clone()
    }

    /// Stores the events and logs returned by a module callback, as the core
    /// handler does.
    pub fn record_extras(&self, extras: ModuleExtras) {
        let mut store = self.swap_store.lock();
        store.events.extend(extras.events);
        for log in extras.log {
            tracing::debug!(chain_id = %self.host_chain_id, "{log}");
            store.logs.push(log);
        }
    }

    pub(crate) fn push_packet(&self, packet: OutboundPacket) {
        self.swap_store.lock().packets.push(packet);
    }

    pub(crate) fn push_event(&self, event: ModuleEvent) {
        self.swap_store.lock().events.push(event);
    }

    pub(crate) fn push_log(&self, message: String) {
        tracing::debug!(chain_id = %self.host_chain_id, "{message}");
        self.swap_store.lock().logs.push(message);
    }

    /// Checks that the coins held in escrow on `(port_id, channel_id)` match what
    /// the application accounts for: the local liquidity of every active pool on
    /// the channel plus the refunds still owed by unresolved escrow entries.
    pub fn check_escrow_invariant(&self, port_id: &PortId, channel_id: &ChannelId) {
        let mut denoms: Vec<String> = Vec::new();
        for pool in self.pools.iter() {
            for asset in &pool.assets {
                if !denoms.contains(&asset.balance.denom) {
                    denoms.push(asset.balance.denom.clone());
                }
            }
        }

        for denom in denoms {
            let pool_liquidity = self
                .pools
                .iter()
                .filter(|pool| pool.status == PoolStatus::Active)
                .filter(|pool| {
                    &pool.endpoint.port_id == port_id && &pool.endpoint.channel_id == channel_id
                })
                .flat_map(|pool| {
                    let side = pool.local_side(&self.host_chain_id);
                    pool.assets_on_side(side)
                        .filter(|asset| asset.balance.denom == denom)
                        .map(|asset| asset.balance.amount)
                        .collect::<Vec<_>>()
                })
                .fold(Amount::zero(), |acc, amount| {
                    acc.checked_add(amount).expect("no overflow")
                });

            let expected = pool_liquidity
                .checked_add(self.escrow.escrowed_amount(&denom).expect("no overflow"))
                .expect("no overflow");

            assert_eq!(
                self.escrow_balance(port_id, channel_id, &denom),
                expected,
                "escrow of {denom} on {} does not match pool liquidity and pending refunds",
                self.host_chain_id
            );
        }
    }
}
