use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use ibc_app_interchain_swap_types::{Coin, InterchainSwapConfig, PORT_ID_STR};
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use parking_lot::Mutex;
use typed_builder::TypedBuilder;

use crate::context::{MockSwapContext, MockSwapStore, DEFAULT_BLOCK_TIME_SECS};

/// 2023-01-01T00:00:00Z in nanoseconds.
pub const YEAR_2023_NANOS: u64 = 1_672_531_200_000_000_000;

pub fn swap_port() -> PortId {
    PortId::new(PORT_ID_STR.to_string()).expect("Never fails")
}

/// Configuration of the `MockSwapContext` type for generating dummy contexts.
#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = MockSwapContext))]
pub struct MockSwapContextConfig {
    #[builder(default = "mock-0".to_string(), setter(into))]
    chain_id: String,

    #[builder(default = swap_port())]
    port_id: PortId,

    #[builder(default = ChannelId::new(0))]
    channel_id: ChannelId,

    #[builder(default = swap_port())]
    counterparty_port_id: PortId,

    #[builder(default = ChannelId::new(0))]
    counterparty_channel_id: ChannelId,

    #[builder(default)]
    config: InterchainSwapConfig,

    #[builder(default = 5)]
    latest_height: u64,

    #[builder(default = YEAR_2023_NANOS)]
    latest_timestamp: u64,

    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    block_time: Duration,

    /// Initial funds, as `(account, coin)` pairs.
    #[builder(default)]
    balances: Vec<(String, Coin)>,
}

impl From<MockSwapContextConfig> for MockSwapContext {
    fn from(params: MockSwapContextConfig) -> Self {
        assert_ne!(
            params.latest_height, 0,
            "The chain must have a non-zero height"
        );

        let ctx = MockSwapContext {
            host_chain_id: params.chain_id,
            port_id: params.port_id.clone(),
            config: params.config,
            host_height: params.latest_height,
            host_timestamp: params.latest_timestamp,
            block_time: params.block_time,
            bank: Default::default(),
            pools: Default::default(),
            orders: Default::default(),
            escrow: Default::default(),
            channels: BTreeMap::new(),
            next_sequence_send: BTreeMap::new(),
            reference_prices: BTreeMap::new(),
            swap_store: Arc::new(Mutex::new(MockSwapStore::default())),
        }
        .with_channel(
            params.port_id,
            params.channel_id,
            params.counterparty_port_id,
            params.counterparty_channel_id,
        );

        params
            .balances
            .into_iter()
            .fold(ctx, |ctx, (account, coin)| ctx.with_balance(&account, coin))
    }
}
