use ibc_app_interchain_swap_types::msgs::{
    MsgMakeMultiAssetDeposit, MsgMakePool, MsgMultiAssetWithdraw, MsgSingleAssetDeposit, MsgSwap,
    MsgTakeMultiAssetDeposit, MsgTakePool, SwapType,
};
use ibc_app_interchain_swap_types::{
    Coin, Decimal, DepositAsset, PoolAsset, PoolSide, Timeout,
};
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::primitives::Signer;
use typed_builder::TypedBuilder;

use crate::context::MockSwapContext;
use crate::fixtures::core::context::{swap_port, MockSwapContextConfig};
use crate::fixtures::core::signer::account;

pub const CHAIN_A: &str = "chain-a";
pub const CHAIN_B: &str = "chain-b";

/// Asset custodied on chain A, the `SOURCE` side of dummy pools.
pub const DENOM_A: &str = "uatom";
/// Asset custodied on chain B, the `DESTINATION` side of dummy pools.
pub const DENOM_B: &str = "uosmo";

/// Pool creator on chain A.
pub const ALICE: &str = "cosmos1alice";
/// Pool taker on chain B.
pub const BOB: &str = "osmo1bob";
pub const CAROL: &str = "cosmos1carol";
pub const DAVE: &str = "osmo1dave";

pub const INITIAL_BALANCE: u64 = 1_000_000;

/// Channel end on chain A.
pub fn channel_a() -> ChannelId {
    ChannelId::new(0)
}

/// Channel end on chain B.
pub fn channel_b() -> ChannelId {
    ChannelId::new(1)
}

/// Returns chain A, where [`ALICE`] and [`CAROL`] hold [`DENOM_A`].
pub fn dummy_chain_a() -> MockSwapContext {
    MockSwapContextConfig::builder()
        .chain_id(CHAIN_A)
        .channel_id(channel_a())
        .counterparty_channel_id(channel_b())
        .balances(vec![
            (ALICE.to_string(), Coin::new(DENOM_A, INITIAL_BALANCE)),
            (CAROL.to_string(), Coin::new(DENOM_A, INITIAL_BALANCE)),
        ])
        .build()
}

/// Returns chain B, where [`BOB`] and [`DAVE`] hold [`DENOM_B`].
pub fn dummy_chain_b() -> MockSwapContext {
    MockSwapContextConfig::builder()
        .chain_id(CHAIN_B)
        .channel_id(channel_b())
        .counterparty_channel_id(channel_a())
        .balances(vec![
            (BOB.to_string(), Coin::new(DENOM_B, INITIAL_BALANCE)),
            (DAVE.to_string(), Coin::new(DENOM_B, INITIAL_BALANCE)),
        ])
        .build()
}

/// Returns an even-weighted pair of [`DENOM_A`] on the source side and [`DENOM_B`]
/// on the destination side.
pub fn dummy_liquidity(source_amount: u64, destination_amount: u64) -> Vec<PoolAsset> {
    vec![
        PoolAsset::new(
            PoolSide::Source,
            Coin::new(DENOM_A, source_amount),
            Decimal::percent(50),
            6,
        ),
        PoolAsset::new(
            PoolSide::Destination,
            Coin::new(DENOM_B, destination_amount),
            Decimal::percent(50),
            6,
        ),
    ]
}

pub fn dummy_timeout() -> Timeout {
    Timeout::at_height(1_000)
}

/// Configuration of the `MsgMakePool` type, made by [`ALICE`] on chain A.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgMakePool))]
pub struct MakePoolConfig {
    #[builder(default = swap_port())]
    source_port: PortId,
    #[builder(default = channel_a())]
    source_channel: ChannelId,
    #[builder(default = CHAIN_A.to_string(), setter(into))]
    source_chain_id: String,
    #[builder(default = CHAIN_B.to_string(), setter(into))]
    destination_chain_id: String,
    #[builder(default = account(ALICE))]
    creator: Signer,
    #[builder(default = account(BOB))]
    counterparty_creator: Signer,
    #[builder(default = dummy_liquidity(100, 100))]
    liquidity: Vec<PoolAsset>,
    #[builder(default = Decimal::percent(1))]
    swap_fee: Decimal,
    #[builder(default = dummy_timeout())]
    timeout: Timeout,
}

impl From<MakePoolConfig> for MsgMakePool {
    fn from(config: MakePoolConfig) -> Self {
        Self {
            source_port: config.source_port,
            source_channel: config.source_channel,
            source_chain_id: config.source_chain_id,
            destination_chain_id: config.destination_chain_id,
            creator: config.creator,
            counterparty_creator: config.counterparty_creator,
            liquidity: config.liquidity,
            swap_fee: config.swap_fee,
            timeout: config.timeout,
        }
    }
}

/// Configuration of the `MsgTakePool` type, taken by [`BOB`] on chain B.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgTakePool))]
pub struct TakePoolConfig {
    #[builder(setter(into))]
    pool_id: String,
    #[builder(default = account(BOB))]
    creator: Signer,
    #[builder(default = account(ALICE))]
    counter_creator: Signer,
    #[builder(default = dummy_timeout())]
    timeout: Timeout,
}

impl From<TakePoolConfig> for MsgTakePool {
    fn from(config: TakePoolConfig) -> Self {
        Self {
            pool_id: config.pool_id,
            creator: config.creator,
            counter_creator: config.counter_creator,
            timeout: config.timeout,
        }
    }
}

/// Configuration of the `MsgSingleAssetDeposit` type.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgSingleAssetDeposit))]
pub struct SingleAssetDepositConfig {
    #[builder(setter(into))]
    pool_id: String,
    #[builder(default = account(CAROL))]
    sender: Signer,
    #[builder(default = Coin::new(DENOM_A, 10u64))]
    token: Coin,
    #[builder(default = dummy_timeout())]
    timeout: Timeout,
}

impl From<SingleAssetDepositConfig> for MsgSingleAssetDeposit {
    fn from(config: SingleAssetDepositConfig) -> Self {
        Self {
            pool_id: config.pool_id,
            sender: config.sender,
            token: config.token,
            timeout: config.timeout,
        }
    }
}

/// Configuration of the `MsgMakeMultiAssetDeposit` type: [`CAROL`] deposits on
/// chain A, [`DAVE`] is expected to match on chain B.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgMakeMultiAssetDeposit))]
pub struct MakeMultiAssetDepositConfig {
    #[builder(setter(into))]
    pool_id: String,
    #[builder(default = Coin::new(DENOM_A, 10u64))]
    source_deposit: Coin,
    #[builder(default = Coin::new(DENOM_B, 10u64))]
    destination_deposit: Coin,
    #[builder(default = account(CAROL))]
    source_sender: Signer,
    #[builder(default = account(DAVE))]
    destination_sender: Signer,
    #[builder(default = dummy_timeout())]
    timeout: Timeout,
}

impl From<MakeMultiAssetDepositConfig> for MsgMakeMultiAssetDeposit {
    fn from(config: MakeMultiAssetDepositConfig) -> Self {
        Self {
            pool_id: config.pool_id,
            deposits: vec![
                DepositAsset::new(config.source_sender, config.source_deposit),
                DepositAsset::new(config.destination_sender, config.destination_deposit),
            ],
            timeout: config.timeout,
        }
    }
}

/// Configuration of the `MsgTakeMultiAssetDeposit` type, taken by [`DAVE`] on chain B.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgTakeMultiAssetDeposit))]
pub struct TakeMultiAssetDepositConfig {
    #[builder(setter(into))]
    pool_id: String,
    order_id: u64,
    #[builder(default = account(DAVE))]
    sender: Signer,
    #[builder(default = dummy_timeout())]
    timeout: Timeout,
}

impl From<TakeMultiAssetDepositConfig> for MsgTakeMultiAssetDeposit {
    fn from(config: TakeMultiAssetDepositConfig) -> Self {
        Self {
            order_id: config.order_id,
            pool_id: config.pool_id,
            sender: config.sender,
            timeout: config.timeout,
        }
    }
}

/// Configuration of the `MsgMultiAssetWithdraw` type: [`ALICE`] redeems on chain A
/// and receives the chain B assets as [`BOB`].
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgMultiAssetWithdraw))]
pub struct MultiAssetWithdrawConfig {
    #[builder(setter(into))]
    pool_id: String,
    pool_token: Coin,
    #[builder(default = account(ALICE))]
    receiver: Signer,
    #[builder(default = account(BOB))]
    counterparty_receiver: Signer,
    #[builder(default = dummy_timeout())]
    timeout: Timeout,
}

impl From<MultiAssetWithdrawConfig> for MsgMultiAssetWithdraw {
    fn from(config: MultiAssetWithdrawConfig) -> Self {
        Self {
            pool_id: config.pool_id,
            receiver: config.receiver,
            counterparty_receiver: config.counterparty_receiver,
            pool_token: config.pool_token,
            timeout: config.timeout,
        }
    }
}

/// Configuration of the `MsgSwap` type: by default [`BOB`] sells [`DENOM_B`] on
/// chain B and [`ALICE`] receives [`DENOM_A`] on chain A.
#[derive(TypedBuilder, Debug)]
#[builder(build_method(into = MsgSwap))]
pub struct SwapConfig {
    #[builder(setter(into))]
    pool_id: String,
    #[builder(default = SwapType::Left)]
    swap_type: SwapType,
    #[builder(default = account(BOB))]
    sender: Signer,
    #[builder(default = Coin::new(DENOM_B, 10u64))]
    token_in: Coin,
    #[builder(default = Coin::new(DENOM_A, 1u64))]
    token_out: Coin,
    #[builder(default = 100)]
    slippage: u64,
    #[builder(default = account(ALICE))]
    recipient: Signer,
    #[builder(default = dummy_timeout())]
    timeout: Timeout,
}

impl From<SwapConfig> for MsgSwap {
    fn from(config: SwapConfig) -> Self {
        Self {
            swap_type: config.swap_type,
            sender: config.sender,
            pool_id: config.pool_id,
            token_in: config.token_in,
            token_out: config.token_out,
            slippage: config.slippage,
            recipient: config.recipient,
            timeout: config.timeout,
        }
    }
}
