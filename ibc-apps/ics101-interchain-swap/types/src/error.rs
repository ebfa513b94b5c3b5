//! Defines the interchain swap error type
use core::convert::Infallible;

use displaydoc::Display;
use ibc_core::channel::types::acknowledgement::StatusValue;
use ibc_core::channel::types::channel::Order;
use ibc_core::host::types::error::IdentifierError;
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::primitives::prelude::*;
use uint::FromDecStrErr;

use crate::{OrderStatus, PoolStatus};

#[derive(Display, Debug)]
pub enum InterchainSwapError {
    /// host error: `{description}`
    Host { description: String },
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// invalid liquidity composition: `{reason}`
    InvalidLiquidityComposition { reason: String },
    /// invalid deposit composition: `{reason}`
    InvalidDepositComposition { reason: String },
    /// insufficient funds: tried to move `{requested}`, account only has `{available}`
    InsufficientFunds { requested: String, available: String },
    /// insufficient liquidity: pool holds `{available}`, `{requested}` requested
    InsufficientLiquidity { requested: String, available: String },
    /// pool `{pool_id}` already exists
    PoolAlreadyExists { pool_id: String },
    /// pool `{pool_id}` is already active
    PoolAlreadyActive { pool_id: String },
    /// pool id mismatch: expected `{expected}`, got `{actual}`
    PoolIdMismatch { expected: String, actual: String },
    /// pool `{pool_id}` is not active, status `{status}`
    PoolNotActive { pool_id: String, status: PoolStatus },
    /// pool `{pool_id}` not found
    PoolNotFound { pool_id: String },
    /// denom `{denom}` is not part of pool `{pool_id}`
    DenomNotInPool { pool_id: String, denom: String },
    /// asset `{denom}` is not custodied on this chain
    AssetNotLocal { denom: String },
    /// invalid pool token `{denom}`, expected `{expected}`
    InvalidPoolToken { denom: String, expected: String },
    /// amount must be greater than zero
    ZeroAmount,
    /// order `{order_id}` of pool `{pool_id}` not found
    OrderNotFound { pool_id: String, order_id: u64 },
    /// order `{order_id}` of pool `{pool_id}` already exists
    OrderAlreadyExists { pool_id: String, order_id: u64 },
    /// order `{order_id}` is already complete
    OrderAlreadyComplete { order_id: u64 },
    /// order `{order_id}` has expired
    OrderExpired { order_id: u64 },
    /// order `{order_id}` is in unexpected status `{status}`
    InvalidOrderStatus { order_id: u64, status: OrderStatus },
    /// deposit ratio mismatch for `{denom}`: deviates `{deviation_bps}` bps, tolerance is `{tolerance_bps}` bps
    DepositRatioMismatch {
        denom: String,
        deviation_bps: u64,
        tolerance_bps: u64,
    },
    /// withdraw amount mismatch for `{denom}`: expected `{expected}`, got `{actual}`
    WithdrawAmountMismatch {
        denom: String,
        expected: String,
        actual: String,
    },
    /// slippage exceeded: limit `{expected}`, got `{actual}`
    SlippageExceeded { expected: String, actual: String },
    /// invalid slippage `{slippage}`, must not exceed 10000 bps
    InvalidSlippage { slippage: u64 },
    /// invalid swap fee `{fee}`, maximum is `{max}`
    InvalidSwapFee { fee: String, max: String },
    /// swaps are disabled on this chain
    SwapDisabled,
    /// invalid chain id `{chain_id}`, host chain id is `{expected}`
    InvalidChainId { chain_id: String, expected: String },
    /// account `{account}` is not allowed to take this operation
    InvalidTaker { account: String },
    /// missing timeout height and timestamp
    MissingTimeout,
    /// invalid amount error: `{0}`
    InvalidAmount(FromDecStrErr),
    /// invalid decimal `{value}`
    InvalidDecimal { value: String },
    /// arithmetic overflow
    Overflow,
    /// division by zero
    DivisionByZero,
    /// power approximation did not converge
    PowApproximation,
    /// destination channel not found in the counterparty of port_id `{port_id}` and channel_id `{channel_id}`
    DestinationChannelNotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// packet arrived on channel `{channel_id}`, pool is bound to `{expected}`
    ChannelMismatch {
        channel_id: ChannelId,
        expected: ChannelId,
    },
    /// expected `{expect_order}` channel, got `{got_order}`
    ChannelNotUnordered {
        expect_order: Order,
        got_order: Order,
    },
    /// invalid version: `{version}`, expected `{expected}`
    InvalidVersion { version: String, expected: String },
    /// channel cannot be closed
    CantCloseChannel,
    /// failed to deserialize packet data
    PacketDataDeserialization,
    /// failed to deserialize acknowledgement
    AckDeserialization,
    /// missing state change in `{msg_type}` packet
    MissingStateChange { msg_type: String },
    /// failed to parse as AccountId
    ParseAccountFailure,
    /// invalid port: `{port_id}`, expected `{exp_port_id}`
    InvalidPort {
        port_id: PortId,
        exp_port_id: PortId,
    },
    /// invalid coin `{coin}`
    InvalidCoin { coin: String },
    /// cannot swap `{denom}` for itself
    SameDenomSwap { denom: String },
    /// pool token mismatch for `{denom}`: expected `{expected}`, got `{actual}`
    PoolTokenMismatch {
        denom: String,
        expected: String,
        actual: String,
    },
}

#[cfg(feature = "std")]
impl std::error::Error for InterchainSwapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            Self::InvalidAmount(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Infallible> for InterchainSwapError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

impl From<IdentifierError> for InterchainSwapError {
    fn from(err: IdentifierError) -> InterchainSwapError {
        Self::InvalidIdentifier(err)
    }
}

impl From<InterchainSwapError> for StatusValue {
    fn from(err: InterchainSwapError) -> Self {
        StatusValue::new(err.to_string()).expect("error message must not be empty")
    }
}
