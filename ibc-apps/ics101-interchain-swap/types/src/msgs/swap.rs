use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

use crate::error::InterchainSwapError;
use crate::packet::InterchainMessageType;
use crate::{Coin, Timeout, MAXIMUM_SLIPPAGE};

/// Direction of a swap: `LEFT` fixes the input, `RIGHT` fixes the output.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapType {
    Left,
    Right,
}

impl Display for SwapType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Left => write!(f, "LEFT"),
            Self::Right => write!(f, "RIGHT"),
        }
    }
}

impl From<SwapType> for InterchainMessageType {
    fn from(swap_type: SwapType) -> Self {
        match swap_type {
            SwapType::Left => Self::LeftSwap,
            SwapType::Right => Self::RightSwap,
        }
    }
}

/// Message used to swap one pool asset for another.
///
/// `token_in` and `token_out` are the caller's quote. For a `LEFT` swap the input is
/// exact and `token_out` is the expected output; for a `RIGHT` swap the output is
/// exact and `token_in` is the expected input. `slippage` is the tolerated deviation
/// from the quote in basis points.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgSwap {
    pub swap_type: SwapType,
    pub sender: Signer,
    pub pool_id: String,
    pub token_in: Coin,
    pub token_out: Coin,
    pub slippage: u64,
    pub recipient: Signer,
    pub timeout: Timeout,
}

impl MsgSwap {
    pub fn validate_basic(&self) -> Result<(), InterchainSwapError> {
        if self.slippage > MAXIMUM_SLIPPAGE {
            return Err(InterchainSwapError::InvalidSlippage {
                slippage: self.slippage,
            });
        }
        if self.token_in.is_zero() || self.token_out.is_zero() {
            return Err(InterchainSwapError::ZeroAmount);
        }
        self.timeout.validate()
    }
}
