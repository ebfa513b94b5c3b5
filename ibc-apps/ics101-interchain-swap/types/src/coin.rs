//! Defines coin types, the objects that are being transferred, pooled and minted.
use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use ibc_core::primitives::prelude::*;

use crate::error::InterchainSwapError;
use crate::Amount;

/// A denomination and an amount of it.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Coin {
    /// Denomination
    pub denom: String,
    /// Amount
    pub amount: Amount,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns a coin of the same denomination with the given amount.
    pub fn with_amount(&self, amount: Amount) -> Self {
        Self {
            denom: self.denom.clone(),
            amount,
        }
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// Parses a coin of the `{amount}{denom}` form, e.g. `100uatom`.
impl FromStr for Coin {
    type Err = InterchainSwapError;

    fn from_str(coin_str: &str) -> Result<Self, Self::Err> {
        let split_at = coin_str
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| InterchainSwapError::InvalidCoin {
                coin: coin_str.to_string(),
            })?;
        let (amount, denom) = coin_str.split_at(split_at);

        if amount.is_empty() || denom.is_empty() {
            return Err(InterchainSwapError::InvalidCoin {
                coin: coin_str.to_string(),
            });
        }

        Ok(Self {
            denom: denom.to_string(),
            amount: amount.parse()?,
        })
    }
}
