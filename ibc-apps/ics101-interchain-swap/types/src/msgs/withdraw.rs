use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

use crate::error::InterchainSwapError;
use crate::{Coin, Timeout};

/// Message used to redeem pool tokens for a proportional share of every pool asset.
///
/// `receiver` gets the assets custodied on this chain, `counterparty_receiver` the
/// ones custodied on the counterparty chain.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgMultiAssetWithdraw {
    pub pool_id: String,
    pub receiver: Signer,
    pub counterparty_receiver: Signer,
    pub pool_token: Coin,
    pub timeout: Timeout,
}

impl MsgMultiAssetWithdraw {
    pub fn validate_basic(&self) -> Result<(), InterchainSwapError> {
        if self.pool_token.is_zero() {
            return Err(InterchainSwapError::ZeroAmount);
        }
        self.timeout.validate()
    }
}
