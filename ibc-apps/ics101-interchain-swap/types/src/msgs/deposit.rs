//! Defines the single-asset and multi-asset deposit messages.
use alloc::collections::BTreeSet;

use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

use crate::error::InterchainSwapError;
use crate::{Coin, DepositAsset, Timeout};

/// Message used to deposit a single local asset into an active pool.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgSingleAssetDeposit {
    pub pool_id: String,
    pub sender: Signer,
    pub token: Coin,
    pub timeout: Timeout,
}

impl MsgSingleAssetDeposit {
    pub fn validate_basic(&self) -> Result<(), InterchainSwapError> {
        if self.token.is_zero() {
            return Err(InterchainSwapError::ZeroAmount);
        }
        self.timeout.validate()
    }
}

/// Message used to open a two-phase deposit of every pool asset.
///
/// Each leg is provided by its sender on the chain that custodies the asset.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgMakeMultiAssetDeposit {
    pub pool_id: String,
    pub deposits: Vec<DepositAsset>,
    pub timeout: Timeout,
}

impl MsgMakeMultiAssetDeposit {
    pub fn validate_basic(&self) -> Result<(), InterchainSwapError> {
        let denoms: BTreeSet<&str> = self
            .deposits
            .iter()
            .map(|deposit| deposit.balance.denom.as_str())
            .collect();
        if denoms.len() != self.deposits.len() {
            return Err(InterchainSwapError::InvalidDepositComposition {
                reason: "duplicate denomination".to_string(),
            });
        }
        if self.deposits.iter().any(|deposit| deposit.balance.is_zero()) {
            return Err(InterchainSwapError::ZeroAmount);
        }
        self.timeout.validate()
    }
}

/// Message used by the counterparty depositor to fund and settle a pending deposit.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgTakeMultiAssetDeposit {
    pub order_id: u64,
    pub pool_id: String,
    pub sender: Signer,
    pub timeout: Timeout,
}

impl MsgTakeMultiAssetDeposit {
    pub fn validate_basic(&self) -> Result<(), InterchainSwapError> {
        self.timeout.validate()
    }
}
