use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

use crate::error::InterchainSwapError;
use crate::Timeout;

/// Message used by the counterparty creator to take a pool on the destination chain.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgTakePool {
    pub pool_id: String,
    /// the taker, who must be the pool's destination creator
    pub creator: Signer,
    /// the pool's source creator
    pub counter_creator: Signer,
    pub timeout: Timeout,
}

impl MsgTakePool {
    pub fn validate_basic(&self) -> Result<(), InterchainSwapError> {
        self.timeout.validate()
    }
}
