//! Defines the message that makes a pool on the source chain.
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

use crate::error::InterchainSwapError;
use crate::{compute_pool_id, validate_liquidity, Decimal, PoolAsset, Timeout};

/// Message used to make an interchain liquidity pool.
///
/// The creator escrows the `SOURCE` side of `liquidity` on this chain. The pool
/// becomes active once `counterparty_creator` takes it on the destination chain.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MsgMakePool {
    /// the port on which the packet will be sent
    pub source_port: PortId,
    /// the channel by which the packet will be sent
    pub source_channel: ChannelId,
    pub source_chain_id: String,
    pub destination_chain_id: String,
    pub creator: Signer,
    pub counterparty_creator: Signer,
    pub liquidity: Vec<PoolAsset>,
    pub swap_fee: Decimal,
    pub timeout: Timeout,
}

impl MsgMakePool {
    pub fn pool_id(&self) -> String {
        compute_pool_id(&self.liquidity)
    }

    /// Stateless checks: liquidity composition, fee bound and timeout.
    pub fn validate_basic(&self) -> Result<(), InterchainSwapError> {
        validate_liquidity(&self.liquidity)?;
        if self.swap_fee >= Decimal::one() {
            return Err(InterchainSwapError::InvalidSwapFee {
                fee: self.swap_fee.to_string(),
                max: Decimal::one().to_string(),
            });
        }
        self.timeout.validate()
    }
}
