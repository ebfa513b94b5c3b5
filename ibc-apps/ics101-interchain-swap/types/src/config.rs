//! Host-provided parameters of the interchain swap application.
use ibc_core::primitives::prelude::*;

use crate::error::InterchainSwapError;
use crate::Decimal;

/// Parameters governing the interchain swap application on one chain.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InterchainSwapConfig {
    /// Whether `swap` is accepted.
    pub swap_enabled: bool,
    /// Allowed deviation of each multi-asset deposit leg from the deposit ratio.
    pub deposit_ratio_tolerance_bps: u64,
    /// Largest swap fee a pool may be made with.
    pub max_swap_fee: Decimal,
    pub default_query_limit: u32,
    pub max_query_limit: u32,
}

impl Default for InterchainSwapConfig {
    fn default() -> Self {
        Self {
            swap_enabled: true,
            deposit_ratio_tolerance_bps: 10,
            max_swap_fee: Decimal::percent(10),
            default_query_limit: 10,
            max_query_limit: 30,
        }
    }
}

impl InterchainSwapConfig {
    /// Checks that a pool may be made with the given fee.
    pub fn validate_swap_fee(&self, fee: Decimal) -> Result<(), InterchainSwapError> {
        if fee >= Decimal::one() || fee > self.max_swap_fee {
            return Err(InterchainSwapError::InvalidSwapFee {
                fee: fee.to_string(),
                max: self.max_swap_fee.to_string(),
            });
        }
        Ok(())
    }

    pub fn ensure_swap_enabled(&self) -> Result<(), InterchainSwapError> {
        if self.swap_enabled {
            Ok(())
        } else {
            Err(InterchainSwapError::SwapDisabled)
        }
    }

    /// Clamps a requested page size to the configured bounds.
    pub fn query_limit(&self, requested: Option<u32>) -> usize {
        requested
            .unwrap_or(self.default_query_limit)
            .min(self.max_query_limit) as usize
    }
}
