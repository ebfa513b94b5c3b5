//! Defines the interchain liquidity pool and its assets.
use alloc::collections::BTreeSet;
use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use sha2::{Digest, Sha256};

use crate::error::InterchainSwapError;
use crate::{Amount, Coin, Decimal};

/// Prefix of every pool identifier.
pub const POOL_ID_PREFIX: &str = "pool";

/// Largest accepted deviation of the sum of pool weights from one: 10^-12.
pub const WEIGHT_TOLERANCE: Decimal = Decimal::raw(primitive_types::U256([1_000_000, 0, 0, 0]));

/// Identifies which chain natively custodies a pool asset.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolSide {
    /// The chain on which the pool was made.
    Source,
    /// The chain on which the pool was taken.
    Destination,
}

impl PoolSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Source => "SOURCE",
            Self::Destination => "DESTINATION",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::Source => Self::Destination,
            Self::Destination => Self::Source,
        }
    }
}

impl Display for PoolSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of a pool, mirrored independently on each chain.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolStatus {
    /// Made, with the maker's liquidity escrowed, waiting to be taken.
    Created,
    /// Taken on both chains; open to deposits, withdrawals and swaps.
    Active,
    /// The make request was rejected or timed out. Terminal.
    Failed,
}

impl PoolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::Active => "ACTIVE",
            Self::Failed => "FAILED",
        }
    }
}

impl Display for PoolStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// A weighted asset of a pool.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PoolAsset {
    pub side: PoolSide,
    pub balance: Coin,
    pub weight: Decimal,
    pub decimal: u8,
}

impl PoolAsset {
    pub fn new(side: PoolSide, balance: Coin, weight: Decimal, decimal: u8) -> Self {
        Self {
            side,
            balance,
            weight,
            decimal,
        }
    }
}

/// The channel a pool is bound to, as seen from the local chain.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ChannelEndpoint {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub counterparty_port_id: PortId,
    pub counterparty_channel_id: ChannelId,
}

/// Derives the pool identifier from the canonical, denom-sorted list of
/// `denom:SIDE` pairs.
pub fn compute_pool_id(assets: &[PoolAsset]) -> String {
    let mut pairs: Vec<String> = assets
        .iter()
        .map(|asset| format!("{}:{}", asset.balance.denom, asset.side))
        .collect();
    pairs.sort();

    let hash = Sha256::digest(pairs.join(",").as_bytes());

    format!("{POOL_ID_PREFIX}{}", hex::encode(hash))
}

/// Canonical key of a set of denominations, used to look pools up by their tokens.
pub fn denom_set_key<'a>(denoms: impl IntoIterator<Item = &'a str>) -> String {
    let denoms: BTreeSet<&str> = denoms.into_iter().collect();
    denoms.into_iter().collect::<Vec<_>>().join(",")
}

/// Checks that the assets form a valid pool: at least two assets with distinct
/// denominations and non-zero balances, assets on both sides, and weights in `(0, 1]`
/// summing to one.
pub fn validate_liquidity(assets: &[PoolAsset]) -> Result<(), InterchainSwapError> {
    let invalid = |reason: &str| InterchainSwapError::InvalidLiquidityComposition {
        reason: reason.to_string(),
    };

    if assets.len() < 2 {
        return Err(invalid("a pool needs at least two assets"));
    }

    let denoms: BTreeSet<&str> = assets.iter().map(|a| a.balance.denom.as_str()).collect();
    if denoms.len() != assets.len() {
        return Err(invalid("duplicate denomination"));
    }

    for side in [PoolSide::Source, PoolSide::Destination] {
        if !assets.iter().any(|a| a.side == side) {
            return Err(InterchainSwapError::InvalidLiquidityComposition {
                reason: format!("no asset on the {side} side"),
            });
        }
    }

    let mut total_weight = Decimal::zero();
    for asset in assets {
        if asset.weight.is_zero() || asset.weight > Decimal::one() {
            return Err(invalid("weight must be in (0, 1]"));
        }
        if asset.balance.is_zero() {
            return Err(InterchainSwapError::ZeroAmount);
        }
        total_weight = total_weight.checked_add(asset.weight)?;
    }

    if total_weight.abs_diff(Decimal::one()) > WEIGHT_TOLERANCE {
        return Err(InterchainSwapError::InvalidLiquidityComposition {
            reason: format!("weights sum to {total_weight}"),
        });
    }

    Ok(())
}

/// A multi-asset liquidity reserve replicated across two chains.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InterchainLiquidityPool {
    pub id: String,
    pub source_creator: Signer,
    pub destination_creator: Signer,
    pub source_chain_id: String,
    pub destination_chain_id: String,
    pub assets: Vec<PoolAsset>,
    pub swap_fee: Decimal,
    pub supply: Coin,
    pub status: PoolStatus,
    pub endpoint: ChannelEndpoint,
}

impl InterchainLiquidityPool {
    pub fn pool_token_denom(&self) -> &str {
        &self.supply.denom
    }

    /// Returns a coin of this pool's token.
    pub fn pool_token(&self, amount: Amount) -> Coin {
        self.supply.with_amount(amount)
    }

    /// Recomputes the identifier from the current asset composition.
    pub fn computed_id(&self) -> String {
        compute_pool_id(&self.assets)
    }

    /// Side of the pool whose assets are custodied by the chain with the given id.
    pub fn local_side(&self, chain_id: &str) -> PoolSide {
        if chain_id == self.source_chain_id {
            PoolSide::Source
        } else {
            PoolSide::Destination
        }
    }

    pub fn ensure_active(&self) -> Result<(), InterchainSwapError> {
        if self.status == PoolStatus::Active {
            Ok(())
        } else {
            Err(InterchainSwapError::PoolNotActive {
                pool_id: self.id.clone(),
                status: self.status,
            })
        }
    }

    pub fn find_asset_by_denom(&self, denom: &str) -> Result<&PoolAsset, InterchainSwapError> {
        self.assets
            .iter()
            .find(|asset| asset.balance.denom == denom)
            .ok_or_else(|| InterchainSwapError::DenomNotInPool {
                pool_id: self.id.clone(),
                denom: denom.to_string(),
            })
    }

    pub fn assets_on_side(&self, side: PoolSide) -> impl Iterator<Item = &PoolAsset> {
        self.assets.iter().filter(move |asset| asset.side == side)
    }

    /// Sum of the weights of the assets on one side.
    pub fn side_weight(&self, side: PoolSide) -> Result<Decimal, InterchainSwapError> {
        self.assets_on_side(side)
            .try_fold(Decimal::zero(), |acc, asset| acc.checked_add(asset.weight))
    }

    /// Sum of all asset balances, the initial pool token supply.
    pub fn total_balance(&self) -> Result<Amount, InterchainSwapError> {
        self.assets
            .iter()
            .try_fold(Amount::zero(), |acc, asset| {
                acc.checked_add(asset.balance.amount)
            })
            .ok_or(InterchainSwapError::Overflow)
    }

    pub fn add_asset(&mut self, token: &Coin) -> Result<(), InterchainSwapError> {
        let asset = self.find_asset_mut(&token.denom)?;
        asset.balance.amount = asset
            .balance
            .amount
            .checked_add(token.amount)
            .ok_or(InterchainSwapError::Overflow)?;
        Ok(())
    }

    pub fn subtract_asset(&mut self, token: &Coin) -> Result<(), InterchainSwapError> {
        let asset = self.find_asset_mut(&token.denom)?;
        asset.balance.amount = asset.balance.amount.checked_sub(token.amount).ok_or_else(|| {
            InterchainSwapError::InsufficientLiquidity {
                requested: token.to_string(),
                available: asset.balance.to_string(),
            }
        })?;
        Ok(())
    }

    pub fn add_supply(&mut self, amount: Amount) -> Result<(), InterchainSwapError> {
        self.supply.amount = self
            .supply
            .amount
            .checked_add(amount)
            .ok_or(InterchainSwapError::Overflow)?;
        Ok(())
    }

    pub fn subtract_supply(&mut self, amount: Amount) -> Result<(), InterchainSwapError> {
        self.supply.amount = self.supply.amount.checked_sub(amount).ok_or_else(|| {
            InterchainSwapError::InsufficientLiquidity {
                requested: self.pool_token(amount).to_string(),
                available: self.supply.to_string(),
            }
        })?;
        Ok(())
    }

    fn find_asset_mut(&mut self, denom: &str) -> Result<&mut PoolAsset, InterchainSwapError> {
        let pool_id = self.id.clone();
        self.assets
            .iter_mut()
            .find(|asset| asset.balance.denom == denom)
            .ok_or_else(|| InterchainSwapError::DenomNotInPool {
                pool_id,
                denom: denom.to_string(),
            })
    }
}
