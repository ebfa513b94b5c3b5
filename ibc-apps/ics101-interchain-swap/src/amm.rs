//! The weighted constant-value market maker backing interchain pools.
//!
//! A pool with balances `B_i` and weights `W_i` keeps `V = Π B_i^W_i` from
//! decreasing. Swaps charge the pool's fee on the input side.
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::{
    Amount, Coin, Decimal, DepositAsset, InterchainLiquidityPool, PoolAsset, MAXIMUM_SLIPPAGE,
};
use ibc_core::primitives::prelude::*;

/// Pool tokens to mint for a multi-asset deposit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiDepositQuote {
    /// `min_i(d_i / B_i)`
    pub ratio: Decimal,
    pub total_shares: Amount,
}

pub struct InterchainMarketMaker<'a> {
    pool: &'a InterchainLiquidityPool,
    fee: Decimal,
}

impl<'a> InterchainMarketMaker<'a> {
    pub fn new(pool: &'a InterchainLiquidityPool) -> Self {
        Self {
            pool,
            fee: pool.swap_fee,
        }
    }

    /// `V = Π B_i^W_i`
    pub fn invariant(&self) -> Result<Decimal, InterchainSwapError> {
        self.pool.assets.iter().try_fold(Decimal::one(), |acc, asset| {
            let balance = Decimal::from_amount(asset.balance.amount)?;
            acc.checked_mul(balance.pow(asset.weight)?)
        })
    }

    /// Amount of `denom_in` paid per unit of `denom_out` at the current balances,
    /// ignoring the fee.
    pub fn spot_price(&self, denom_in: &str, denom_out: &str) -> Result<Decimal, InterchainSwapError> {
        let (asset_in, asset_out) = self.pair(denom_in, denom_out)?;

        let weighted_in =
            Decimal::from_amount(asset_in.balance.amount)?.checked_div(asset_in.weight)?;
        let weighted_out =
            Decimal::from_amount(asset_out.balance.amount)?.checked_div(asset_out.weight)?;

        weighted_in.checked_div(weighted_out)
    }

    /// Output for an exact input:
    /// `out = B_out · (1 - (B_in / (B_in + in · (1 - fee)))^(W_in / W_out))`, rounded down.
    pub fn left_swap(&self, token_in: &Coin, denom_out: &str) -> Result<Coin, InterchainSwapError> {
        let (asset_in, asset_out) = self.pair(&token_in.denom, denom_out)?;

        let balance_in = Decimal::from_amount(asset_in.balance.amount)?;
        let amount_in = Decimal::from_amount(token_in.amount)?
            .checked_mul(Decimal::one().checked_sub(self.fee)?)?;

        let ratio = balance_in.checked_div(balance_in.checked_add(amount_in)?)?;
        let factor = ratio.pow(asset_in.weight.checked_div(asset_out.weight)?)?;

        let amount_out = Decimal::one()
            .checked_sub(factor)?
            .mul_floor(asset_out.balance.amount)?;

        if amount_out >= asset_out.balance.amount {
            return Err(insufficient_liquidity(asset_out, amount_out));
        }

        Ok(asset_out.balance.with_amount(amount_out))
    }

    /// Input required for an exact output:
    /// `in = B_in · ((B_out / (B_out - out))^(W_out / W_in) - 1) / (1 - fee)`, rounded up.
    pub fn right_swap(&self, denom_in: &str, token_out: &Coin) -> Result<Coin, InterchainSwapError> {
        let (asset_in, asset_out) = self.pair(denom_in, &token_out.denom)?;

        if token_out.amount >= asset_out.balance.amount {
            return Err(insufficient_liquidity(asset_out, token_out.amount));
        }

        let balance_out = Decimal::from_amount(asset_out.balance.amount)?;
        let remaining = balance_out.checked_sub(Decimal::from_amount(token_out.amount)?)?;

        let base = balance_out.checked_div(remaining)?;
        let factor = base.pow(asset_out.weight.checked_div(asset_in.weight)?)?;

        let amount_in = factor
            .checked_sub(Decimal::one())?
            .checked_mul(Decimal::from_amount(asset_in.balance.amount)?)?
            .checked_div(Decimal::one().checked_sub(self.fee)?)?;

        Ok(asset_in.balance.with_amount(amount_in.to_amount_ceil()))
    }

    /// Pool tokens minted for a single-asset deposit. The fee is charged on the part
    /// of the deposit that unbalances the pool:
    /// `in' = amount · (1 - (1 - w) · fee)`, `shares = supply · ((1 + in' / B)^w - 1)`.
    pub fn deposit_single_asset(&self, token: &Coin) -> Result<Coin, InterchainSwapError> {
        let asset = self.pool.find_asset_by_denom(&token.denom)?;
        if self.pool.supply.is_zero() {
            return Err(insufficient_liquidity(asset, token.amount));
        }

        let fee_share = Decimal::one()
            .checked_sub(asset.weight)?
            .checked_mul(self.fee)?;
        let amount_in =
            Decimal::from_amount(token.amount)?.checked_mul(Decimal::one().checked_sub(fee_share)?)?;

        let growth = Decimal::one()
            .checked_add(amount_in.checked_div(Decimal::from_amount(asset.balance.amount)?)?)?
            .pow(asset.weight)?
            .checked_sub(Decimal::one())?;

        Ok(self
            .pool
            .pool_token(growth.mul_floor(self.pool.supply.amount)?))
    }

    /// Pool tokens minted for a deposit of every pool asset, proportional to the
    /// scarcest leg.
    pub fn deposit_multi_asset(
        &self,
        deposits: &[Coin],
    ) -> Result<MultiDepositQuote, InterchainSwapError> {
        self.check_deposit_composition(deposits)?;

        let mut ratio: Option<Decimal> = None;
        for deposit in deposits {
            let asset = self.pool.find_asset_by_denom(&deposit.denom)?;
            let leg_ratio = Decimal::from_ratio(deposit.amount, asset.balance.amount)?;
            ratio = Some(ratio.map_or(leg_ratio, |r| r.min(leg_ratio)));
        }
        let ratio = ratio.ok_or_else(|| InterchainSwapError::InvalidDepositComposition {
            reason: "no deposits".to_string(),
        })?;

        Ok(MultiDepositQuote {
            ratio,
            total_shares: ratio.mul_floor(self.pool.supply.amount)?,
        })
    }

    /// Splits minted pool tokens among depositors by the weight of the asset each of
    /// them provided. The last depositor receives the rounding remainder.
    pub fn allocate_shares(
        &self,
        deposits: &[DepositAsset],
        total_shares: Amount,
    ) -> Result<Vec<DepositAsset>, InterchainSwapError> {
        let mut allocated = Amount::zero();
        let mut settlement = Vec::with_capacity(deposits.len());

        for (index, deposit) in deposits.iter().enumerate() {
            let share = if index + 1 == deposits.len() {
                total_shares
                    .checked_sub(allocated)
                    .ok_or(InterchainSwapError::Overflow)?
            } else {
                let weight = self.pool.find_asset_by_denom(&deposit.balance.denom)?.weight;
                weight.mul_floor(total_shares)?
            };
            allocated = allocated
                .checked_add(share)
                .ok_or(InterchainSwapError::Overflow)?;
            settlement.push(DepositAsset::new(
                deposit.sender.clone(),
                self.pool.pool_token(share),
            ));
        }

        Ok(settlement)
    }

    /// Fails unless every leg's share of its pool balance lies within `tolerance_bps`
    /// of `ratio`.
    pub fn check_deposit_ratio(
        &self,
        deposits: &[Coin],
        ratio: Decimal,
        tolerance_bps: u64,
    ) -> Result<(), InterchainSwapError> {
        let tolerance = Decimal::bps(tolerance_bps);

        for deposit in deposits {
            let asset = self.pool.find_asset_by_denom(&deposit.denom)?;
            let leg_ratio = Decimal::from_ratio(deposit.amount, asset.balance.amount)?;
            let deviation = leg_ratio.abs_diff(ratio).checked_div(ratio)?;

            if deviation > tolerance {
                let deviation_bps = Decimal::from_amount(Amount::from(MAXIMUM_SLIPPAGE))?
                    .checked_mul(deviation)?
                    .to_amount_floor();
                return Err(InterchainSwapError::DepositRatioMismatch {
                    denom: deposit.denom.clone(),
                    deviation_bps: deviation_bps.as_ref().low_u64(),
                    tolerance_bps,
                });
            }
        }

        Ok(())
    }

    /// Assets released for redeeming pool tokens: `out_i = B_i · amount / supply`,
    /// rounded down.
    pub fn multi_asset_withdraw(&self, pool_token: &Coin) -> Result<Vec<Coin>, InterchainSwapError> {
        if pool_token.denom != self.pool.pool_token_denom() {
            return Err(InterchainSwapError::InvalidPoolToken {
                denom: pool_token.denom.clone(),
                expected: self.pool.pool_token_denom().to_string(),
            });
        }
        if pool_token.amount > self.pool.supply.amount {
            return Err(InterchainSwapError::InsufficientLiquidity {
                requested: pool_token.to_string(),
                available: self.pool.supply.to_string(),
            });
        }

        self.pool
            .assets
            .iter()
            .map(|asset| {
                asset
                    .balance
                    .amount
                    .checked_mul_div(pool_token.amount, self.pool.supply.amount)
                    .map(|amount| asset.balance.with_amount(amount))
                    .ok_or(InterchainSwapError::DivisionByZero)
            })
            .collect()
    }

    fn check_deposit_composition(&self, deposits: &[Coin]) -> Result<(), InterchainSwapError> {
        if deposits.len() != self.pool.assets.len() {
            return Err(InterchainSwapError::InvalidDepositComposition {
                reason: format!(
                    "expected {} deposits, got {}",
                    self.pool.assets.len(),
                    deposits.len()
                ),
            });
        }
        for asset in &self.pool.assets {
            let count = deposits
                .iter()
                .filter(|deposit| deposit.denom == asset.balance.denom)
                .count();
            if count != 1 {
                return Err(InterchainSwapError::InvalidDepositComposition {
                    reason: format!("expected one deposit of {}", asset.balance.denom),
                });
            }
        }
        Ok(())
    }

    fn pair(
        &self,
        denom_in: &str,
        denom_out: &str,
    ) -> Result<(&'a PoolAsset, &'a PoolAsset), InterchainSwapError> {
        if denom_in == denom_out {
            return Err(InterchainSwapError::SameDenomSwap {
                denom: denom_in.to_string(),
            });
        }
        Ok((
            self.pool.find_asset_by_denom(denom_in)?,
            self.pool.find_asset_by_denom(denom_out)?,
        ))
    }
}

fn insufficient_liquidity(asset: &PoolAsset, requested: Amount) -> InterchainSwapError {
    InterchainSwapError::InsufficientLiquidity {
        requested: asset.balance.with_amount(requested).to_string(),
        available: asset.balance.to_string(),
    }
}

/// Smallest output accepted for an exact-input swap quoted at `quote`.
pub fn min_amount_out(quote: Amount, slippage_bps: u64) -> Result<Amount, InterchainSwapError> {
    quote
        .checked_mul_div(
            Amount::from(MAXIMUM_SLIPPAGE.saturating_sub(slippage_bps)),
            Amount::from(MAXIMUM_SLIPPAGE),
        )
        .ok_or(InterchainSwapError::Overflow)
}

/// Largest input accepted for an exact-output swap quoted at `quote`.
pub fn max_amount_in(quote: Amount, slippage_bps: u64) -> Result<Amount, InterchainSwapError> {
    let tolerance = MAXIMUM_SLIPPAGE
        .checked_add(slippage_bps)
        .ok_or(InterchainSwapError::InvalidSlippage {
            slippage: slippage_bps,
        })?;
    quote
        .checked_mul_div(
            Amount::from(tolerance),
            Amount::from(MAXIMUM_SLIPPAGE),
        )
        .ok_or(InterchainSwapError::Overflow)
}
