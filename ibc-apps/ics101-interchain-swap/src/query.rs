//! Read-only views over the state of the interchain swap application.
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::{
    Coin, InterchainLiquidityPool, InterchainSwapConfig, Order, VERSION,
};
use ibc_core::host::types::identifiers::PortId;
use ibc_core::primitives::prelude::*;

use crate::amm::InterchainMarketMaker;
use crate::context::InterchainSwapValidationContext;

/// Position and size of a page of a list query.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageRequest {
    /// Key of the last item of the previous page.
    pub start_after: Option<String>,
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self {
            start_after: None,
            limit: Some(limit),
        }
    }

    pub fn after(start_after: impl Into<String>, limit: u32) -> Self {
        Self {
            start_after: Some(start_after.into()),
            limit: Some(limit),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConfigResponse {
    pub config: InterchainSwapConfig,
    pub port_id: PortId,
    pub version: String,
    pub chain_id: String,
}

pub fn query_config(
    ctx: &impl InterchainSwapValidationContext,
) -> Result<ConfigResponse, InterchainSwapError> {
    Ok(ConfigResponse {
        config: ctx.config().clone(),
        port_id: ctx.get_port()?,
        version: VERSION.to_string(),
        chain_id: ctx.chain_id(),
    })
}

pub fn query_order(
    ctx: &impl InterchainSwapValidationContext,
    order_id: u64,
    pool_id: &str,
) -> Result<Order, InterchainSwapError> {
    ctx.order_registry().get(pool_id, order_id).cloned()
}

/// Orders in creation order, optionally of one pool only. Pages are keyed by
/// `{pool_id}-{order_id}`.
pub fn query_order_list(
    ctx: &impl InterchainSwapValidationContext,
    pool_id: Option<&str>,
    page: &PageRequest,
) -> Vec<Order> {
    let limit = ctx.config().query_limit(page.limit);
    ctx.order_registry()
        .page(pool_id, page.start_after.as_deref(), limit)
        .into_iter()
        .cloned()
        .collect()
}

/// Pools in creation order. Pages are keyed by pool id.
pub fn query_interchain_pool_list(
    ctx: &impl InterchainSwapValidationContext,
    page: &PageRequest,
) -> Vec<InterchainLiquidityPool> {
    let limit = ctx.config().query_limit(page.limit);
    ctx.pool_registry()
        .page(page.start_after.as_deref(), limit)
        .into_iter()
        .cloned()
        .collect()
}

/// Outstanding pool token supply of each pool. Pages are keyed by pool id.
pub fn query_pool_token_list(
    ctx: &impl InterchainSwapValidationContext,
    page: &PageRequest,
) -> Vec<Coin> {
    let limit = ctx.config().query_limit(page.limit);
    ctx.pool_registry()
        .page(page.start_after.as_deref(), limit)
        .into_iter()
        .map(|pool| pool.supply.clone())
        .collect()
}

/// Id of the pool holding exactly the denominations of `tokens`, whatever their
/// order. Amounts are ignored.
pub fn query_pool_address_by_token(
    ctx: &impl InterchainSwapValidationContext,
    tokens: &[Coin],
) -> Result<String, InterchainSwapError> {
    ctx.pool_registry()
        .pool_id_by_denoms(tokens.iter().map(|token| token.denom.as_str()))
        .cloned()
        .ok_or_else(|| InterchainSwapError::PoolNotFound {
            pool_id: tokens
                .iter()
                .map(|token| token.denom.as_str())
                .collect::<Vec<_>>()
                .join(","),
        })
}

pub fn query_interchain_pool(
    ctx: &impl InterchainSwapValidationContext,
    tokens: &[Coin],
) -> Result<InterchainLiquidityPool, InterchainSwapError> {
    let pool_id = query_pool_address_by_token(ctx, tokens)?;
    ctx.pool_registry().get(&pool_id).cloned()
}

/// Output of swapping exactly `token_in` at the pool's current balances.
pub fn query_left_swap(
    ctx: &impl InterchainSwapValidationContext,
    pool_id: &str,
    token_in: &Coin,
    denom_out: &str,
) -> Result<Coin, InterchainSwapError> {
    let pool = ctx.pool_registry().get(pool_id)?;
    pool.ensure_active()?;
    InterchainMarketMaker::new(pool).left_swap(token_in, denom_out)
}

/// Input needed to receive exactly `token_out` at the pool's current balances.
pub fn query_right_swap(
    ctx: &impl InterchainSwapValidationContext,
    pool_id: &str,
    denom_in: &str,
    token_out: &Coin,
) -> Result<Coin, InterchainSwapError> {
    let pool = ctx.pool_registry().get(pool_id)?;
    pool.ensure_active()?;
    InterchainMarketMaker::new(pool).right_swap(denom_in, token_out)
}
