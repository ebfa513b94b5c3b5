//! In-memory registries of pools and orders, kept by the host between blocks.
use alloc::collections::BTreeMap;

use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::{
    denom_set_key, InterchainLiquidityPool, Order, OrderStatus, PoolSide, PoolStatus,
};
use ibc_core::primitives::prelude::*;

/// Pools known to one chain, listed in insertion order.
#[derive(Clone, Debug, Default)]
pub struct PoolRegistry {
    pools: BTreeMap<String, InterchainLiquidityPool>,
    insertion_order: Vec<String>,
    by_denoms: BTreeMap<String, String>,
}

impl PoolRegistry {
    pub fn get(&self, pool_id: &str) -> Result<&InterchainLiquidityPool, InterchainSwapError> {
        self.pools
            .get(pool_id)
            .ok_or_else(|| InterchainSwapError::PoolNotFound {
                pool_id: pool_id.to_string(),
            })
    }

    pub fn get_mut(
        &mut self,
        pool_id: &str,
    ) -> Result<&mut InterchainLiquidityPool, InterchainSwapError> {
        self.pools
            .get_mut(pool_id)
            .ok_or_else(|| InterchainSwapError::PoolNotFound {
                pool_id: pool_id.to_string(),
            })
    }

    pub fn contains(&self, pool_id: &str) -> bool {
        self.pools.contains_key(pool_id)
    }

    /// Fails if a pool with this id exists and has not failed.
    pub fn ensure_available(&self, pool_id: &str) -> Result<(), InterchainSwapError> {
        match self.pools.get(pool_id) {
            Some(pool) if pool.status != PoolStatus::Failed => {
                Err(InterchainSwapError::PoolAlreadyExists {
                    pool_id: pool_id.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Stores a new pool, replacing a failed one with the same id.
    pub fn insert(&mut self, pool: InterchainLiquidityPool) -> Result<(), InterchainSwapError> {
        self.ensure_available(&pool.id)?;

        let denoms = denom_set_key(pool.assets.iter().map(|a| a.balance.denom.as_str()));
        if !self.pools.contains_key(&pool.id) {
            self.insertion_order.push(pool.id.clone());
        }
        self.by_denoms.insert(denoms, pool.id.clone());
        self.pools.insert(pool.id.clone(), pool);

        Ok(())
    }

    /// Looks a pool id up by the denominations of its assets, in any order.
    pub fn pool_id_by_denoms<'a>(
        &self,
        denoms: impl IntoIterator<Item = &'a str>,
    ) -> Option<&String> {
        self.by_denoms.get(&denom_set_key(denoms))
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterchainLiquidityPool> {
        self.insertion_order
            .iter()
            .filter_map(|pool_id| self.pools.get(pool_id))
    }

    /// Returns at most `limit` pools listed after `start_after`.
    pub fn page(&self, start_after: Option<&str>, limit: usize) -> Vec<&InterchainLiquidityPool> {
        paginate(self.iter(), |pool| pool.id.as_str(), start_after, limit)
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

/// Orders known to one chain, listed in insertion order.
///
/// Order ids are allocated per pool and split between the two chains: the chain
/// custodying the `SOURCE` side hands out odd ids and the other chain even ones.
/// Orders mirrored from the counterparty keep the id their initiator allocated and
/// advance the local counter past it, so ids still grow on both chains.
#[derive(Clone, Debug, Default)]
pub struct OrderRegistry {
    orders: BTreeMap<String, Order>,
    insertion_order: Vec<String>,
    counters: BTreeMap<String, u64>,
}

impl OrderRegistry {
    /// Id the next order of the pool made on the chain custodying `side` will get.
    pub fn next_order_id(&self, pool_id: &str, side: PoolSide) -> u64 {
        let next = self.counters.get(pool_id).copied().unwrap_or(0) + 1;
        if order_id_side(next) == side {
            next
        } else {
            next + 1
        }
    }

    pub fn insert(&mut self, order: Order) -> Result<(), InterchainSwapError> {
        let key = order.key();
        if self.orders.contains_key(&key) {
            return Err(InterchainSwapError::OrderAlreadyExists {
                pool_id: order.pool_id,
                order_id: order.id,
            });
        }

        let counter = self.counters.entry(order.pool_id.clone()).or_default();
        *counter = (*counter).max(order.id);

        self.insertion_order.push(key.clone());
        self.orders.insert(key, order);

        Ok(())
    }

    pub fn get(&self, pool_id: &str, order_id: u64) -> Result<&Order, InterchainSwapError> {
        self.orders
            .get(&order_key(pool_id, order_id))
            .ok_or_else(|| InterchainSwapError::OrderNotFound {
                pool_id: pool_id.to_string(),
                order_id,
            })
    }

    pub fn get_mut(
        &mut self,
        pool_id: &str,
        order_id: u64,
    ) -> Result<&mut Order, InterchainSwapError> {
        self.orders
            .get_mut(&order_key(pool_id, order_id))
            .ok_or_else(|| InterchainSwapError::OrderNotFound {
                pool_id: pool_id.to_string(),
                order_id,
            })
    }

    pub fn set_status(
        &mut self,
        pool_id: &str,
        order_id: u64,
        status: OrderStatus,
    ) -> Result<(), InterchainSwapError> {
        self.get_mut(pool_id, order_id)?.status = status;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.insertion_order
            .iter()
            .filter_map(|key| self.orders.get(key))
    }

    pub fn pending(&self) -> impl Iterator<Item = &Order> {
        self.iter().filter(|order| order.is_pending())
    }

    /// Returns at most `limit` orders listed after the order keyed `start_after`,
    /// optionally restricted to one pool.
    pub fn page(
        &self,
        pool_id: Option<&str>,
        start_after: Option<&str>,
        limit: usize,
    ) -> Vec<&Order> {
        let orders = self
            .iter()
            .filter(|order| pool_id.map_or(true, |pool_id| order.pool_id == pool_id));
        let keys: Vec<(String, &Order)> = orders.map(|order| (order.key(), order)).collect();

        paginate(keys.iter(), |(key, _)| key.as_str(), start_after, limit)
            .into_iter()
            .map(|(_, order)| *order)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

/// Side of the pool whose chain allocates `order_id`.
pub fn order_id_side(order_id: u64) -> PoolSide {
    if order_id % 2 == 1 {
        PoolSide::Source
    } else {
        PoolSide::Destination
    }
}

fn order_key(pool_id: &str, order_id: u64) -> String {
    format!("{pool_id}-{order_id}")
}

fn paginate<'a, T, F>(
    items: impl Iterator<Item = &'a T>,
    key: F,
    start_after: Option<&str>,
    limit: usize,
) -> Vec<&'a T>
where
    T: 'a,
    F: Fn(&T) -> &str,
{
    let mut started = start_after.is_none();
    let mut page = Vec::with_capacity(limit);

    for item in items {
        if !started {
            started = Some(key(item)) == start_after;
            continue;
        }
        if page.len() == limit {
            break;
        }
        page.push(item);
    }

    page
}
