//! A minimal multi-denomination bank backing the mock host.
use std::collections::BTreeMap;

use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::{Amount, Coin};

/// Balances indexed by `(account, denom)`.
#[derive(Clone, Debug, Default)]
pub struct MockBank {
    balances: BTreeMap<(String, String), Amount>,
}

impl MockBank {
    pub fn balance(&self, account: &str, denom: &str) -> Amount {
        self.balances
            .get(&(account.to_string(), denom.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Total amount of `denom` held across all accounts.
    pub fn supply(&self, denom: &str) -> Result<Amount, InterchainSwapError> {
        self.balances
            .iter()
            .filter(|((_, d), _)| d == denom)
            .try_fold(Amount::zero(), |acc, (_, amount)| {
                acc.checked_add(*amount).ok_or(InterchainSwapError::Overflow)
            })
    }

    /// Fails unless `account` holds at least `coin`.
    pub fn ensure_balance(&self, account: &str, coin: &Coin) -> Result<(), InterchainSwapError> {
        let available = self.balance(account, &coin.denom);
        if available < coin.amount {
            return Err(InterchainSwapError::InsufficientFunds {
                requested: coin.to_string(),
                available: coin.with_amount(available).to_string(),
            });
        }
        Ok(())
    }

    pub fn mint(&mut self, account: &str, coin: &Coin) -> Result<(), InterchainSwapError> {
        let entry = self
            .balances
            .entry((account.to_string(), coin.denom.clone()))
            .or_default();
        *entry = entry
            .checked_add(coin.amount)
            .ok_or(InterchainSwapError::Overflow)?;
        Ok(())
    }

    pub fn burn(&mut self, account: &str, coin: &Coin) -> Result<(), InterchainSwapError> {
        self.ensure_balance(account, coin)?;
        let key = (account.to_string(), coin.denom.clone());
        let remaining = self
            .balance(account, &coin.denom)
            .checked_sub(coin.amount)
            .ok_or(InterchainSwapError::Overflow)?;
        if remaining.is_zero() {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, remaining);
        }
        Ok(())
    }

    pub fn transfer(&mut self, from: &str, to: &str, coin: &Coin) -> Result<(), InterchainSwapError> {
        self.burn(from, coin)?;
        self.mint(to, coin)
    }
}
