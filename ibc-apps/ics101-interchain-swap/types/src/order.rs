//! Defines the two-phase orders tracked for multi-asset deposits and withdrawals.
use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

use crate::error::InterchainSwapError;
use crate::{Amount, Coin, Timeout};

#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    Deposit,
    Withdraw,
}

impl Display for OrderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::Withdraw => write!(f, "WITHDRAW"),
        }
    }
}

/// Status of an order. `COMPLETE` and `EXPIRED` are terminal.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Initial,
    Pending,
    Complete,
    Expired,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::Pending => "PENDING",
            Self::Complete => "COMPLETE",
            Self::Expired => "EXPIRED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Expired)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// A single leg of an order: who provides (or receives) which coin.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DepositAsset {
    pub sender: Signer,
    pub balance: Coin,
}

impl DepositAsset {
    pub fn new(sender: Signer, balance: Coin) -> Self {
        Self { sender, balance }
    }
}

/// A two-phase order over one pool.
///
/// For deposits, `settlement[i]` holds the pool-token shares owed to the sender of
/// `deposits[i]`. For withdrawals, `deposits` holds the burned pool tokens and
/// `settlement` the assets released to each receiver.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub id: u64,
    pub pool_id: String,
    pub kind: OrderKind,
    pub status: OrderStatus,
    pub deposits: Vec<DepositAsset>,
    pub settlement: Vec<DepositAsset>,
    pub timeout: Timeout,
    /// Host height at which the order was recorded.
    pub created_at: u64,
}

impl Order {
    /// Human-readable key, `{pool_id}-{id}`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.pool_id, self.id)
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn has_expired(&self, host_height: u64, host_timestamp: u64) -> bool {
        self.timeout.has_expired(host_height, host_timestamp)
    }

    /// Fails unless the order is still open, i.e. neither complete nor expired.
    pub fn ensure_open(&self) -> Result<(), InterchainSwapError> {
        match self.status {
            OrderStatus::Complete => Err(InterchainSwapError::OrderAlreadyComplete {
                order_id: self.id,
            }),
            OrderStatus::Expired => Err(InterchainSwapError::OrderExpired { order_id: self.id }),
            OrderStatus::Initial | OrderStatus::Pending => Ok(()),
        }
    }

    pub fn ensure_pending(&self) -> Result<(), InterchainSwapError> {
        self.ensure_open()?;
        if self.is_pending() {
            Ok(())
        } else {
            Err(InterchainSwapError::InvalidOrderStatus {
                order_id: self.id,
                status: self.status,
            })
        }
    }

    /// Sum of the settlement amounts.
    pub fn total_settlement(&self) -> Result<Amount, InterchainSwapError> {
        self.settlement
            .iter()
            .try_fold(Amount::zero(), |acc, leg| acc.checked_add(leg.balance.amount))
            .ok_or(InterchainSwapError::Overflow)
    }
}
