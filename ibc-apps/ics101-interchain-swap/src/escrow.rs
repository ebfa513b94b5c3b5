//! Refund bookkeeping for assets held by the application while a cross-chain
//! operation is unresolved.
//!
//! Every packet the application sends records an [`EscrowEntry`] under the packet's
//! key. Acknowledgement and timeout callbacks *take* the entry, so a second delivery
//! of the same outcome finds nothing and leaves state untouched. Liquidity that
//! outlives its packet, such as a pending deposit order or a made but not yet taken
//! pool, is recorded under an order or pool key instead.
use alloc::collections::BTreeMap;
use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_app_interchain_swap_types::packet::InterchainMessageType;
use ibc_app_interchain_swap_types::{Amount, Coin};
use ibc_core::host::types::identifiers::{ChannelId, PortId, Sequence};
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;

/// Key of an escrow entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EscrowKey {
    /// An in-flight packet.
    Packet {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
    },
    /// A pending two-phase order.
    Order { pool_id: String, order_id: u64 },
    /// A made pool waiting to be taken.
    Pool { pool_id: String },
}

impl EscrowKey {
    pub fn packet(port_id: &PortId, channel_id: &ChannelId, sequence: Sequence) -> Self {
        Self::Packet {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
        }
    }

    pub fn order(pool_id: &str, order_id: u64) -> Self {
        Self::Order {
            pool_id: pool_id.to_string(),
            order_id,
        }
    }

    pub fn pool(pool_id: &str) -> Self {
        Self::Pool {
            pool_id: pool_id.to_string(),
        }
    }

    pub fn is_packet(&self) -> bool {
        matches!(self, Self::Packet { .. })
    }
}

impl Display for EscrowKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Packet {
                port_id,
                channel_id,
                sequence,
            } => write!(f, "{port_id}/{channel_id}/{sequence}"),
            Self::Order { pool_id, order_id } => write!(f, "order/{pool_id}-{order_id}"),
            Self::Pool { pool_id } => write!(f, "pool/{pool_id}"),
        }
    }
}

/// How to give back what an operation took from an account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refund {
    /// Release escrowed coins back to the account.
    Unescrow { account: Signer, coin: Coin },
    /// Mint burned pool tokens back to the account.
    Remint { account: Signer, coin: Coin },
}

impl Refund {
    pub fn coin(&self) -> &Coin {
        match self {
            Self::Unescrow { coin, .. } | Self::Remint { coin, .. } => coin,
        }
    }

    pub fn account(&self) -> &Signer {
        match self {
            Self::Unescrow { account, .. } | Self::Remint { account, .. } => account,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EscrowEntry {
    pub msg_type: InterchainMessageType,
    pub pool_id: String,
    pub order_id: Option<u64>,
    pub refunds: Vec<Refund>,
}

impl EscrowEntry {
    pub fn new(msg_type: InterchainMessageType, pool_id: impl Into<String>) -> Self {
        Self {
            msg_type,
            pool_id: pool_id.into(),
            order_id: None,
            refunds: Vec::new(),
        }
    }

    pub fn with_order_id(mut self, order_id: u64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_refunds(mut self, refunds: Vec<Refund>) -> Self {
        self.refunds = refunds;
        self
    }
}

/// Unresolved escrow entries of one chain.
#[derive(Clone, Debug, Default)]
pub struct EscrowLedger {
    entries: BTreeMap<EscrowKey, EscrowEntry>,
}

impl EscrowLedger {
    pub fn record(&mut self, key: EscrowKey, entry: EscrowEntry) {
        self.entries.insert(key, entry);
    }

    /// Removes and returns the entry, if it is still unresolved.
    pub fn take(&mut self, key: &EscrowKey) -> Option<EscrowEntry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &EscrowKey) -> Option<&EscrowEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &EscrowKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EscrowKey, &EscrowEntry)> {
        self.entries.iter()
    }

    /// Whether a packet concerning the given order is still awaiting its outcome.
    pub fn has_packet_in_flight(&self, pool_id: &str, order_id: u64) -> bool {
        self.entries.iter().any(|(key, entry)| {
            key.is_packet() && entry.pool_id == pool_id && entry.order_id == Some(order_id)
        })
    }

    /// Drops the refunds held for making `pool_id` once its liquidity belongs to
    /// the active pool.
    pub fn release_pool(&mut self, pool_id: &str) {
        self.entries.remove(&EscrowKey::pool(pool_id));
        self.entries
            .values_mut()
            .filter(|entry| {
                entry.msg_type == InterchainMessageType::MakePool && entry.pool_id == pool_id
            })
            .for_each(|entry| entry.refunds.clear());
    }

    /// Amount of `denom` that unresolved entries would release from escrow.
    pub fn escrowed_amount(&self, denom: &str) -> Result<Amount, InterchainSwapError> {
        self.entries
            .values()
            .flat_map(|entry| entry.refunds.iter())
            .filter_map(|refund| match refund {
                Refund::Unescrow { coin, .. } if coin.denom == denom => Some(coin.amount),
                _ => None,
            })
            .try_fold(Amount::zero(), |acc, amount| {
                acc.checked_add(amount).ok_or(InterchainSwapError::Overflow)
            })
    }
}
