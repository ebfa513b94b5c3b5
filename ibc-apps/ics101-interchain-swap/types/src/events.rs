//! Defines all interchain swap event types
use ibc_core::channel::types::acknowledgement::AcknowledgementStatus;
use ibc_core::primitives::prelude::*;
use ibc_core::primitives::Signer;
use ibc_core::router::types::event::ModuleEvent;

use crate::msgs::SwapType;
use crate::packet::InterchainMessageType;
use crate::{Coin, OrderStatus, PoolStatus, MODULE_ID_STR};

const EVENT_TYPE_PACKET: &str = "interchain_swap_packet";
const EVENT_TYPE_TIMEOUT: &str = "timeout";
const EVENT_TYPE_MAKE_POOL: &str = "make_pool";
const EVENT_TYPE_TAKE_POOL: &str = "take_pool";
const EVENT_TYPE_POOL_STATUS: &str = "pool_status";
const EVENT_TYPE_SINGLE_DEPOSIT: &str = "single_asset_deposit";
const EVENT_TYPE_ORDER: &str = "order";
const EVENT_TYPE_WITHDRAW: &str = "multi_asset_withdraw";
const EVENT_TYPE_SWAP: &str = "swap";

fn join_coins(coins: &[Coin]) -> String {
    coins
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Contains all events variants that can be emitted from the interchain swap application
pub enum Event {
    Recv(RecvEvent),
    Ack(AckEvent),
    Timeout(TimeoutEvent),
    MakePool(MakePoolEvent),
    TakePool(TakePoolEvent),
    PoolStatus(PoolStatusEvent),
    SingleAssetDeposit(SingleAssetDepositEvent),
    Order(OrderEvent),
    Withdraw(WithdrawEvent),
    Swap(SwapEvent),
}

/// Event emitted by the `onRecvPacket` module callback
pub struct RecvEvent {
    pub msg_type: InterchainMessageType,
    pub pool_id: String,
    pub success: bool,
}

impl From<RecvEvent> for ModuleEvent {
    fn from(ev: RecvEvent) -> Self {
        let RecvEvent {
            msg_type,
            pool_id,
            success,
        } = ev;
        Self {
            kind: EVENT_TYPE_PACKET.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("msg_type", msg_type).into(),
                ("pool_id", pool_id).into(),
                ("success", success).into(),
            ],
        }
    }
}

/// Event emitted in the `onAcknowledgePacket` module callback
pub struct AckEvent {
    pub msg_type: InterchainMessageType,
    pub pool_id: String,
    pub acknowledgement: AcknowledgementStatus,
}

impl From<AckEvent> for ModuleEvent {
    fn from(ev: AckEvent) -> Self {
        let AckEvent {
            msg_type,
            pool_id,
            acknowledgement,
        } = ev;
        let (status_key, status) = if acknowledgement.is_successful() {
            ("success", acknowledgement.to_string())
        } else {
            ("error", acknowledgement.to_string())
        };
        Self {
            kind: EVENT_TYPE_PACKET.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("msg_type", msg_type).into(),
                ("pool_id", pool_id).into(),
                (status_key, status).into(),
            ],
        }
    }
}

/// Event emitted in the `onTimeoutPacket` module callback
pub struct TimeoutEvent {
    pub msg_type: InterchainMessageType,
    pub pool_id: String,
    pub refunded: bool,
}

impl From<TimeoutEvent> for ModuleEvent {
    fn from(ev: TimeoutEvent) -> Self {
        let TimeoutEvent {
            msg_type,
            pool_id,
            refunded,
        } = ev;
        Self {
            kind: EVENT_TYPE_TIMEOUT.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("msg_type", msg_type).into(),
                ("pool_id", pool_id).into(),
                ("refunded", refunded).into(),
            ],
        }
    }
}

/// Event emitted when a pool is made on the source chain
pub struct MakePoolEvent {
    pub pool_id: String,
    pub creator: Signer,
    pub counterparty_creator: Signer,
    pub source_chain_id: String,
    pub destination_chain_id: String,
    pub liquidity: Vec<Coin>,
}

impl From<MakePoolEvent> for ModuleEvent {
    fn from(ev: MakePoolEvent) -> Self {
        let MakePoolEvent {
            pool_id,
            creator,
            counterparty_creator,
            source_chain_id,
            destination_chain_id,
            liquidity,
        } = ev;
        Self {
            kind: EVENT_TYPE_MAKE_POOL.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("pool_id", pool_id).into(),
                ("creator", creator).into(),
                ("counterparty_creator", counterparty_creator).into(),
                ("source_chain_id", source_chain_id).into(),
                ("destination_chain_id", destination_chain_id).into(),
                ("liquidity", join_coins(&liquidity)).into(),
            ],
        }
    }
}

/// Event emitted when a pool is taken on the destination chain
pub struct TakePoolEvent {
    pub pool_id: String,
    pub taker: Signer,
    pub liquidity: Vec<Coin>,
}

impl From<TakePoolEvent> for ModuleEvent {
    fn from(ev: TakePoolEvent) -> Self {
        let TakePoolEvent {
            pool_id,
            taker,
            liquidity,
        } = ev;
        Self {
            kind: EVENT_TYPE_TAKE_POOL.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("pool_id", pool_id).into(),
                ("taker", taker).into(),
                ("liquidity", join_coins(&liquidity)).into(),
            ],
        }
    }
}

/// Event emitted whenever a pool changes status
pub struct PoolStatusEvent {
    pub pool_id: String,
    pub status: PoolStatus,
    pub supply: Coin,
}

impl From<PoolStatusEvent> for ModuleEvent {
    fn from(ev: PoolStatusEvent) -> Self {
        let PoolStatusEvent {
            pool_id,
            status,
            supply,
        } = ev;
        Self {
            kind: EVENT_TYPE_POOL_STATUS.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("pool_id", pool_id).into(),
                ("status", status).into(),
                ("supply", supply).into(),
            ],
        }
    }
}

pub struct SingleAssetDepositEvent {
    pub pool_id: String,
    pub sender: Signer,
    pub token: Coin,
    pub shares: Coin,
}

impl From<SingleAssetDepositEvent> for ModuleEvent {
    fn from(ev: SingleAssetDepositEvent) -> Self {
        let SingleAssetDepositEvent {
            pool_id,
            sender,
            token,
            shares,
        } = ev;
        Self {
            kind: EVENT_TYPE_SINGLE_DEPOSIT.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("pool_id", pool_id).into(),
                ("sender", sender).into(),
                ("token", token).into(),
                ("shares", shares).into(),
            ],
        }
    }
}

/// Event emitted whenever a two-phase order changes status
pub struct OrderEvent {
    pub pool_id: String,
    /// `{pool_id}-{order_id}`
    pub order_key: String,
    pub status: OrderStatus,
}

impl From<OrderEvent> for ModuleEvent {
    fn from(ev: OrderEvent) -> Self {
        let OrderEvent {
            pool_id,
            order_key,
            status,
        } = ev;
        Self {
            kind: EVENT_TYPE_ORDER.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("pool_id", pool_id).into(),
                ("order_id", order_key).into(),
                ("status", status).into(),
            ],
        }
    }
}

pub struct WithdrawEvent {
    pub pool_id: String,
    pub receiver: Signer,
    pub pool_token: Coin,
    pub out_tokens: Vec<Coin>,
}

impl From<WithdrawEvent> for ModuleEvent {
    fn from(ev: WithdrawEvent) -> Self {
        let WithdrawEvent {
            pool_id,
            receiver,
            pool_token,
            out_tokens,
        } = ev;
        Self {
            kind: EVENT_TYPE_WITHDRAW.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("pool_id", pool_id).into(),
                ("receiver", receiver).into(),
                ("pool_token", pool_token).into(),
                ("out_tokens", join_coins(&out_tokens)).into(),
            ],
        }
    }
}

pub struct SwapEvent {
    pub pool_id: String,
    pub swap_type: SwapType,
    pub sender: Signer,
    pub recipient: Signer,
    pub token_in: Coin,
    pub token_out: Coin,
}

impl From<SwapEvent> for ModuleEvent {
    fn from(ev: SwapEvent) -> Self {
        let SwapEvent {
            pool_id,
            swap_type,
            sender,
            recipient,
            token_in,
            token_out,
        } = ev;
        Self {
            kind: EVENT_TYPE_SWAP.to_string(),
            attributes: vec![
                ("module", MODULE_ID_STR).into(),
                ("pool_id", pool_id).into(),
                ("swap_type", swap_type).into(),
                ("sender", sender).into(),
                ("recipient", recipient).into(),
                ("token_in", token_in).into(),
                ("token_out", token_out).into(),
            ],
        }
    }
}

impl From<Event> for ModuleEvent {
    fn from(ev: Event) -> Self {
        match ev {
            Event::Recv(ev) => ev.into(),
            Event::Ack(ev) => ev.into(),
            Event::Timeout(ev) => ev.into(),
            Event::MakePool(ev) => ev.into(),
            Event::TakePool(ev) => ev.into(),
            Event::PoolStatus(ev) => ev.into(),
            Event::SingleAssetDeposit(ev) => ev.into(),
            Event::Order(ev) => ev.into(),
            Event::Withdraw(ev) => ev.into(),
            Event::Swap(ev) => ev.into(),
        }
    }
}
