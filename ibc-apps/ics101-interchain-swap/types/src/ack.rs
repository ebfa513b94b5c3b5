//! Success payload of interchain swap acknowledgements.
use base64::prelude::{Engine, BASE64_STANDARD};
use ibc_core::channel::types::acknowledgement::{AcknowledgementStatus, StatusValue};
use ibc_core::primitives::prelude::*;

use crate::error::InterchainSwapError;
use crate::packet::InterchainMessageType;
use crate::Coin;

/// Result carried, base64-encoded JSON, in a successful acknowledgement.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AckResult {
    pub msg_type: InterchainMessageType,
    #[serde(default)]
    pub pool_id: Option<String>,
    #[serde(default)]
    pub order_id: Option<u64>,
    #[serde(default)]
    pub tokens: Vec<Coin>,
}

impl AckResult {
    pub fn new(msg_type: InterchainMessageType) -> Self {
        Self {
            msg_type,
            pool_id: None,
            order_id: None,
            tokens: Vec::new(),
        }
    }

    pub fn with_pool_id(mut self, pool_id: impl Into<String>) -> Self {
        self.pool_id = Some(pool_id.into());
        self
    }

    pub fn with_order_id(mut self, order_id: u64) -> Self {
        self.order_id = Some(order_id);
        self
    }

    pub fn with_tokens(mut self, tokens: Vec<Coin>) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn encode(&self) -> String {
        BASE64_STANDARD
            .encode(serde_json::to_vec(self).expect("AckResult's infallible Serialize impl failed"))
    }

    pub fn decode(value: &StatusValue) -> Result<Self, InterchainSwapError> {
        let bytes = BASE64_STANDARD
            .decode(value.to_string())
            .map_err(|_| InterchainSwapError::AckDeserialization)?;
        serde_json::from_slice(&bytes).map_err(|_| InterchainSwapError::AckDeserialization)
    }
}

/// Returns a successful acknowledgement carrying the given result.
pub fn ack_success(result: &AckResult) -> AcknowledgementStatus {
    AcknowledgementStatus::success(
        StatusValue::new(result.encode()).expect("encoded ack result is never empty"),
    )
}

/// Returns an error acknowledgement carrying the error's message.
pub fn ack_error(err: InterchainSwapError) -> AcknowledgementStatus {
    AcknowledgementStatus::error(err.into())
}
