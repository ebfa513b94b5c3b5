//! Contains the `InterchainSwapPacketData` envelope that defines the structure of
//! interchain swap packet bytes.
use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_core::primitives::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::InterchainSwapError;
use super::Coin;

/// The request carried by an interchain swap packet.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterchainMessageType {
    Unspecified,
    MakePool,
    TakePool,
    SingleAssetDeposit,
    MakeMultiDeposit,
    TakeMultiDeposit,
    MultiWithdraw,
    LeftSwap,
    RightSwap,
}

impl InterchainMessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::MakePool => "MAKE_POOL",
            Self::TakePool => "TAKE_POOL",
            Self::SingleAssetDeposit => "SINGLE_ASSET_DEPOSIT",
            Self::MakeMultiDeposit => "MAKE_MULTI_DEPOSIT",
            Self::TakeMultiDeposit => "TAKE_MULTI_DEPOSIT",
            Self::MultiWithdraw => "MULTI_WITHDRAW",
            Self::LeftSwap => "LEFT_SWAP",
            Self::RightSwap => "RIGHT_SWAP",
        }
    }
}

impl Display for InterchainMessageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// State changes computed by the sending chain that the receiving chain applies or
/// checks against its own computation.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StateChange {
    pub in_tokens: Vec<Coin>,
    pub out_tokens: Vec<Coin>,
    pub pool_tokens: Vec<Coin>,
    pub pool_id: Option<String>,
    pub order_id: Option<u64>,
}

/// Defines the structure of interchain swap packet bytes.
///
/// `data` is the JSON encoding of the originating message and `state_change` the
/// JSON encoding of a [`StateChange`], both base64 encoded on the wire.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InterchainSwapPacketData {
    #[serde(rename = "type")]
    pub msg_type: InterchainMessageType,
    #[cfg_attr(feature = "schema", schemars(with = "String"))]
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
    #[cfg_attr(feature = "schema", schemars(with = "Option<String>"))]
    #[serde(default, with = "base64_opt_bytes")]
    pub state_change: Option<Vec<u8>>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl InterchainSwapPacketData {
    pub fn new<T: Serialize>(
        msg_type: InterchainMessageType,
        msg: &T,
        state_change: Option<&StateChange>,
    ) -> Self {
        Self {
            msg_type,
            data: serde_json::to_vec(msg).expect("Msg's infallible Serialize impl failed"),
            state_change: state_change.map(|change| {
                serde_json::to_vec(change)
                    .expect("StateChange's infallible Serialize impl failed")
            }),
            memo: None,
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).expect("PacketData's infallible Serialize impl failed")
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InterchainSwapError> {
        serde_json::from_slice(bytes).map_err(|_| InterchainSwapError::PacketDataDeserialization)
    }

    /// Decodes the originating message carried in `data`.
    pub fn decode_msg<T: DeserializeOwned>(&self) -> Result<T, InterchainSwapError> {
        serde_json::from_slice(&self.data)
            .map_err(|_| InterchainSwapError::PacketDataDeserialization)
    }

    /// Decodes the state change, failing if the packet carries none.
    pub fn decode_state_change(&self) -> Result<StateChange, InterchainSwapError> {
        let bytes =
            self.state_change
                .as_ref()
                .ok_or_else(|| InterchainSwapError::MissingStateChange {
                    msg_type: self.msg_type.to_string(),
                })?;
        serde_json::from_slice(bytes).map_err(|_| InterchainSwapError::PacketDataDeserialization)
    }
}

mod base64_bytes {
    use base64::prelude::{Engine, BASE64_STANDARD};
    use ibc_core::primitives::prelude::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64_STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64_STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}

mod base64_opt_bytes {
    use base64::prelude::{Engine, BASE64_STANDARD};
    use ibc_core::primitives::prelude::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&BASE64_STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|encoded| BASE64_STANDARD.decode(encoded))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
