//! Defines the timeout bounds carried by interchain swap messages, packets and orders.
use core::fmt::{Display, Error as FmtError, Formatter};

use crate::error::InterchainSwapError;

/// A height and timestamp bound after which an operation is void.
///
/// A zero value leaves the corresponding bound unset. The timestamp is expressed in
/// nanoseconds since the Unix epoch.
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Timeout {
    pub height: u64,
    pub timestamp: u64,
}

impl Timeout {
    pub fn new(height: u64, timestamp: u64) -> Self {
        Self { height, timestamp }
    }

    pub fn at_height(height: u64) -> Self {
        Self {
            height,
            timestamp: 0,
        }
    }

    pub fn at_timestamp(timestamp: u64) -> Self {
        Self {
            height: 0,
            timestamp,
        }
    }

    pub fn is_set(&self) -> bool {
        self.height != 0 || self.timestamp != 0
    }

    /// Returns an error if neither the height nor the timestamp bound is set.
    pub fn validate(&self) -> Result<(), InterchainSwapError> {
        if self.is_set() {
            Ok(())
        } else {
            Err(InterchainSwapError::MissingTimeout)
        }
    }

    /// Returns true once the host has reached either bound.
    pub fn has_expired(&self, host_height: u64, host_timestamp: u64) -> bool {
        let height_expired = self.height != 0 && host_height >= self.height;
        let timestamp_expired = self.timestamp != 0 && host_timestamp >= self.timestamp;
        height_expired || timestamp_expired
    }
}

impl Display for Timeout {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "height: {}, timestamp: {}",
            self.height, self.timestamp
        )
    }
}
