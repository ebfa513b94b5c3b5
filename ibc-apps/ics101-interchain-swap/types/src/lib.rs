//! Implementation of the IBC [interchain swap](https://github.com/cosmos/ibc/blob/main/spec/app/ics-101-interchain-swap/README.md) (ICS-101) data structures.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

extern crate alloc;
#[cfg(any(test, feature = "std"))]
extern crate std;

mod amount;
mod coin;
mod config;
mod decimal;
mod order;
mod pool;
mod timeout;

pub use amount::*;
pub use coin::*;
pub use config::*;
pub use decimal::*;
pub use order::*;
pub use pool::*;
pub use timeout::*;
pub mod ack;
pub mod error;
pub mod events;
pub mod msgs;
pub mod packet;
/// Re-exports `U256` from `primitive-types` crate for convenience.
pub use primitive_types::U256;

/// Module identifier for the ICS101 application.
pub const MODULE_ID_STR: &str = "interchainswap";

/// The port identifier that the ICS101 applications
/// typically bind with.
pub const PORT_ID_STR: &str = "interchainswap";

/// ICS101 application current version.
pub const VERSION: &str = "ics101-1";

/// Upper bound of the slippage tolerance, expressed in basis points.
pub const MAXIMUM_SLIPPAGE: u64 = 10_000;
