//! Implementation of the IBC [Interchain
//! Swap](https://github.com/cosmos/ibc/blob/main/spec/app/ics-101-interchain-swap/README.md)
//! (ICS-101) application logic.
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

pub mod amm;
pub mod context;
pub mod escrow;
pub mod handler;
pub mod module;
pub mod query;
pub mod registry;

/// Re-exports the implementation of the IBC [Interchain
/// Swap](https://github.com/cosmos/ibc/blob/main/spec/app/ics-101-interchain-swap/README.md)
/// (ICS-101) data structures.
pub mod types {
    #[doc(inline)]
    pub use ibc_app_interchain_swap_types::*;
}
