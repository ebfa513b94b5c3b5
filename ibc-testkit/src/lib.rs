//! In-memory host for the ICS-101 interchain swap application.
//!
//! [`context::MockSwapContext`] plays one chain: it owns a mock bank, the
//! application's registries and an outbound packet queue. [`relayer::SwapRelayer`]
//! connects two such chains and delivers packets, acknowledgements and timeouts
//! between them through the application's module callbacks.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    rust_2018_idioms
)]

pub mod context;
pub mod fixtures;
pub mod relayer;
pub mod testapp;
