//! Host trait implementations of the interchain swap application for
//! [`MockSwapContext`](crate::context::MockSwapContext).
mod context;
