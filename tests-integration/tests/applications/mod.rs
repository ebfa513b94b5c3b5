pub mod interchain_swap;
