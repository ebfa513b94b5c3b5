use ibc_core::primitives::Signer;

/// Returns a dummy account, for testing purposes only!
pub fn dummy_account_id() -> Signer {
    "cosmos1wxeyh7zgn4tctjzs0vtqpc6p5cxq5t2muzl7ng".to_string().into()
}

/// Returns a signer for the given address.
pub fn account(address: &str) -> Signer {
    address.to_string().into()
}
