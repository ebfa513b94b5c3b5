use displaydoc::Display;
use ibc_app_interchain_swap_types::error::InterchainSwapError;
use ibc_core::host::types::identifiers::Sequence;

#[derive(Debug, Display)]
pub enum RelayerError {
    /// module callback failed on `{chain_id}`: `{error}`
    CallbackFailed {
        chain_id: String,
        error: InterchainSwapError,
    },
    /// acknowledgement of packet `{sequence}` could not be decoded
    InvalidAcknowledgement { sequence: Sequence },
}

impl std::error::Error for RelayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::CallbackFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}
