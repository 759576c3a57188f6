use ethereum_types::H256;
use jsonrpsee::types::ErrorObjectOwned;
use thiserror::Error;

/// JSON-RPC error code for malformed parameters.
pub const INVALID_PARAMS_CODE: i32 = -32602;
/// JSON-RPC error code for everything the adaptor fails on internally.
pub const INTERNAL_ERROR_CODE: i32 = -32603;

/// Classified failures of a single adaptor request.
#[derive(Debug, Error)]
pub enum AdaptorError {
    /// The Script node could not be reached, timed out, or answered with
    /// something that is not a JSON-RPC envelope.
    #[error("Script RPC transport error: {0}")]
    Transport(String),

    /// The Script node answered with a protocol-level error object.
    #[error("{message}")]
    Remote { code: i64, message: String },

    /// The result payload did not match the expected shape.
    #[error("Failed to decode Script RPC result: {0}")]
    Decode(String),

    /// The node ran a simulated call and the EVM reported an error.
    #[error("{0}")]
    Execution(String),

    #[error("empty block")]
    EmptyBlock,

    #[error("could not find hash for tx {0:?}")]
    TransactionNotFound(H256),

    #[error("transaction index out of range: {index} >= {count}")]
    IndexOutOfRange { index: u64, count: usize },

    #[error("invalid params: {0}")]
    InvalidParams(String),
}

impl AdaptorError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        AdaptorError::InvalidParams(message.into())
    }
}

impl From<serde_json::Error> for AdaptorError {
    fn from(err: serde_json::Error) -> Self {
        AdaptorError::Decode(err.to_string())
    }
}

impl From<AdaptorError> for ErrorObjectOwned {
    fn from(err: AdaptorError) -> Self {
        let code = match err {
            AdaptorError::InvalidParams(_) => INVALID_PARAMS_CODE,
            _ => INTERNAL_ERROR_CODE,
        };
        ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
    }
}
