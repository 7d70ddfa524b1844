//! RPC client error types.

use thiserror::Error;
use vsp_chain::NodeError;

/// dcrd's "no information available about transaction" error code.
pub const ERR_NO_TX_INFO: i64 = -5;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("node returned error {code}: {message}")]
    Node { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Unreachable(format!("request timed out: {e}"))
        } else if e.is_connect() {
            RpcError::Unreachable(format!("connection failed: {e}"))
        } else if e.is_decode() {
            RpcError::InvalidResponse(e.to_string())
        } else {
            RpcError::Unreachable(e.to_string())
        }
    }
}

impl From<RpcError> for NodeError {
    fn from(e: RpcError) -> Self {
        match e {
            RpcError::Node { code, message } => NodeError::Rpc { code, message },
            RpcError::InvalidResponse(msg) => NodeError::InvalidResponse(msg),
            other => NodeError::Unreachable(other.to_string()),
        }
    }
}
