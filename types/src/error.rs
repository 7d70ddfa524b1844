//! Error types shared across crates.

use thiserror::Error;

/// Failure to select a deployment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("{0:?} is not a supported network")]
    UnsupportedNetwork(String),
}

/// Failure to parse or convert a primitive value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VspError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("invalid ticket hash: {0}")]
    InvalidHash(String),

    #[error("fee status cannot move from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error(transparent)]
    Network(#[from] NetworkError),
}
