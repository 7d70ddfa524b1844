use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("address index {0} is outside the non-hardened range")]
    IndexOutOfRange(u32),

    #[error("invalid fee seed: {0}")]
    InvalidSeed(String),

    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("random source unavailable: {0}")]
    Random(String),
}
