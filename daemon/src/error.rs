use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Network(#[from] vsp_types::NetworkError),

    #[error("store error: {0}")]
    Store(#[from] vsp_store_lmdb::LmdbError),

    #[error("database failed integrity check: {0}")]
    Integrity(String),

    #[error("fee seed error: {0}")]
    Crypto(#[from] vsp_crypto::CryptoError),

    #[error("fee issuer error: {0}")]
    Fee(#[from] vsp_fees::FeeError),

    #[error("node RPC error: {0}")]
    Rpc(#[from] vsp_rpc::RpcError),

    #[error("web API error: {0}")]
    WebApi(#[from] vsp_webapi::WebApiError),

    #[error("logging error: {0}")]
    Logging(#[from] vsp_utils::LoggingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
