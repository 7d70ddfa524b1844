//! VSP configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use vsp_crypto::FeeSeed;
use vsp_fees::{FeePolicy, IssuerConfig};
use vsp_types::NetworkProfile;
use vsp_utils::LogFormat;

use crate::error::DaemonError;

/// Lowest accepted fee, in percent.
pub const MIN_VSP_FEE: f64 = 0.01;
/// Highest accepted fee, in percent.
pub const MAX_VSP_FEE: f64 = 100.0;

/// Configuration for the VSP daemon.
///
/// Can be loaded from a TOML file via [`VspConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VspConfig {
    /// Deployment name: "mainnet", "testnet" or "simnet".
    #[serde(default = "default_network")]
    pub network: String,

    /// Directory of the LMDB database.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Address the web API binds to.
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Node JSON-RPC endpoint. Derived from the network's RPC port when unset.
    #[serde(default)]
    pub node_rpc_url: Option<String>,

    #[serde(default)]
    pub node_rpc_user: String,

    #[serde(default)]
    pub node_rpc_pass: String,

    /// Refuse every fee address request.
    #[serde(default)]
    pub vsp_closed: bool,

    /// Fee in percent of the ticket vote reward.
    #[serde(default = "default_vsp_fee")]
    pub vsp_fee: f64,

    /// Relay fee floor, in coins.
    #[serde(default = "default_relay_fee")]
    pub relay_fee: f64,

    /// Confirmations a ticket needs to be recorded as confirmed.
    #[serde(default = "default_required_confirmations")]
    pub required_confirmations: i64,

    /// Seconds an issued fee stays valid.
    #[serde(default = "default_fee_expiration_secs")]
    pub fee_expiration_secs: u64,

    /// Hex-encoded 32-byte seed all fee addresses are derived from.
    #[serde(default)]
    pub fee_seed: Option<String>,

    /// Hosts of the backend voting wallets.
    #[serde(default)]
    pub voting_wallets: Vec<String>,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> String {
    "testnet".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./vsp_data")
}

fn default_listen() -> String {
    "127.0.0.1:8800".to_string()
}

fn default_vsp_fee() -> f64 {
    3.0
}

fn default_relay_fee() -> f64 {
    0.0001
}

fn default_required_confirmations() -> i64 {
    6
}

fn default_fee_expiration_secs() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl VspConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, DaemonError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DaemonError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DaemonError> {
        toml::from_str(s).map_err(|e| DaemonError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, DaemonError> {
        toml::to_string_pretty(self).map_err(|e| DaemonError::Config(e.to_string()))
    }

    /// Resolve the configured network name.
    pub fn profile(&self) -> Result<NetworkProfile, DaemonError> {
        Ok(NetworkProfile::resolve(&self.network)?)
    }

    /// Check every setting against `profile`. The daemon refuses to start
    /// when this fails.
    pub fn validate(&self, profile: &NetworkProfile) -> Result<(), DaemonError> {
        if !self.vsp_fee.is_finite() || !(MIN_VSP_FEE..=MAX_VSP_FEE).contains(&self.vsp_fee) {
            return Err(DaemonError::Invalid(format!(
                "vsp_fee {} must be between {MIN_VSP_FEE} and {MAX_VSP_FEE} percent",
                self.vsp_fee
            )));
        }
        if !self.relay_fee.is_finite() || self.relay_fee < 0.0 {
            return Err(DaemonError::Invalid(format!(
                "relay_fee {} must not be negative",
                self.relay_fee
            )));
        }
        if self.fee_expiration_secs == 0 {
            return Err(DaemonError::Invalid(
                "fee_expiration_secs must be positive".to_string(),
            ));
        }
        if self.required_confirmations < 0 {
            return Err(DaemonError::Invalid(
                "required_confirmations must not be negative".to_string(),
            ));
        }
        self.listen_addr()?;
        self.fee_seed()?;
        if self.voting_wallets.len() < profile.min_voting_wallets {
            return Err(DaemonError::Invalid(format!(
                "{} requires at least {} voting wallets, {} configured",
                profile.name,
                profile.min_voting_wallets,
                self.voting_wallets.len()
            )));
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, DaemonError> {
        self.listen
            .parse()
            .map_err(|e| DaemonError::Invalid(format!("listen {:?}: {e}", self.listen)))
    }

    pub fn fee_seed(&self) -> Result<FeeSeed, DaemonError> {
        let hex = self
            .fee_seed
            .as_deref()
            .ok_or_else(|| DaemonError::Invalid("fee_seed is required".to_string()))?;
        Ok(FeeSeed::from_hex(hex)?)
    }

    pub fn node_rpc_url(&self, profile: &NetworkProfile) -> String {
        self.node_rpc_url
            .clone()
            .unwrap_or_else(|| format!("http://127.0.0.1:{}/", profile.node_rpc_port))
    }

    pub fn fee_policy(&self) -> Result<FeePolicy, DaemonError> {
        Ok(FeePolicy::new(self.relay_fee, self.vsp_fee)?)
    }

    pub fn issuer_config(&self) -> IssuerConfig {
        IssuerConfig {
            vsp_closed: self.vsp_closed,
            required_confirmations: self.required_confirmations,
            fee_expiration_secs: self.fee_expiration_secs,
        }
    }
}

impl Default for VspConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            data_dir: default_data_dir(),
            listen: default_listen(),
            node_rpc_url: None,
            node_rpc_user: String::new(),
            node_rpc_pass: String::new(),
            vsp_closed: false,
            vsp_fee: default_vsp_fee(),
            relay_fee: default_relay_fee(),
            required_confirmations: default_required_confirmations(),
            fee_expiration_secs: default_fee_expiration_secs(),
            fee_seed: None,
            voting_wallets: Vec::new(),
            log_level: default_log_level(),
            log_format: LogFormat::Human,
        }
    }
}
