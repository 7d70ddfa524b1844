//! vspd: Voting Service Provider daemon.

mod app;
mod config;
mod error;
mod shutdown;

use clap::Parser;
use std::path::PathBuf;

use vsp_crypto::FeeSeed;
use vsp_utils::{init_logging, LogFormat};

use crate::config::VspConfig;

#[derive(Parser)]
#[command(name = "vspd", about = "Voting Service Provider daemon")]
struct Cli {
    /// Path to a TOML configuration file. File settings are used as the
    /// base; CLI flags and env vars override them.
    #[arg(long, env = "VSP_CONFIG")]
    config: Option<PathBuf>,

    /// Network: "mainnet", "testnet" or "simnet".
    #[arg(long, env = "VSP_NETWORK")]
    network: Option<String>,

    /// Data directory for the database.
    #[arg(long, env = "VSP_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Address for the web API to listen on.
    #[arg(long, env = "VSP_LISTEN")]
    listen: Option<String>,

    /// Node JSON-RPC endpoint.
    #[arg(long, env = "VSP_NODE_RPC_URL")]
    node_rpc_url: Option<String>,

    /// Hex-encoded fee seed.
    #[arg(long, env = "VSP_FEE_SEED", hide_env_values = true)]
    fee_seed: Option<String>,

    /// Refuse all new fee address requests.
    #[arg(long, env = "VSP_CLOSED")]
    vsp_closed: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "VSP_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "VSP_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Run the VSP.
    Run,
    /// Print a freshly generated fee seed.
    GenSeed,
}

impl Cli {
    /// Apply command line overrides on top of `config`.
    fn apply(self, mut config: VspConfig) -> VspConfig {
        if let Some(network) = self.network {
            config.network = network;
        }
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(url) = self.node_rpc_url {
            config.node_rpc_url = Some(url);
        }
        if let Some(seed) = self.fee_seed {
            config.fee_seed = Some(seed);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config.vsp_closed |= self.vsp_closed;
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::GenSeed = cli.command {
        println!("{}", FeeSeed::generate()?.to_hex());
        return Ok(());
    }

    let file_config = match &cli.config {
        Some(path) => VspConfig::from_toml_file(path)?,
        None => VspConfig::default(),
    };
    let config = cli.apply(file_config);

    init_logging(config.log_format, &config.log_level)?;
    app::run(config).await?;
    Ok(())
}
