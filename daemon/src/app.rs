//! Wires storage, key derivation, the node client and the web API together.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, warn};

use vsp_crypto::FeeKeyChain;
use vsp_fees::{FeeAddressAllocator, FeeCalculator, TicketFeeIssuer};
use vsp_rpc::{NodeRpcClient, NodeRpcConfig};
use vsp_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment, DEFAULT_MAP_SIZE};
use vsp_types::NetworkProfile;
use vsp_utils::format_duration;
use vsp_webapi::AppState;

use crate::config::VspConfig;
use crate::error::DaemonError;
use crate::shutdown::ShutdownController;

pub type VspState = AppState<LmdbEnvironment, NodeRpcClient, FeeKeyChain>;

/// Build the shared web API state from a validated configuration.
pub fn build_state(config: &VspConfig, profile: NetworkProfile) -> Result<VspState, DaemonError> {
    if let Err(problem) = check_data_dir(&config.data_dir) {
        warn!(%problem, "data directory has no database yet");
    }
    let env = Arc::new(LmdbEnvironment::open(&config.data_dir, DEFAULT_MAP_SIZE)?);

    let report = check_integrity(&env)?;
    if report.is_healthy() {
        info!(
            tickets = report.tickets_checked,
            last_address_index = report.last_address_index,
            "database opened"
        );
    } else {
        for problem in &report.errors {
            error!(%problem, "database integrity problem");
        }
        // The allocator would reissue an index some ticket already holds.
        return Err(DaemonError::Integrity(report.errors.join("; ")));
    }

    let keys = Arc::new(FeeKeyChain::new(
        config.fee_seed()?,
        profile.address_prefix.clone(),
    ));
    let allocator = FeeAddressAllocator::open(Arc::clone(&env), keys)?;

    let rpc_config = NodeRpcConfig::new(config.node_rpc_url(&profile))
        .with_credentials(config.node_rpc_user.clone(), config.node_rpc_pass.clone());
    let node = Arc::new(NodeRpcClient::new(rpc_config)?);

    let issuer = TicketFeeIssuer::new(
        env,
        node,
        allocator,
        FeeCalculator::new(config.fee_policy()?),
        profile,
        config.issuer_config(),
    );
    Ok(AppState::new(issuer))
}

/// Run the VSP until a shutdown signal arrives.
pub async fn run(config: VspConfig) -> Result<(), DaemonError> {
    let profile = config.profile()?;
    config.validate(&profile)?;

    info!(
        network = %profile.name,
        vote_version = profile.current_vote_version(),
        vsp_fee = config.vsp_fee,
        fee_expiration = %format_duration(config.fee_expiration_secs),
        vsp_closed = config.vsp_closed,
        "starting VSP"
    );
    if config.vsp_closed {
        warn!("VSP is closed: fee address requests will be refused");
    }

    let state = Arc::new(build_state(&config, profile)?);
    let listener = TcpListener::bind(config.listen_addr()?).await?;

    let shutdown = Arc::new(ShutdownController::new());
    let signalled = shutdown.signalled();
    let signals = Arc::clone(&shutdown);
    tokio::spawn(async move { signals.wait_for_signal().await });

    vsp_webapi::serve(listener, state, signalled).await?;
    info!("VSP exited cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_state_on_fresh_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = VspConfig {
            network: "simnet".to_string(),
            data_dir: dir.path().join("db"),
            fee_seed: Some("02".repeat(32)),
            voting_wallets: vec!["127.0.0.1:19110".to_string()],
            ..VspConfig::default()
        };
        let profile = config.profile().unwrap();
        config.validate(&profile).unwrap();

        let state = build_state(&config, profile).unwrap();
        assert_eq!(state.issuer.profile().name, "simnet");
        assert_eq!(state.issuer.ticket_count().unwrap(), 0);
    }

    #[test]
    fn refuses_database_with_index_beyond_cursor() {
        use vsp_store::{AddressIndexStore, TicketStore};
        use vsp_types::{Amount, FeeAddress, FeeStatus, Ticket, TicketHash, Timestamp};

        let dir = tempfile::tempdir().unwrap();
        let config = VspConfig {
            network: "simnet".to_string(),
            data_dir: dir.path().join("db"),
            fee_seed: Some("02".repeat(32)),
            voting_wallets: vec!["127.0.0.1:19110".to_string()],
            ..VspConfig::default()
        };
        {
            let env = LmdbEnvironment::open(&config.data_dir, DEFAULT_MAP_SIZE).unwrap();
            env.set_last_address_index(2).unwrap();
            env.insert_new_ticket(&Ticket {
                hash: TicketHash::new([4; 32]),
                commitment_address: "Sscommit".to_string(),
                fee_address_index: 3,
                fee_address: FeeAddress::new("Ssfee3"),
                fee_amount: Amount::from_atoms(100),
                fee_expiration: Timestamp::new(5_000),
                fee_status: FeeStatus::NoFee,
                confirmed: false,
            })
            .unwrap();
        }

        let profile = config.profile().unwrap();
        assert!(matches!(
            build_state(&config, profile),
            Err(DaemonError::Integrity(_))
        ));
    }
}
