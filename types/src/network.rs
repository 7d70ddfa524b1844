//! Per-deployment consensus configuration.
//!
//! A [`NetworkProfile`] is selected once at startup by name and never
//! mutated afterwards. Agenda activation heights gate height-dependent
//! behaviour (currently the subsidy split used by fee calculation).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NetworkError;

/// Consensus upgrades whose activation height matters to the VSP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Agenda {
    /// DCP-0005 block header commitments.
    Dcp0005,
    /// DCP-0010 change PoW/PoS subsidy split.
    Dcp0010,
    /// DCP-0012 change PoW/PoS subsidy split round 2.
    Dcp0012,
}

impl Agenda {
    pub const ALL: [Agenda; 3] = [Agenda::Dcp0005, Agenda::Dcp0010, Agenda::Dcp0012];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dcp0005 => "headercommitments",
            Self::Dcp0010 => "changesubsidysplit",
            Self::Dcp0012 => "changesubsidysplitr2",
        }
    }
}

impl fmt::Display for Agenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activation heights for every [`Agenda`] on one network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaHeights {
    pub dcp0005: i64,
    pub dcp0010: i64,
    pub dcp0012: i64,
}

impl AgendaHeights {
    /// Activation height of `agenda`.
    pub fn get(&self, agenda: Agenda) -> i64 {
        match agenda {
            Agenda::Dcp0005 => self.dcp0005,
            Agenda::Dcp0010 => self.dcp0010,
            Agenda::Dcp0012 => self.dcp0012,
        }
    }
}

/// A vote version and the agendas voted on under it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub vote_version: u32,
    pub agendas: Vec<String>,
}

impl Deployment {
    fn new(vote_version: u32, agendas: &[&str]) -> Self {
        Self {
            vote_version,
            agendas: agendas.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Chain parameters consumed by fee calculation and vote eligibility.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainParams {
    /// Block subsidy at height 2, in atoms.
    pub base_subsidy: i64,
    pub mul_subsidy: i64,
    pub div_subsidy: i64,
    pub subsidy_reduction_interval: i64,
    pub work_reward_proportion: u16,
    pub stake_reward_proportion: u16,
    pub block_tax_proportion: u16,
    pub tickets_per_block: u16,
    pub ticket_pool_size: u16,
    pub ticket_maturity: u16,
    pub ticket_expiry: u32,
    pub stake_validation_height: i64,
}

/// Immutable configuration of a single deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub name: String,
    pub node_rpc_port: u16,
    pub wallet_rpc_port: u16,
    pub explorer_url: String,
    /// Minimum number of voting wallets a deployment must be configured
    /// with. Operational policy, not consensus.
    pub min_voting_wallets: usize,
    pub agenda_heights: AgendaHeights,
    pub deployments: Vec<Deployment>,
    /// Prefix of encoded fee addresses on this network.
    pub address_prefix: String,
    pub chain: ChainParams,
}

impl NetworkProfile {
    /// Resolve a deployment name to its profile.
    pub fn resolve(name: &str) -> Result<Self, NetworkError> {
        match name {
            "mainnet" => Ok(Self::mainnet()),
            "testnet" | "testnet3" => Ok(Self::testnet()),
            "simnet" => Ok(Self::simnet()),
            other => Err(NetworkError::UnsupportedNetwork(other.to_string())),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            name: "mainnet".to_string(),
            node_rpc_port: 9109,
            wallet_rpc_port: 9110,
            explorer_url: "https://dcrdata.decred.org".to_string(),
            min_voting_wallets: 3,
            agenda_heights: AgendaHeights {
                dcp0005: 431_488,
                dcp0010: 657_280,
                dcp0012: 794_368,
            },
            deployments: vec![
                Deployment::new(4, &["sdiffalgorithm", "lnsupport"]),
                Deployment::new(5, &["lnfeatures"]),
                Deployment::new(6, &["fixlnseqlocks"]),
                Deployment::new(7, &["headercommitments"]),
                Deployment::new(8, &["treasury"]),
                Deployment::new(
                    9,
                    &["reverttreasurypolicy", "explicitverupgrades", "autorevocations", "changesubsidysplit"],
                ),
                Deployment::new(10, &["blake3pow", "changesubsidysplitr2"]),
            ],
            address_prefix: "Ds".to_string(),
            chain: ChainParams {
                base_subsidy: 3_119_582_664,
                mul_subsidy: 100,
                div_subsidy: 101,
                subsidy_reduction_interval: 6144,
                work_reward_proportion: 6,
                stake_reward_proportion: 3,
                block_tax_proportion: 1,
                tickets_per_block: 5,
                ticket_pool_size: 8192,
                ticket_maturity: 256,
                ticket_expiry: 40_960,
                stake_validation_height: 4096,
            },
        }
    }

    pub fn testnet() -> Self {
        Self {
            name: "testnet".to_string(),
            node_rpc_port: 19109,
            wallet_rpc_port: 19110,
            explorer_url: "https://testnet.dcrdata.org".to_string(),
            min_voting_wallets: 1,
            agenda_heights: AgendaHeights {
                dcp0005: 323_328,
                dcp0010: 877_728,
                dcp0012: 1_170_048,
            },
            deployments: vec![
                Deployment::new(7, &["headercommitments"]),
                Deployment::new(8, &["treasury"]),
                Deployment::new(
                    9,
                    &["reverttreasurypolicy", "explicitverupgrades", "autorevocations", "changesubsidysplit"],
                ),
                Deployment::new(10, &["blake3pow", "changesubsidysplitr2"]),
                Deployment::new(11, &["maxtreasuryspend"]),
            ],
            address_prefix: "Ts".to_string(),
            chain: ChainParams {
                base_subsidy: 2_500_000_000,
                mul_subsidy: 100,
                div_subsidy: 101,
                subsidy_reduction_interval: 2048,
                work_reward_proportion: 6,
                stake_reward_proportion: 3,
                block_tax_proportion: 1,
                tickets_per_block: 5,
                ticket_pool_size: 1024,
                ticket_maturity: 16,
                ticket_expiry: 6144,
                stake_validation_height: 768,
            },
        }
    }

    /// Simulation network: every agenda is active from block 1.
    pub fn simnet() -> Self {
        Self {
            name: "simnet".to_string(),
            node_rpc_port: 19556,
            wallet_rpc_port: 19557,
            explorer_url: "...".to_string(),
            min_voting_wallets: 1,
            agenda_heights: AgendaHeights {
                dcp0005: 1,
                dcp0010: 1,
                dcp0012: 1,
            },
            deployments: vec![
                Deployment::new(7, &["headercommitments"]),
                Deployment::new(8, &["treasury"]),
                Deployment::new(
                    9,
                    &["reverttreasurypolicy", "explicitverupgrades", "autorevocations", "changesubsidysplit"],
                ),
                Deployment::new(10, &["blake3pow", "changesubsidysplitr2"]),
                Deployment::new(11, &["maxtreasuryspend"]),
            ],
            address_prefix: "Ss".to_string(),
            chain: ChainParams {
                base_subsidy: 50_000_000_000,
                mul_subsidy: 100,
                div_subsidy: 101,
                subsidy_reduction_interval: 128,
                work_reward_proportion: 6,
                stake_reward_proportion: 3,
                block_tax_proportion: 1,
                tickets_per_block: 5,
                ticket_pool_size: 64,
                ticket_maturity: 16,
                ticket_expiry: 384,
                stake_validation_height: 144,
            },
        }
    }

    /// Whether `agenda` is active at `height`. Activation is inclusive.
    pub fn is_agenda_active(&self, agenda: Agenda, height: i64) -> bool {
        height >= self.agenda_heights.get(agenda)
    }

    pub fn dcp5_active(&self, height: i64) -> bool {
        self.is_agenda_active(Agenda::Dcp0005, height)
    }

    pub fn dcp10_active(&self, height: i64) -> bool {
        self.is_agenda_active(Agenda::Dcp0010, height)
    }

    pub fn dcp12_active(&self, height: i64) -> bool {
        self.is_agenda_active(Agenda::Dcp0012, height)
    }

    /// Highest vote version in the deployment schedule, 0 when empty.
    pub fn current_vote_version(&self) -> u32 {
        self.deployments
            .iter()
            .map(|d| d.vote_version)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_names() {
        assert_eq!(NetworkProfile::resolve("mainnet").unwrap().name, "mainnet");
        assert_eq!(NetworkProfile::resolve("testnet").unwrap().name, "testnet");
        assert_eq!(NetworkProfile::resolve("testnet3").unwrap().name, "testnet");
        assert_eq!(NetworkProfile::resolve("simnet").unwrap().name, "simnet");
    }

    #[test]
    fn unknown_name_is_unsupported() {
        let err = NetworkProfile::resolve("regnet").unwrap_err();
        assert!(matches!(err, NetworkError::UnsupportedNetwork(ref n) if n == "regnet"));
    }

    #[test]
    fn activation_boundary_is_inclusive() {
        let net = NetworkProfile::mainnet();
        assert!(!net.dcp10_active(657_279));
        assert!(net.dcp10_active(657_280));
        assert!(net.dcp10_active(657_281));
    }

    #[test]
    fn simnet_agendas_always_active() {
        let net = NetworkProfile::simnet();
        for agenda in Agenda::ALL {
            assert!(!net.is_agenda_active(agenda, 0));
            assert!(net.is_agenda_active(agenda, 1));
        }
    }

    #[test]
    fn current_vote_version_is_max_key() {
        assert_eq!(NetworkProfile::mainnet().current_vote_version(), 10);
        assert_eq!(NetworkProfile::testnet().current_vote_version(), 11);
    }

    #[test]
    fn empty_schedule_has_zero_vote_version() {
        let mut net = NetworkProfile::simnet();
        net.deployments.clear();
        assert_eq!(net.current_vote_version(), 0);
    }

    #[test]
    fn vote_version_follows_schedule_edits() {
        let mut net = NetworkProfile::simnet();
        net.deployments.push(Deployment::new(42, &["future"]));
        assert_eq!(net.current_vote_version(), 42);
    }

    #[test]
    fn every_network_meets_wallet_floor() {
        for name in ["mainnet", "testnet", "simnet"] {
            assert!(NetworkProfile::resolve(name).unwrap().min_voting_wallets >= 1);
        }
    }
}
