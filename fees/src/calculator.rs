//! Fee calculation.
//!
//! The fee owed for a ticket is a percentage of the reward the ticket is
//! expected to earn when it votes, scaled down by the share of that reward
//! which goes back to the ticket price:
//!
//! ```text
//! fee = floor(p · s · (v + z) / (10000 · (s + v)))
//! ```
//!
//! `p` is the fee in basis points, `s` the stake difficulty, `z` the relay
//! fee floor and `v` the vote subsidy pushed forward by the average time a
//! ticket waits in the pool. All amounts are atoms.

use vsp_chain::NodeQuery;
use vsp_types::{Amount, NetworkProfile};

use crate::error::FeeError;

/// Configured fee-rate inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeePolicy {
    /// Relay fee floor added to the vote subsidy.
    pub relay_fee: Amount,
    /// Fee as a percentage of the vote reward (`1.0` is one percent).
    pub fee_percent: f64,
}

impl FeePolicy {
    /// Build a policy from a relay fee in coins and a fee percentage.
    pub fn new(relay_fee_coins: f64, fee_percent: f64) -> Result<Self, FeeError> {
        let relay_fee = Amount::from_coins(relay_fee_coins)
            .map_err(|e| FeeError::InvalidAmount(e.to_string()))?;
        if !fee_percent.is_finite() || fee_percent < 0.0 {
            return Err(FeeError::InvalidAmount(format!(
                "fee percent {fee_percent} is not a valid rate"
            )));
        }
        Ok(Self {
            relay_fee,
            fee_percent,
        })
    }

    /// The fee rate in basis points, truncated.
    pub fn basis_points(&self) -> i64 {
        (self.fee_percent * 100.0).floor() as i64
    }
}

/// Full block subsidy at `height`, before it is split between miners,
/// voters and the treasury.
pub fn block_subsidy(height: i64, profile: &NetworkProfile) -> i64 {
    let chain = &profile.chain;
    if height <= 0 {
        return 0;
    }
    let reductions = height / chain.subsidy_reduction_interval;
    let mut subsidy = chain.base_subsidy;
    for _ in 0..reductions {
        subsidy = subsidy * chain.mul_subsidy / chain.div_subsidy;
        if subsidy == 0 {
            break;
        }
    }
    subsidy
}

/// Subsidy paid to a single vote in a block at `height`.
///
/// The split between stake and the rest of the block depends on which
/// subsidy-split agenda is active at `height`.
pub fn stake_vote_subsidy(height: i64, profile: &NetworkProfile) -> i64 {
    let chain = &profile.chain;
    // Votes are paid for the block they vote on, hence the minus one.
    if height < chain.stake_validation_height - 1 {
        return 0;
    }

    let (stake, total) = if profile.dcp12_active(height) {
        (89, 100)
    } else if profile.dcp10_active(height) {
        (80, 100)
    } else {
        let total = i64::from(chain.work_reward_proportion)
            + i64::from(chain.stake_reward_proportion)
            + i64::from(chain.block_tax_proportion);
        (i64::from(chain.stake_reward_proportion), total)
    };

    let stake_subsidy = block_subsidy(height, profile) * stake / total;
    stake_subsidy / i64::from(chain.tickets_per_block)
}

/// Vote subsidy decayed by the number of reduction intervals a ticket
/// typically spends in the pool before voting.
pub fn expected_vote_subsidy(height: i64, profile: &NetworkProfile) -> i64 {
    let chain = &profile.chain;
    let pool = i64::from(chain.ticket_pool_size);
    let adjustments = (pool + chain.subsidy_reduction_interval - 1) / chain.subsidy_reduction_interval;

    let mut subsidy = stake_vote_subsidy(height, profile);
    for _ in 0..adjustments {
        subsidy = subsidy * chain.mul_subsidy / chain.div_subsidy;
    }
    subsidy
}

/// The fee owed for a ticket bought at `stake_difficulty` with the best
/// block at `height`.
pub fn stake_pool_ticket_fee(
    stake_difficulty: Amount,
    relay_fee: Amount,
    height: i64,
    fee_percent: f64,
    profile: &NetworkProfile,
) -> Result<Amount, FeeError> {
    if stake_difficulty.atoms() <= 0 {
        return Err(FeeError::InvalidAmount(format!(
            "stake difficulty {stake_difficulty} is not positive"
        )));
    }
    if relay_fee.atoms() < 0 {
        return Err(FeeError::InvalidAmount(format!(
            "relay fee {relay_fee} is negative"
        )));
    }
    if !fee_percent.is_finite() || fee_percent < 0.0 {
        return Err(FeeError::InvalidAmount(format!(
            "fee percent {fee_percent} is not a valid rate"
        )));
    }

    let p = (fee_percent * 100.0).floor() as i128;
    let s = i128::from(stake_difficulty.atoms());
    let z = i128::from(relay_fee.atoms());
    let v = i128::from(expected_vote_subsidy(height, profile));

    let overflow = || FeeError::InvalidAmount("fee calculation overflowed".to_string());
    let numerator = p
        .checked_mul(s)
        .and_then(|n| n.checked_mul(v + z))
        .ok_or_else(overflow)?;
    let denominator = (s + v).checked_mul(10_000).ok_or_else(overflow)?;

    let fee = i64::try_from(numerator / denominator).map_err(|_| overflow())?;
    Ok(Amount::from_atoms(fee))
}

/// Computes the current fee from the chain tip.
#[derive(Clone, Copy, Debug)]
pub struct FeeCalculator {
    policy: FeePolicy,
}

impl FeeCalculator {
    pub fn new(policy: FeePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FeePolicy {
        &self.policy
    }

    /// Fetch the best block header and compute the fee at its height and
    /// stake difficulty.
    pub async fn current_fee<N: NodeQuery>(
        &self,
        node: &N,
        profile: &NetworkProfile,
    ) -> Result<Amount, FeeError> {
        let header = node
            .get_best_block_header()
            .await
            .map_err(FeeError::NodeQueryFailed)?;
        let stake_difficulty = Amount::from_coins(header.stake_difficulty)
            .map_err(|e| FeeError::InvalidAmount(e.to_string()))?;
        stake_pool_ticket_fee(
            stake_difficulty,
            self.policy.relay_fee,
            header.height,
            self.policy.fee_percent,
            profile,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsp_nullables::NullNode;

    fn one_percent() -> FeePolicy {
        FeePolicy::new(0.0001, 1.0).unwrap()
    }

    #[test]
    fn no_vote_subsidy_before_stake_validation() {
        let net = NetworkProfile::simnet();
        // stake validation height 144
        assert_eq!(stake_vote_subsidy(142, &net), 0);
        assert!(stake_vote_subsidy(143, &net) > 0);
    }

    #[test]
    fn simnet_fee_before_voting_starts() {
        let net = NetworkProfile::simnet();
        let fee = stake_pool_ticket_fee(
            Amount::from_atoms(100_000_000),
            Amount::from_atoms(10_000),
            50,
            1.0,
            &net,
        )
        .unwrap();
        assert_eq!(fee.atoms(), 100);
    }

    #[test]
    fn simnet_fee_after_voting_starts() {
        let net = NetworkProfile::simnet();
        assert_eq!(expected_vote_subsidy(200, &net), 8_724_634_839);
        let fee = stake_pool_ticket_fee(
            Amount::from_atoms(100_000_000),
            Amount::from_atoms(10_000),
            200,
            1.0,
            &net,
        )
        .unwrap();
        assert_eq!(fee.atoms(), 988_669);
    }

    #[test]
    fn subsidy_split_follows_agendas() {
        let mut net = NetworkProfile::simnet();
        net.agenda_heights.dcp0010 = 1_000;
        net.agenda_heights.dcp0012 = 1_000;
        assert_eq!(expected_vote_subsidy(200, &net), 2_940_888_147);
        let fee = stake_pool_ticket_fee(
            Amount::from_atoms(100_000_000),
            Amount::from_atoms(10_000),
            200,
            1.0,
            &net,
        )
        .unwrap();
        assert_eq!(fee.atoms(), 967_118);
    }

    #[test]
    fn basis_points_truncate() {
        assert_eq!(FeePolicy::new(0.0, 1.999).unwrap().basis_points(), 199);
        assert_eq!(FeePolicy::new(0.0, 3.0).unwrap().basis_points(), 300);
    }

    #[test]
    fn rejects_unusable_inputs() {
        let net = NetworkProfile::simnet();
        assert!(matches!(
            stake_pool_ticket_fee(Amount::ZERO, Amount::ZERO, 50, 1.0, &net),
            Err(FeeError::InvalidAmount(_))
        ));
        assert!(FeePolicy::new(-1.0, 1.0).is_err());
        assert!(FeePolicy::new(0.0001, f64::NAN).is_err());
    }

    #[tokio::test]
    async fn current_fee_reads_chain_tip() {
        let node = NullNode::new(50, 1.0);
        let calc = FeeCalculator::new(one_percent());
        let fee = calc
            .current_fee(&node, &NetworkProfile::simnet())
            .await
            .unwrap();
        assert_eq!(fee.atoms(), 100);
    }

    #[tokio::test]
    async fn current_fee_reports_node_failure() {
        let node = NullNode::new(50, 1.0);
        node.fail_next_header();
        let err = FeeCalculator::new(one_percent())
            .current_fee(&node, &NetworkProfile::simnet())
            .await
            .unwrap_err();
        assert!(matches!(err, FeeError::NodeQueryFailed(_)));
    }
}
