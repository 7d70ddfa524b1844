//! Ticket record and fee-payment status.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::address::FeeAddress;
use crate::amount::Amount;
use crate::error::VspError;
use crate::hash::TicketHash;
use crate::time::Timestamp;

/// Progress of the fee payment for a ticket.
///
/// Ordering follows the lifecycle; a status never moves backwards.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum FeeStatus {
    /// Fee address issued, no fee transaction seen yet.
    #[default]
    NoFee,
    /// Fee transaction received from the ticket owner.
    FeeReceived,
    /// Fee transaction broadcast to the network.
    FeeBroadcast,
    /// Fee transaction confirmed on chain.
    FeeConfirmed,
}

impl FeeStatus {
    /// Statuses for which no fee will ever be issued again.
    pub fn is_terminal_for_issuance(&self) -> bool {
        !matches!(self, Self::NoFee)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoFee => "none",
            Self::FeeReceived => "received",
            Self::FeeBroadcast => "broadcast",
            Self::FeeConfirmed => "confirmed",
        }
    }
}

impl fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket the VSP has issued a fee address for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub hash: TicketHash,
    pub commitment_address: String,
    /// Immutable after creation.
    pub fee_address_index: u32,
    /// Immutable after creation.
    pub fee_address: FeeAddress,
    pub fee_amount: Amount,
    pub fee_expiration: Timestamp,
    pub fee_status: FeeStatus,
    /// Whether the ticket had enough confirmations when the row was created.
    pub confirmed: bool,
}

impl Ticket {
    /// Whether the issued fee has expired at `now`.
    pub fn fee_expired(&self, now: Timestamp) -> bool {
        now >= self.fee_expiration
    }

    /// Move the fee status forward. Staying put is allowed.
    pub fn advance_fee_status(&mut self, next: FeeStatus) -> Result<(), VspError> {
        if next < self.fee_status {
            return Err(VspError::InvalidStatusTransition {
                from: self.fee_status.to_string(),
                to: next.to_string(),
            });
        }
        self.fee_status = next;
        Ok(())
    }
}
