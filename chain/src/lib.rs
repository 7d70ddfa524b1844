//! Abstract blockchain node queries.
//!
//! The VSP never talks to a node directly; it goes through [`NodeQuery`].
//! `vsp-rpc` implements it over JSON-RPC, `vsp-nullables` in memory.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vsp_types::{NetworkProfile, TicketHash};

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("node unreachable: {0}")]
    Unreachable(String),

    #[error("node returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid response from node: {0}")]
    InvalidResponse(String),

    #[error("transaction {0} not found")]
    TxNotFound(TicketHash),
}

/// The fields of the best block header the fee calculation needs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BestBlockHeader {
    pub height: i64,
    /// Ticket price at this block, in coins.
    pub stake_difficulty: f64,
}

/// A ticket transaction as reported by the node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTicket {
    pub hash: TicketHash,
    pub hex: String,
    /// 0 while in the mempool.
    pub confirmations: i64,
    /// Whether the first output is a ticket submission.
    pub is_ticket: bool,
    /// Address of the first ticket commitment output, if present.
    pub commitment_address: Option<String>,
}

/// Queries the VSP makes against a blockchain node.
pub trait NodeQuery: Send + Sync {
    fn get_best_block_header(
        &self,
    ) -> impl Future<Output = Result<BestBlockHeader, NodeError>> + Send;

    fn get_raw_transaction(
        &self,
        hash: &TicketHash,
    ) -> impl Future<Output = Result<RawTicket, NodeError>> + Send;

    /// Whether the ticket can vote now or at some point in the future.
    fn can_ticket_vote(
        &self,
        raw: &RawTicket,
        hash: &TicketHash,
        profile: &NetworkProfile,
    ) -> impl Future<Output = Result<bool, NodeError>> + Send;
}

/// Where a ticket stands in its voting window, judged from confirmations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TicketWindow {
    /// Not yet mature; it will be able to vote later.
    Immature,
    /// Mature and not expired; votable if still live.
    Mature,
    /// Past maturity plus expiry; it can never vote.
    Expired,
}

/// Classify a ticket by its confirmation count under `profile`.
pub fn ticket_window(confirmations: i64, profile: &NetworkProfile) -> TicketWindow {
    let maturity = i64::from(profile.chain.ticket_maturity);
    let expiry = i64::from(profile.chain.ticket_expiry);
    if confirmations > maturity + expiry + 1 {
        TicketWindow::Expired
    } else if confirmations <= maturity {
        TicketWindow::Immature
    } else {
        TicketWindow::Mature
    }
}
