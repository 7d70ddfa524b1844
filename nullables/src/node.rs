//! Nullable node: a scripted chain tip and ticket set.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use vsp_chain::{ticket_window, BestBlockHeader, NodeError, NodeQuery, RawTicket, TicketWindow};
use vsp_types::{NetworkProfile, TicketHash};

/// An in-memory node answering from scripted state.
///
/// Tickets are added with [`NullNode::add_ticket`]; a mature ticket votes only
/// if it was also marked live. `header_calls()` counts best-header queries so
/// tests can assert that no fee was computed.
pub struct NullNode {
    header: Mutex<BestBlockHeader>,
    tickets: Mutex<HashMap<TicketHash, RawTicket>>,
    live: Mutex<HashSet<TicketHash>>,
    fail_header: AtomicBool,
    fail_raw: AtomicBool,
    fail_can_vote: AtomicBool,
    header_calls: AtomicU64,
}

impl NullNode {
    pub fn new(height: i64, stake_difficulty: f64) -> Self {
        Self {
            header: Mutex::new(BestBlockHeader {
                height,
                stake_difficulty,
            }),
            tickets: Mutex::new(HashMap::new()),
            live: Mutex::new(HashSet::new()),
            fail_header: AtomicBool::new(false),
            fail_raw: AtomicBool::new(false),
            fail_can_vote: AtomicBool::new(false),
            header_calls: AtomicU64::new(0),
        }
    }

    pub fn set_best_block(&self, height: i64, stake_difficulty: f64) {
        *self.header.lock().unwrap() = BestBlockHeader {
            height,
            stake_difficulty,
        };
    }

    /// Register a ticket transaction with `confirmations` and a commitment address.
    pub fn add_ticket(&self, hash: TicketHash, confirmations: i64, commitment: &str) {
        self.tickets.lock().unwrap().insert(
            hash,
            RawTicket {
                hash,
                hex: format!("00{}", hash.to_hex()),
                confirmations,
                is_ticket: true,
                commitment_address: Some(commitment.to_string()),
            },
        );
    }

    /// Register an arbitrary transaction as returned by the node.
    pub fn add_raw(&self, raw: RawTicket) {
        self.tickets.lock().unwrap().insert(raw.hash, raw);
    }

    pub fn set_live(&self, hash: TicketHash, live: bool) {
        let mut set = self.live.lock().unwrap();
        if live {
            set.insert(hash);
        } else {
            set.remove(&hash);
        }
    }

    pub fn fail_next_header(&self) {
        self.fail_header.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_raw(&self) {
        self.fail_raw.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_can_vote(&self) {
        self.fail_can_vote.store(true, Ordering::SeqCst);
    }

    pub fn header_calls(&self) -> u64 {
        self.header_calls.load(Ordering::SeqCst)
    }

    fn injected(flag: &AtomicBool) -> Result<(), NodeError> {
        if flag.swap(false, Ordering::SeqCst) {
            return Err(NodeError::Unreachable("injected failure".to_string()));
        }
        Ok(())
    }
}

impl NodeQuery for NullNode {
    async fn get_best_block_header(&self) -> Result<BestBlockHeader, NodeError> {
        self.header_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.fail_header)?;
        Ok(self.header.lock().unwrap().clone())
    }

    async fn get_raw_transaction(&self, hash: &TicketHash) -> Result<RawTicket, NodeError> {
        Self::injected(&self.fail_raw)?;
        self.tickets
            .lock()
            .unwrap()
            .get(hash)
            .cloned()
            .ok_or(NodeError::TxNotFound(*hash))
    }

    async fn can_ticket_vote(
        &self,
        raw: &RawTicket,
        hash: &TicketHash,
        profile: &NetworkProfile,
    ) -> Result<bool, NodeError> {
        Self::injected(&self.fail_can_vote)?;
        Ok(match ticket_window(raw.confirmations, profile) {
            TicketWindow::Expired => false,
            TicketWindow::Immature => true,
            TicketWindow::Mature => self.live.lock().unwrap().contains(hash),
        })
    }
}
