//! Nullable store: thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use vsp_store::ticket::{apply_renewal, check_update};
use vsp_store::{AddressIndexStore, StoreError, TicketStore};
use vsp_types::{Amount, Ticket, TicketHash, Timestamp};

/// An in-memory ticket + cursor store for testing.
///
/// Each `fail_*` method arms a one-shot failure for the next call of that
/// operation. `writes()` counts successful mutations so tests can assert
/// that a rejected request touched nothing.
pub struct NullStore {
    tickets: Mutex<HashMap<TicketHash, Ticket>>,
    last_address_index: Mutex<u32>,
    fail_get_ticket: AtomicBool,
    fail_set_index: AtomicBool,
    fail_insert: AtomicBool,
    fail_renew: AtomicBool,
    writes: AtomicU64,
}

impl NullStore {
    pub fn new() -> Self {
        Self::with_last_address_index(0)
    }

    /// A store whose persisted cursor already reads `index`.
    pub fn with_last_address_index(index: u32) -> Self {
        Self {
            tickets: Mutex::new(HashMap::new()),
            last_address_index: Mutex::new(index),
            fail_get_ticket: AtomicBool::new(false),
            fail_set_index: AtomicBool::new(false),
            fail_insert: AtomicBool::new(false),
            fail_renew: AtomicBool::new(false),
            writes: AtomicU64::new(0),
        }
    }

    /// Seed a row without counting it as a write.
    pub fn put_ticket(&self, ticket: Ticket) {
        self.tickets.lock().unwrap().insert(ticket.hash, ticket);
    }

    pub fn fail_next_get_ticket(&self) {
        self.fail_get_ticket.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_set_index(&self) {
        self.fail_set_index.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_insert(&self) {
        self.fail_insert.store(true, Ordering::SeqCst);
    }

    pub fn fail_next_renew(&self) {
        self.fail_renew.store(true, Ordering::SeqCst);
    }

    /// Number of successful mutations so far.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    fn injected(flag: &AtomicBool, op: &str) -> Result<(), StoreError> {
        if flag.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Backend(format!("injected {op} failure")));
        }
        Ok(())
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressIndexStore for NullStore {
    fn get_last_address_index(&self) -> Result<u32, StoreError> {
        Ok(*self.last_address_index.lock().unwrap())
    }

    fn set_last_address_index(&self, index: u32) -> Result<(), StoreError> {
        Self::injected(&self.fail_set_index, "set_last_address_index")?;
        *self.last_address_index.lock().unwrap() = index;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl TicketStore for NullStore {
    fn get_ticket(&self, hash: &TicketHash) -> Result<Option<Ticket>, StoreError> {
        Self::injected(&self.fail_get_ticket, "get_ticket")?;
        Ok(self.tickets.lock().unwrap().get(hash).cloned())
    }

    fn insert_new_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        Self::injected(&self.fail_insert, "insert_new_ticket")?;
        let mut tickets = self.tickets.lock().unwrap();
        if tickets.contains_key(&ticket.hash) {
            return Err(StoreError::Duplicate(format!("ticket {}", ticket.hash)));
        }
        tickets.insert(ticket.hash, ticket.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut tickets = self.tickets.lock().unwrap();
        let current = tickets
            .get(&ticket.hash)
            .ok_or_else(|| StoreError::NotFound(format!("ticket {}", ticket.hash)))?;
        check_update(current, ticket)?;
        tickets.insert(ticket.hash, ticket.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn renew_fee(
        &self,
        hash: &TicketHash,
        fee_amount: Amount,
        fee_expiration: Timestamp,
    ) -> Result<Ticket, StoreError> {
        Self::injected(&self.fail_renew, "renew_fee")?;
        let mut tickets = self.tickets.lock().unwrap();
        let current = tickets
            .get(hash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("ticket {hash}")))?;
        let renewed = apply_renewal(current, fee_amount, fee_expiration)?;
        tickets.insert(*hash, renewed.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(renewed)
    }

    fn count_tickets(&self) -> Result<u64, StoreError> {
        Ok(self.tickets.lock().unwrap().len() as u64)
    }
}
