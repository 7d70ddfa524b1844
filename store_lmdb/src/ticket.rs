//! LMDB implementation of TicketStore.
//!
//! Key: the 32 raw bytes of the ticket hash. Value: bincode-encoded [`Ticket`].

use heed::RoTxn;

use vsp_store::ticket::{apply_renewal, check_update};
use vsp_store::{StoreError, TicketStore};
use vsp_types::{Amount, Ticket, TicketHash, Timestamp};

use crate::environment::LmdbEnvironment;
use crate::LmdbError;

impl LmdbEnvironment {
    fn read_ticket(&self, txn: &RoTxn, hash: &TicketHash) -> Result<Option<Ticket>, LmdbError> {
        match self.tickets_db.get(txn, hash.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// Every ticket row, in key order.
    pub fn all_tickets(&self) -> Result<Vec<Ticket>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut tickets = Vec::new();
        for entry in self.tickets_db.iter(&rtxn)? {
            let (_key, bytes) = entry?;
            tickets.push(bincode::deserialize(bytes)?);
        }
        Ok(tickets)
    }
}

impl TicketStore for LmdbEnvironment {
    fn get_ticket(&self, hash: &TicketHash) -> Result<Option<Ticket>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.read_ticket(&rtxn, hash)?)
    }

    fn insert_new_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let bytes = bincode::serialize(ticket).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        if self.read_ticket(&wtxn, &ticket.hash)?.is_some() {
            return Err(StoreError::Duplicate(format!("ticket {}", ticket.hash)));
        }
        self.tickets_db
            .put(&mut wtxn, ticket.hash.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let bytes = bincode::serialize(ticket).map_err(LmdbError::from)?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let current = self
            .read_ticket(&wtxn, &ticket.hash)?
            .ok_or_else(|| StoreError::NotFound(format!("ticket {}", ticket.hash)))?;
        check_update(&current, ticket)?;
        self.tickets_db
            .put(&mut wtxn, ticket.hash.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn renew_fee(
        &self,
        hash: &TicketHash,
        fee_amount: Amount,
        fee_expiration: Timestamp,
    ) -> Result<Ticket, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let current = self
            .read_ticket(&wtxn, hash)?
            .ok_or_else(|| StoreError::NotFound(format!("ticket {hash}")))?;
        let renewed = apply_renewal(current, fee_amount, fee_expiration)?;
        let bytes = bincode::serialize(&renewed).map_err(LmdbError::from)?;
        self.tickets_db
            .put(&mut wtxn, hash.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(renewed)
    }

    fn count_tickets(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.tickets_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}
