//! Ticket storage trait.

use crate::StoreError;
use vsp_types::{Amount, Ticket, TicketHash, Timestamp};

/// Trait for persisted ticket records keyed by ticket hash.
///
/// Every write is a single atomic transaction: readers observe either the
/// previous row or the new row, never a mix of the two.
pub trait TicketStore: Send + Sync {
    /// Retrieve a ticket, `None` if the VSP has never seen it.
    fn get_ticket(&self, hash: &TicketHash) -> Result<Option<Ticket>, StoreError>;

    /// Insert a ticket row. Fails with [`StoreError::Duplicate`] if the hash exists.
    fn insert_new_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Overwrite an existing ticket row.
    ///
    /// Fails with [`StoreError::NotFound`] if the row is missing and with
    /// [`StoreError::Conflict`] if the update would move the fee status backwards.
    fn update_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Replace the fee amount and expiration of a ticket still awaiting its fee.
    ///
    /// Read, check and write happen in one transaction. Fails with
    /// [`StoreError::Conflict`] if the fee status has moved past `NoFee`.
    fn renew_fee(
        &self,
        hash: &TicketHash,
        fee_amount: Amount,
        fee_expiration: Timestamp,
    ) -> Result<Ticket, StoreError>;

    /// Number of ticket rows.
    fn count_tickets(&self) -> Result<u64, StoreError>;
}

/// Checks shared by every backend for `update_ticket`.
pub fn check_update(current: &Ticket, next: &Ticket) -> Result<(), StoreError> {
    if next.fee_status < current.fee_status {
        return Err(StoreError::Conflict(format!(
            "ticket {} fee status {} cannot revert to {}",
            current.hash, current.fee_status, next.fee_status
        )));
    }
    Ok(())
}

/// Applies a fee renewal to `current`, enforcing the `NoFee` precondition.
pub fn apply_renewal(
    mut current: Ticket,
    fee_amount: Amount,
    fee_expiration: Timestamp,
) -> Result<Ticket, StoreError> {
    if current.fee_status.is_terminal_for_issuance() {
        return Err(StoreError::Conflict(format!(
            "ticket {} fee status is {}",
            current.hash, current.fee_status
        )));
    }
    current.fee_amount = fee_amount;
    current.fee_expiration = fee_expiration;
    Ok(current)
}
