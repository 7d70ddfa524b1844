use thiserror::Error;

/// Failures surfaced by any [`crate::TicketStore`] or
/// [`crate::AddressIndexStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("ticket not found: {0}")]
    NotFound(String),

    /// A row already exists for this ticket hash.
    #[error("ticket already stored: {0}")]
    Duplicate(String),

    /// The write would move a ticket's fee status backwards or touch a
    /// row whose fee has already been paid.
    #[error("write conflicts with current record: {0}")]
    Conflict(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}
