//! Abstract storage traits for the VSP.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! these traits. The rest of the codebase depends only on the traits.

pub mod error;
pub mod meta;
pub mod ticket;

pub use error::StoreError;
pub use meta::AddressIndexStore;
pub use ticket::TicketStore;

/// Everything the fee issuer needs from storage.
pub trait VspStore: TicketStore + AddressIndexStore {}

impl<T: TicketStore + AddressIndexStore> VspStore for T {}
