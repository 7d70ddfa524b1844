//! Fundamental types for the VSP.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! network profiles, amounts, ticket hashes, fee addresses, timestamps and the
//! persisted ticket record.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod network;
pub mod ticket;
pub mod time;

pub use address::FeeAddress;
pub use amount::{Amount, ATOMS_PER_COIN};
pub use error::{NetworkError, VspError};
pub use hash::TicketHash;
pub use network::{Agenda, AgendaHeights, ChainParams, Deployment, NetworkProfile};
pub use ticket::{FeeStatus, Ticket};
pub use time::Timestamp;
