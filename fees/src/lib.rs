//! Fee issuance core of the VSP.
//!
//! - [`FeeAddressAllocator`] hands out fee addresses, one index at a time,
//!   persisting the cursor before an address is returned.
//! - [`FeeCalculator`] computes the fee owed for a ticket from the chain tip.
//! - [`TicketFeeIssuer`] ties both to the ticket store and the node, and is
//!   the single entry point for fee address requests.

pub mod allocator;
pub mod calculator;
pub mod error;
pub mod issuer;

pub use allocator::FeeAddressAllocator;
pub use calculator::{stake_pool_ticket_fee, FeeCalculator, FeePolicy};
pub use error::{ErrorCode, FeeError};
pub use issuer::{FeeAddressResponse, IssuerConfig, RequestContext, TicketFeeIssuer};
