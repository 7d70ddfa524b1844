//! Ticket fee issuance.
//!
//! [`TicketFeeIssuer::request_fee_address`] answers "what fee address and
//! amount should the owner of this ticket pay", creating the ticket record
//! on first request and renewing the fee once it has expired.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, warn};

use vsp_chain::NodeQuery;
use vsp_crypto::AddressDeriver;
use vsp_store::{StoreError, VspStore};
use vsp_types::{Amount, FeeAddress, FeeStatus, NetworkProfile, Ticket, TicketHash, Timestamp};

use crate::allocator::FeeAddressAllocator;
use crate::calculator::FeeCalculator;
use crate::error::FeeError;

/// Operator settings consulted on every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuerConfig {
    pub vsp_closed: bool,
    /// Confirmations a ticket needs to be recorded as confirmed.
    pub required_confirmations: i64,
    /// How long an issued fee stays valid.
    pub fee_expiration_secs: u64,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            vsp_closed: false,
            required_confirmations: 6,
            fee_expiration_secs: 3600,
        }
    }
}

/// Values scoped to a single request.
#[derive(Clone, Copy, Debug)]
pub struct RequestContext {
    pub now: Timestamp,
}

impl RequestContext {
    pub fn new(now: Timestamp) -> Self {
        Self { now }
    }

    pub fn now() -> Self {
        Self::new(Timestamp::now())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FeeAddressResponse {
    pub fee_address: FeeAddress,
    pub fee_amount: Amount,
    pub expiration: Timestamp,
    pub timestamp: Timestamp,
}

/// Orchestrates allocation, fee calculation and persistence of ticket records.
pub struct TicketFeeIssuer<S, N, D> {
    store: Arc<S>,
    node: Arc<N>,
    allocator: FeeAddressAllocator<S, D>,
    calculator: FeeCalculator,
    profile: NetworkProfile,
    config: IssuerConfig,
}

impl<S, N, D> TicketFeeIssuer<S, N, D>
where
    S: VspStore,
    N: NodeQuery,
    D: AddressDeriver,
{
    pub fn new(
        store: Arc<S>,
        node: Arc<N>,
        allocator: FeeAddressAllocator<S, D>,
        calculator: FeeCalculator,
        profile: NetworkProfile,
        config: IssuerConfig,
    ) -> Self {
        Self {
            store,
            node,
            allocator,
            calculator,
            profile,
            config,
        }
    }

    pub fn profile(&self) -> &NetworkProfile {
        &self.profile
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    pub fn calculator(&self) -> &FeeCalculator {
        &self.calculator
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn allocator(&self) -> &FeeAddressAllocator<S, D> {
        &self.allocator
    }

    /// Load the persisted record for `hash`, if any.
    pub fn existing_ticket(&self, hash: &TicketHash) -> Result<Option<Ticket>, FeeError> {
        self.store.get_ticket(hash).map_err(|e| {
            error!(ticket_hash = %hash, error = %e, "ticket lookup in storage failed");
            FeeError::InternalError(format!("reading ticket {hash}: {e}"))
        })
    }

    /// Number of ticket records held.
    pub fn ticket_count(&self) -> Result<u64, FeeError> {
        self.store
            .count_tickets()
            .map_err(|e| FeeError::InternalError(format!("counting tickets: {e}")))
    }

    /// Get or create the fee issuance for a ticket.
    ///
    /// `existing` is the persisted record for `ticket_hash`, `None` if the
    /// VSP has never seen the ticket.
    pub async fn request_fee_address(
        &self,
        ctx: &RequestContext,
        ticket_hash: &TicketHash,
        commitment_address: &str,
        existing: Option<Ticket>,
    ) -> Result<FeeAddressResponse, FeeError> {
        if self.config.vsp_closed {
            warn!(ticket_hash = %ticket_hash, "fee address requested while vsp is closed");
            return Err(FeeError::ServiceClosed);
        }

        if let Some(ticket) = &existing {
            if ticket.fee_status.is_terminal_for_issuance() {
                warn!(
                    ticket_hash = %ticket_hash,
                    fee_status = %ticket.fee_status,
                    "fee tx already received"
                );
                return Err(FeeError::FeeAlreadyReceived);
            }
        }

        let raw = self
            .node
            .get_raw_transaction(ticket_hash)
            .await
            .map_err(|e| {
                error!(ticket_hash = %ticket_hash, error = %e, "could not retrieve ticket tx");
                FeeError::TicketLookupFailed(e)
            })?;

        let can_vote = self
            .node
            .can_ticket_vote(&raw, ticket_hash, &self.profile)
            .await
            .map_err(|e| {
                error!(ticket_hash = %ticket_hash, error = %e, "vote eligibility check failed");
                FeeError::NodeQueryFailed(e)
            })?;
        if !can_vote {
            warn!(ticket_hash = %ticket_hash, "unvotable ticket");
            return Err(FeeError::TicketNotVotable);
        }

        match existing {
            Some(ticket) => self.known_ticket(ctx, ticket).await,
            None => {
                let confirmed = raw.confirmations >= self.config.required_confirmations;
                self.new_ticket(ctx, ticket_hash, commitment_address, confirmed)
                    .await
            }
        }
    }

    async fn known_ticket(
        &self,
        ctx: &RequestContext,
        ticket: Ticket,
    ) -> Result<FeeAddressResponse, FeeError> {
        if !ticket.fee_expired(ctx.now) {
            return Ok(FeeAddressResponse {
                fee_address: ticket.fee_address,
                fee_amount: ticket.fee_amount,
                expiration: ticket.fee_expiration,
                timestamp: ctx.now,
            });
        }

        let fee = self.current_fee(&ticket.hash).await?;
        let expiration = ctx.now.plus_secs(self.config.fee_expiration_secs);
        let renewed = self
            .store
            .renew_fee(&ticket.hash, fee, expiration)
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    warn!(ticket_hash = %ticket.hash, "fee received while renewing");
                    FeeError::FeeAlreadyReceived
                }
                other => {
                    error!(ticket_hash = %ticket.hash, error = %other, "fee renewal failed");
                    FeeError::InternalError(format!("renewing fee for {}: {other}", ticket.hash))
                }
            })?;

        debug!(
            ticket_hash = %renewed.hash,
            fee_amount = %renewed.fee_amount,
            fee_expiration = renewed.fee_expiration.as_secs(),
            "expired fee renewed"
        );
        Ok(FeeAddressResponse {
            fee_address: renewed.fee_address,
            fee_amount: renewed.fee_amount,
            expiration: renewed.fee_expiration,
            timestamp: ctx.now,
        })
    }

    async fn new_ticket(
        &self,
        ctx: &RequestContext,
        ticket_hash: &TicketHash,
        commitment_address: &str,
        confirmed: bool,
    ) -> Result<FeeAddressResponse, FeeError> {
        let fee = self.current_fee(ticket_hash).await?;

        let (fee_address, fee_address_index) = self.allocator.allocate().await.map_err(|e| {
            error!(ticket_hash = %ticket_hash, error = %e, "fee address allocation failed");
            FeeError::InternalError(format!("allocating fee address: {e}"))
        })?;

        let expiration = ctx.now.plus_secs(self.config.fee_expiration_secs);
        let ticket = Ticket {
            hash: *ticket_hash,
            commitment_address: commitment_address.to_string(),
            fee_address_index,
            fee_address,
            fee_amount: fee,
            fee_expiration: expiration,
            fee_status: FeeStatus::NoFee,
            confirmed,
        };

        // The allocated index stays spent if the insert fails.
        match self.store.insert_new_ticket(&ticket) {
            Ok(()) => {}
            Err(StoreError::Duplicate(_)) => {
                // A concurrent request for the same ticket inserted first.
                warn!(
                    ticket_hash = %ticket_hash,
                    fee_address_index,
                    "ticket inserted concurrently, replaying stored fee"
                );
                return self.stored_ticket(ctx, ticket_hash).await;
            }
            Err(e) => {
                error!(
                    ticket_hash = %ticket_hash,
                    fee_address_index,
                    error = %e,
                    "inserting ticket failed"
                );
                return Err(FeeError::InternalError(format!(
                    "inserting ticket {ticket_hash}: {e}"
                )));
            }
        }

        debug!(
            ticket_hash = %ticket_hash,
            confirmed,
            fee_address_index,
            fee_address = %ticket.fee_address,
            fee_amount = %fee,
            "fee address created for new ticket"
        );
        Ok(FeeAddressResponse {
            fee_address: ticket.fee_address,
            fee_amount: fee,
            expiration,
            timestamp: ctx.now,
        })
    }

    /// Answer from the row another request stored for this ticket.
    async fn stored_ticket(
        &self,
        ctx: &RequestContext,
        ticket_hash: &TicketHash,
    ) -> Result<FeeAddressResponse, FeeError> {
        let ticket = self
            .store
            .get_ticket(ticket_hash)
            .map_err(|e| FeeError::InternalError(format!("reloading ticket {ticket_hash}: {e}")))?
            .ok_or_else(|| {
                FeeError::InternalError(format!("ticket {ticket_hash} vanished after insert"))
            })?;
        if ticket.fee_status.is_terminal_for_issuance() {
            return Err(FeeError::FeeAlreadyReceived);
        }
        self.known_ticket(ctx, ticket).await
    }

    async fn current_fee(&self, ticket_hash: &TicketHash) -> Result<Amount, FeeError> {
        self.calculator
            .current_fee(self.node.as_ref(), &self.profile)
            .await
            .map_err(|e| {
                error!(ticket_hash = %ticket_hash, error = %e, "fee calculation failed");
                e
            })
    }
}
