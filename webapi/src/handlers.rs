//! Request handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use tracing::{debug, error, warn};

use vsp_chain::{NodeError, NodeQuery};
use vsp_crypto::AddressDeriver;
use vsp_fees::RequestContext;
use vsp_store::VspStore;
use vsp_types::{TicketHash, Timestamp};

use crate::error::WebApiError;
use crate::server::AppState;
use crate::types::{FeeAddressRequest, FeeAddressResponse, VspInfoResponse};

pub const API_VERSION: u32 = 3;

// ── Fee address ──────────────────────────────────────────────────────────

/// `POST /api/v3/feeaddress`
pub async fn fee_address<S, N, D>(
    State(state): State<Arc<AppState<S, N, D>>>,
    body: Bytes,
) -> Result<Json<FeeAddressResponse>, WebApiError>
where
    S: VspStore + 'static,
    N: NodeQuery + 'static,
    D: AddressDeriver + 'static,
{
    let started = Instant::now();
    state.metrics.fee_requests.inc();

    let result = issue_fee_address(&state, &body).await;

    state
        .metrics
        .fee_request_ms
        .observe(started.elapsed().as_secs_f64() * 1000.0);
    match &result {
        Ok(_) => state.metrics.fee_addresses_served.inc(),
        Err(e) => {
            let code = e.code().as_u16().to_string();
            state.metrics.fee_errors.with_label_values(&[code.as_str()]).inc();
        }
    }
    result.map(Json)
}

async fn issue_fee_address<S, N, D>(
    state: &AppState<S, N, D>,
    body: &[u8],
) -> Result<FeeAddressResponse, WebApiError>
where
    S: VspStore,
    N: NodeQuery,
    D: AddressDeriver,
{
    let issuer = &state.issuer;
    if issuer.config().vsp_closed {
        return Err(vsp_fees::FeeError::ServiceClosed.into());
    }

    let request: FeeAddressRequest = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "bad fee address request");
        WebApiError::BadRequest(e.to_string())
    })?;
    let ticket_hash = TicketHash::from_hex(&request.tickethash)
        .map_err(|e| WebApiError::BadRequest(e.to_string()))?;
    for (field, value) in [("tickethex", &request.tickethex), ("parenthex", &request.parenthex)] {
        if value.is_empty() || hex::decode(value).is_err() {
            return Err(WebApiError::BadRequest(format!("{field} is not valid hex")));
        }
    }

    let existing = issuer.existing_ticket(&ticket_hash)?;
    let commitment_address = match &existing {
        Some(ticket) => ticket.commitment_address.clone(),
        None => commitment_address(issuer.node(), &ticket_hash).await?,
    };

    let ctx = RequestContext::now();
    let issued = issuer
        .request_fee_address(&ctx, &ticket_hash, &commitment_address, existing)
        .await?;

    debug!(
        ticket_hash = %ticket_hash,
        fee_address = %issued.fee_address,
        fee_amount = %issued.fee_amount,
        "fee address served"
    );
    Ok(FeeAddressResponse {
        timestamp: issued.timestamp.as_secs(),
        feeaddress: issued.fee_address.as_str().to_string(),
        feeamount: issued.fee_amount.atoms(),
        expiration: issued.expiration.as_secs(),
        request,
    })
}

/// Commitment address of a ticket the VSP has not seen before.
async fn commitment_address<N: NodeQuery>(
    node: &N,
    ticket_hash: &TicketHash,
) -> Result<String, WebApiError> {
    let raw = match node.get_raw_transaction(ticket_hash).await {
        Ok(raw) => raw,
        Err(NodeError::TxNotFound(_)) => {
            warn!(ticket_hash = %ticket_hash, "unknown ticket");
            return Err(WebApiError::UnknownTicket(ticket_hash.to_hex()));
        }
        Err(e) => {
            error!(ticket_hash = %ticket_hash, error = %e, "could not retrieve ticket tx");
            return Err(WebApiError::Internal(e.to_string()));
        }
    };
    if !raw.is_ticket {
        warn!(ticket_hash = %ticket_hash, "transaction is not a ticket");
        return Err(WebApiError::BadRequest(format!("{ticket_hash} is not a ticket")));
    }
    raw.commitment_address
        .ok_or_else(|| WebApiError::BadRequest(format!("{ticket_hash} has no commitment output")))
}

// ── Service info ─────────────────────────────────────────────────────────

/// `GET /api/v3/vspinfo`
pub async fn vsp_info<S, N, D>(
    State(state): State<Arc<AppState<S, N, D>>>,
) -> Result<Json<VspInfoResponse>, WebApiError>
where
    S: VspStore + 'static,
    N: NodeQuery + 'static,
    D: AddressDeriver + 'static,
{
    let issuer = &state.issuer;
    let tickets = issuer.ticket_count()?;
    state.metrics.tickets.set(i64::try_from(tickets).unwrap_or(i64::MAX));

    Ok(Json(VspInfoResponse {
        apiversions: vec![API_VERSION],
        timestamp: Timestamp::now().as_secs(),
        network: issuer.profile().name.clone(),
        feepercentage: issuer.calculator().policy().fee_percent,
        vspclosed: issuer.config().vsp_closed,
        voteversion: issuer.profile().current_vote_version(),
        tickets,
        lastaddressindex: issuer.allocator().last_issued_index().await,
        feeexpiration: vsp_utils::format_duration(issuer.config().fee_expiration_secs),
    }))
}

// ── Metrics ──────────────────────────────────────────────────────────────

/// `GET /metrics`
pub async fn metrics<S, N, D>(
    State(state): State<Arc<AppState<S, N, D>>>,
) -> Result<impl IntoResponse, WebApiError>
where
    S: VspStore + 'static,
    N: NodeQuery + 'static,
    D: AddressDeriver + 'static,
{
    let text = state
        .metrics
        .encode()
        .map_err(|e| WebApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text))
}
