//! Router and server lifecycle.

use std::future::Future;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use vsp_chain::NodeQuery;
use vsp_crypto::AddressDeriver;
use vsp_fees::TicketFeeIssuer;
use vsp_store::VspStore;

use crate::error::WebApiError;
use crate::handlers;
use crate::metrics::WebApiMetrics;

/// State shared by every handler.
pub struct AppState<S, N, D> {
    pub issuer: TicketFeeIssuer<S, N, D>,
    pub metrics: WebApiMetrics,
}

impl<S, N, D> AppState<S, N, D> {
    pub fn new(issuer: TicketFeeIssuer<S, N, D>) -> Self {
        Self {
            issuer,
            metrics: WebApiMetrics::new(),
        }
    }
}

pub fn router<S, N, D>(state: Arc<AppState<S, N, D>>) -> Router
where
    S: VspStore + 'static,
    N: NodeQuery + 'static,
    D: AddressDeriver + 'static,
{
    Router::new()
        .route("/api/v3/feeaddress", post(handlers::fee_address::<S, N, D>))
        .route("/api/v3/vspinfo", get(handlers::vsp_info::<S, N, D>))
        .route("/metrics", get(handlers::metrics::<S, N, D>))
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` resolves.
pub async fn serve<S, N, D>(
    listener: TcpListener,
    state: Arc<AppState<S, N, D>>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), WebApiError>
where
    S: VspStore + 'static,
    N: NodeQuery + 'static,
    D: AddressDeriver + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "web API listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
