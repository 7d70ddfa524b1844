//! HTTP/JSON API of the VSP.
//!
//! Endpoints:
//! - `POST /api/v3/feeaddress`: issue (or re-issue) the fee address for a ticket
//! - `GET /api/v3/vspinfo`: network, fee rate and service status
//! - `GET /metrics`: Prometheus metrics
//!
//! Errors are returned as `{"code": <n>, "message": "..."}` with HTTP 400
//! for defined rejections and 500 for internal failures.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod server;
pub mod types;

pub use error::{ErrorBody, WebApiError};
pub use metrics::WebApiMetrics;
pub use server::{router, serve, AppState};
pub use types::{FeeAddressRequest, FeeAddressResponse, VspInfoResponse};
