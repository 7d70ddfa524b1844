//! Web API errors and their HTTP representation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use vsp_fees::{ErrorCode, FeeError};

#[derive(Debug, Error)]
pub enum WebApiError {
    #[error(transparent)]
    Fee(#[from] FeeError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unknown ticket: {0}")]
    UnknownTicket(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebApiError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Fee(e) => e.code(),
            Self::BadRequest(_) => ErrorCode::BadRequest,
            Self::UnknownTicket(_) => ErrorCode::UnknownTicket,
            Self::Internal(_) | Self::Io(_) => ErrorCode::InternalError,
        }
    }

    /// Message sent to the client. Internal detail is never exposed.
    pub fn client_message(&self) -> String {
        match self {
            Self::BadRequest(detail) => detail.clone(),
            _ => self.code().default_message().to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl IntoResponse for WebApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.client_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
