use serde::{Serialize, Serializer};
use thiserror::Error;

use vsp_chain::NodeError;
use vsp_store::StoreError;
use vsp_types::NetworkError;

/// Stable failure codes reported to clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    BadRequest = 0,
    InternalError = 1,
    VspClosed = 2,
    FeeAlreadyReceived = 3,
    UnknownTicket = 6,
    TicketCannotVote = 7,
    UnsupportedNetwork = 18,
}

impl ErrorCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// The message sent to clients alongside the code.
    pub fn default_message(self) -> &'static str {
        match self {
            Self::BadRequest => "bad request",
            Self::InternalError => "internal error",
            Self::VspClosed => "vsp is closed",
            Self::FeeAlreadyReceived => "fee tx already received for ticket",
            Self::UnknownTicket => "unknown ticket",
            Self::TicketCannotVote => "ticket not eligible to vote",
            Self::UnsupportedNetwork => "unsupported network",
        }
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

/// Why a fee issuance request failed.
#[derive(Debug, Error)]
pub enum FeeError {
    #[error(transparent)]
    UnsupportedNetwork(#[from] NetworkError),

    #[error("vsp is closed")]
    ServiceClosed,

    #[error("fee already received for ticket")]
    FeeAlreadyReceived,

    #[error("ticket lookup failed: {0}")]
    TicketLookupFailed(#[source] NodeError),

    #[error("node query failed: {0}")]
    NodeQueryFailed(#[source] NodeError),

    #[error("ticket cannot vote")]
    TicketNotVotable,

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("failed to persist fee address index: {0}")]
    AllocationPersistFailed(#[source] StoreError),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl FeeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnsupportedNetwork(_) => ErrorCode::UnsupportedNetwork,
            Self::ServiceClosed => ErrorCode::VspClosed,
            Self::FeeAlreadyReceived => ErrorCode::FeeAlreadyReceived,
            Self::TicketNotVotable => ErrorCode::TicketCannotVote,
            Self::TicketLookupFailed(_)
            | Self::NodeQueryFailed(_)
            | Self::InvalidAmount(_)
            | Self::AllocationPersistFailed(_)
            | Self::InternalError(_) => ErrorCode::InternalError,
        }
    }

    /// Defined rejections, as opposed to infrastructure failures.
    pub fn is_rejection(&self) -> bool {
        self.code() != ErrorCode::InternalError
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_have_their_own_codes() {
        assert_eq!(FeeError::ServiceClosed.code(), ErrorCode::VspClosed);
        assert_eq!(FeeError::FeeAlreadyReceived.code(), ErrorCode::FeeAlreadyReceived);
        assert_eq!(FeeError::TicketNotVotable.code(), ErrorCode::TicketCannotVote);
        assert!(FeeError::TicketNotVotable.is_rejection());
        let net = FeeError::from(NetworkError::UnsupportedNetwork("regnet".into()));
        assert_eq!(net.code(), ErrorCode::UnsupportedNetwork);
    }

    #[test]
    fn infrastructure_failures_are_internal() {
        let errs = [
            FeeError::NodeQueryFailed(NodeError::Unreachable("down".into())),
            FeeError::TicketLookupFailed(NodeError::Unreachable("down".into())),
            FeeError::AllocationPersistFailed(StoreError::Backend("disk".into())),
            FeeError::InvalidAmount("overflow".into()),
            FeeError::InternalError("insert".into()),
        ];
        for err in errs {
            assert_eq!(err.code(), ErrorCode::InternalError);
            assert!(!err.is_rejection());
        }
    }

    #[test]
    fn code_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::TicketCannotVote).unwrap();
        assert_eq!(json, "7");
    }
}
