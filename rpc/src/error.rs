//! RPC error types and their HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quadfund_ledger::LedgerError;
use quadfund_node::NodeError;
use quadfund_types::{Credits, TypesError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LedgerError> for RpcError {
    fn from(e: LedgerError) -> Self {
        RpcError::Node(NodeError::Ledger(e))
    }
}

impl From<TypesError> for RpcError {
    fn from(e: TypesError) -> Self {
        RpcError::InvalidRequest(e.to_string())
    }
}

impl From<JsonRejection> for RpcError {
    fn from(e: JsonRejection) -> Self {
        RpcError::InvalidRequest(e.body_text())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    available: Option<Credits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    required: Option<Credits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    leg: Option<String>,
}

impl RpcError {
    /// Stable error kind reported in the `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::Node(NodeError::Ledger(e)) => match e {
                LedgerError::VoterNotFound(_) | LedgerError::ProposalNotFound(_) => "NotFound",
                LedgerError::VoterExists(_) => "VoterExists",
                LedgerError::ProposalNotActive(_) => "ProposalNotActive",
                LedgerError::InsufficientCredits { .. } => "InsufficientCredits",
                LedgerError::DistributionInProgress(_) => "DistributionInProgress",
                LedgerError::InvalidInput(_) => "InvalidInput",
                LedgerError::Overflow => "Overflow",
            },
            RpcError::Node(NodeError::Forbidden(_)) => "Forbidden",
            RpcError::Node(NodeError::InvalidInput(_)) | RpcError::InvalidRequest(_) => {
                "InvalidInput"
            }
            RpcError::Node(NodeError::Transfer { .. }) => "ExternalTransferFailure",
            RpcError::Node(NodeError::Config(_)) | RpcError::Io(_) => {
                "Internal"
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            "NotFound" => StatusCode::NOT_FOUND,
            "VoterExists" | "ProposalNotActive" | "DistributionInProgress" => StatusCode::CONFLICT,
            "Forbidden" => StatusCode::FORBIDDEN,
            "ExternalTransferFailure" => StatusCode::BAD_GATEWAY,
            "Internal" => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            available: None,
            required: None,
            leg: None,
        };
        match self {
            RpcError::Node(NodeError::Ledger(LedgerError::InsufficientCredits {
                available,
                required,
            })) => {
                body.available = Some(*available);
                body.required = Some(*required);
            }
            RpcError::Node(NodeError::Transfer { leg, .. }) => {
                body.leg = Some(leg.to_string());
            }
            _ => {}
        }
        body
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadfund_node::TransferLeg;
    use quadfund_payments::PaymentError;

    #[test]
    fn status_mapping() {
        let cases: Vec<(RpcError, StatusCode)> = vec![
            (
                LedgerError::VoterNotFound("v".into()).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                LedgerError::ProposalNotActive("prop-1".into()).into(),
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::VoterExists("v".into()).into(),
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::InsufficientCredits {
                    available: 10,
                    required: 16,
                }
                .into(),
                StatusCode::BAD_REQUEST,
            ),
            (LedgerError::Overflow.into(), StatusCode::BAD_REQUEST),
            (
                NodeError::Forbidden("0xm".into()).into(),
                StatusCode::FORBIDDEN,
            ),
            (
                NodeError::Transfer {
                    leg: TransferLeg::Payout,
                    source: PaymentError::Unreachable("down".into()),
                }
                .into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                RpcError::InvalidRequest("votes".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                NodeError::Config("fee_bps".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn insufficient_credits_body_carries_figures() {
        let err: RpcError = LedgerError::InsufficientCredits {
            available: 10,
            required: 16,
        }
        .into();
        let json = serde_json::to_value(err.body()).unwrap();
        assert_eq!(json["error"], "InsufficientCredits");
        assert_eq!(json["available"], 10);
        assert_eq!(json["required"], 16);
        assert!(json.get("leg").is_none());
    }
}
