//! Response bodies and error-to-status mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::relay::RelayError;

/// Body of every `/withdraw` response.
///
/// Success: `{"success":true,"tx":"<signature>"}`.
/// Failure: `{"success":false,"error":"<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn success(tx: impl Into<String>) -> Self {
        Self {
            success: true,
            tx: Some(tx.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            tx: None,
            error: Some(error.into()),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub operator: String,
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    pub ledger_reachable: bool,
}

/// HTTP status for a relay failure: input problems are 400, the rest 500.
pub fn status_for(err: &RelayError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (status_for(&self), Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

/// Message returned when the request deadline fires. The transaction may
/// already be on its way, so the caller must not assume nothing moved.
pub const TIMEOUT_MESSAGE: &str =
    "Request timed out; the transaction may have been submitted and can still confirm";

/// Message returned when the body exceeds `withdraw.max_body_bytes`.
pub const BODY_TOO_LARGE_MESSAGE: &str = "Request body too large";

/// Rewrite the bare responses produced by the timeout and body-limit layers
/// into the `{success:false,error}` shape. Anything else passes through.
pub async fn failure_shape(response: Response) -> Response {
    match response.status() {
        StatusCode::REQUEST_TIMEOUT => {
            tracing::error!("Withdraw request timed out before completing");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(TIMEOUT_MESSAGE)),
            )
                .into_response()
        }
        StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::warn!("Rejected oversized request body");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(BODY_TOO_LARGE_MESSAGE)),
            )
                .into_response()
        }
        _ => response,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::LedgerError;

    #[test]
    fn test_success_shape() {
        let json = serde_json::to_value(ApiResponse::success("5VERv8")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "tx": "5VERv8"}));
    }

    #[test]
    fn test_failure_shape() {
        let json = serde_json::to_value(ApiResponse::failure("Missing fields")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Missing fields"})
        );
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_failure_shape_timeout() {
        let response = failure_shape(StatusCode::REQUEST_TIMEOUT.into_response()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"success": false, "error": TIMEOUT_MESSAGE})
        );
    }

    #[tokio::test]
    async fn test_failure_shape_body_limit() {
        let response = failure_shape(
            (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], BODY_TOO_LARGE_MESSAGE);
    }

    #[tokio::test]
    async fn test_failure_shape_passes_other_responses() {
        let response = failure_shape(
            (StatusCode::OK, Json(ApiResponse::success("sig"))).into_response(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["tx"], "sig");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&RelayError::MissingFields), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&RelayError::InvalidDestination("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&RelayError::Ledger(LedgerError::ConfirmationTimeout(60))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&RelayError::Resolution("mint".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
