use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::http::response::{ApiResponse, HealthResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::WithdrawRequest;

/// `POST /withdraw`
pub async fn withdraw(
    State(state): State<AppState>,
    payload: Result<Json<WithdrawRequest>, JsonRejection>,
) -> Response {
    let start = Instant::now();
    let mode = state.relay.mode().label();

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::warn!(error = %message, "Rejected withdraw body");
            metrics::record_withdrawal(mode, "validation", start);
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::failure(message))).into_response();
        }
    };

    match state.relay.withdraw(&request).await {
        Ok(signature) => {
            tracing::info!(signature = %signature, "Withdrawal confirmed");
            metrics::record_withdrawal(mode, "success", start);
            (StatusCode::OK, Json(ApiResponse::success(signature.to_string()))).into_response()
        }
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!(error = %e, "Withdraw request rejected");
            } else {
                tracing::error!(error = %e, "Withdrawal failed");
            }
            metrics::record_withdrawal(mode, e.kind(), start);
            e.into_response()
        }
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let info = state.relay.describe();
    Json(HealthResponse {
        status: "ok".to_string(),
        operator: info.operator,
        mode: info.mode.to_string(),
        mint: info.mint,
        ledger_reachable: state.relay.ledger_reachable().await,
    })
}
