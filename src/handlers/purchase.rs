//! Credit purchase endpoint

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::error;

use crate::models::error::ErrorResponse;
use crate::models::purchase::{PurchaseRequest, PurchaseResponse};
use crate::services::auth::extract_bearer;
use crate::services::ledger::{self, LedgerError};
use crate::AppState;

/// POST /purchase-credits
pub async fn purchase_credits(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, (StatusCode, Json<ErrorResponse>)> {
    extract_bearer(&headers).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(e.to_string())),
        )
    })?;

    let (Some(project_id), Some(quantity), Some(user_id)) =
        (payload.project_id, payload.quantity, payload.user_id)
    else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required fields")),
        ));
    };

    let purchase = ledger::purchase_credits(&state.db, &project_id, quantity, &user_id)
        .await
        .map_err(|e| match e {
            LedgerError::Validation(msg) => (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))),
            LedgerError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("Project not found")),
            ),
            LedgerError::InsufficientInventory { .. } => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new("Not enough credits available")),
            ),
            LedgerError::Corrupt(msg) => {
                error!(error = %msg, "purchase failed on corrupt record");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to process purchase")),
                )
            }
            LedgerError::Db(e) => {
                error!(error = %e, "purchase failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("Failed to process purchase")),
                )
            }
        })?;

    let message = format!(
        "Successfully purchased {} carbon credits",
        purchase.credits_purchased
    );

    Ok(Json(PurchaseResponse {
        success: true,
        purchase,
        message,
    }))
}
