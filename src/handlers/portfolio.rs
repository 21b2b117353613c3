//! Buyer portfolio and purchase history endpoints
//!
//! Both routes resolve the caller from a validated bearer token; the user id
//! is never taken from the request.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::error;

use crate::models::error::ErrorResponse;
use crate::models::portfolio::Portfolio;
use crate::models::purchase::Purchase;
use crate::services::auth::{extract_bearer, AuthError, AuthService};
use crate::services::ledger::{self, LedgerError};
use crate::AppState;

async fn authenticated_user_id(
    auth: &AuthService,
    headers: &HeaderMap,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_bearer(headers).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(e.to_string())),
        )
    })?;
    let user = auth.get_user(&token).await.map_err(|e| match e {
        AuthError::MissingToken | AuthError::InvalidToken => (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(e.to_string())),
        ),
        AuthError::Provider(msg) => {
            error!(error = %msg, "auth provider failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Authentication service unavailable")),
            )
        }
    })?;
    Ok(user.id)
}

/// GET /user-portfolio — zeroed portfolio when the user has no purchases
pub async fn get_user_portfolio(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Portfolio>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authenticated_user_id(&state.auth, &headers).await?;

    let portfolio = ledger::portfolio_for_user(&state.db, &user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "failed to fetch portfolio");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to fetch portfolio")),
            )
        })?;

    Ok(Json(portfolio))
}

/// GET /user-purchases — caller's purchases, newest first
pub async fn get_user_purchases(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Purchase>>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = authenticated_user_id(&state.auth, &headers).await?;

    let purchases = ledger::purchases_for_user(&state.db, &user_id)
        .await
        .map_err(|e| {
            match &e {
                LedgerError::Corrupt(msg) => error!(error = %msg, "corrupt purchase record"),
                other => error!(error = %other, "failed to fetch purchases"),
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to fetch purchases")),
            )
        })?;

    Ok(Json(purchases))
}
