//! Seller listing endpoints

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::error;

use crate::entities::seller_listings;
use crate::models::error::ErrorResponse;
use crate::models::listing::{CreateListingRequest, DeleteListingResponse};
use crate::services::auth::{extract_bearer, AuthError};
use crate::services::listings::{self, ListingError};
use crate::AppState;

async fn caller_id(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<String, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_bearer(headers).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(e.to_string())),
        )
    })?;
    let user = state.auth.get_user(&token).await.map_err(|e| match e {
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

fn map_listing_error(e: ListingError) -> (StatusCode, Json<ErrorResponse>) {
    let message = e.to_string();
    let status = match &e {
        ListingError::Validation(_) => StatusCode::BAD_REQUEST,
        ListingError::NotFound => StatusCode::NOT_FOUND,
        ListingError::Forbidden => StatusCode::FORBIDDEN,
        ListingError::Db(err) => {
            error!(error = %err, "listing database failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::new(message)))
}

/// POST /seller-listings
pub async fn create_seller_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateListingRequest>,
) -> Result<Json<seller_listings::Model>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = caller_id(&state, &headers).await?;
    let listing = listings::create_listing(&state.db, &user_id, payload)
        .await
        .map_err(map_listing_error)?;
    Ok(Json(listing))
}

/// GET /seller-listings — the caller's own listings, newest first
pub async fn list_own_listings(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<seller_listings::Model>>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = caller_id(&state, &headers).await?;
    let rows = listings::listings_for_user(&state.db, &user_id)
        .await
        .map_err(map_listing_error)?;
    Ok(Json(rows))
}

/// GET /seller-listings/active — public feed
pub async fn list_active_listings(
    State(state): State<AppState>,
) -> Result<Json<Vec<seller_listings::Model>>, (StatusCode, Json<ErrorResponse>)> {
    let rows = listings::active_listings(&state.db)
        .await
        .map_err(map_listing_error)?;
    Ok(Json(rows))
}

/// DELETE /seller-listings/{id}
pub async fn delete_seller_listing(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<DeleteListingResponse>, (StatusCode, Json<ErrorResponse>)> {
    let user_id = caller_id(&state, &headers).await?;
    listings::delete_listing(&state.db, &user_id, &id)
        .await
        .map_err(map_listing_error)?;
    Ok(Json(DeleteListingResponse {
        success: true,
        message: "Listing deleted".to_string(),
    }))
}
