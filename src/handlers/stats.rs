//! Platform statistics endpoint

use axum::{extract::State, http::StatusCode, Json};
use tracing::error;

use crate::models::error::ErrorResponse;
use crate::models::stats::PlatformStats;
use crate::services::kv;
use crate::AppState;

/// GET /stats — zeroed defaults when the platform is unseeded
pub async fn get_platform_stats(
    State(state): State<AppState>,
) -> Result<Json<PlatformStats>, (StatusCode, Json<ErrorResponse>)> {
    let value = kv::get(state.db.as_ref(), "platform:stats").await.map_err(|e| {
        error!(error = %e, "failed to fetch platform stats");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to fetch statistics")),
        )
    })?;

    let stats = match value {
        Some(value) => serde_json::from_value(value).map_err(|e| {
            error!(error = %e, "malformed stats record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to fetch statistics")),
            )
        })?,
        None => PlatformStats::default(),
    };

    Ok(Json(stats))
}
