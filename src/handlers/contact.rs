//! Contact form endpoint

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use tracing::{error, info};

use crate::models::contact::{ContactRequest, ContactResponse, ContactSubmission};
use crate::models::error::ErrorResponse;
use crate::services::kv;
use crate::AppState;

/// POST /contact
pub async fn submit_contact_form(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, (StatusCode, Json<ErrorResponse>)> {
    let (Some(name), Some(email), Some(subject), Some(message)) = (
        payload.name,
        payload.email,
        payload.subject,
        payload.message,
    ) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required fields")),
        ));
    };

    let now = Utc::now();
    let submission = ContactSubmission {
        id: format!("contact:{}", now.timestamp_millis()),
        name,
        email: email.clone(),
        company: payload.company,
        subject,
        message,
        inquiry_type: payload.inquiry_type,
        submitted_at: now.to_rfc3339(),
        status: "new".to_string(),
    };

    let value = serde_json::to_value(&submission).map_err(|e| {
        error!(error = %e, "failed to serialize contact submission");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to submit contact form")),
        )
    })?;

    kv::set(state.db.as_ref(), &submission.id, value).await.map_err(|e| {
        error!(error = %e, "failed to store contact submission");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to submit contact form")),
        )
    })?;

    info!(contact_id = %submission.id, email = %email, "contact form submitted");

    Ok(Json(ContactResponse {
        success: true,
        message: "Contact form submitted successfully".to_string(),
    }))
}
