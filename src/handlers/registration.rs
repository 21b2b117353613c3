//! Company registration endpoints
//!
//! POST accepts multipart/form-data: a `registrationData` JSON part plus up
//! to six document file parts. GET returns the stored record with the bank
//! account number redacted. The document route hands out short-lived signed
//! URLs after an ownership-index check.

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::collections::HashMap;
use tracing::{error, warn};

use crate::models::error::ErrorResponse;
use crate::models::registration::{
    DocumentUrlResponse, ExistingRegistrationResponse, RegistrationForm,
    RegistrationSubmitResponse,
};
use crate::services::auth::{extract_bearer, AuthError, AuthService, AuthUser};
use crate::services::registration::{self, DocumentUpload, RegistrationError, DOCUMENT_FIELDS};
use crate::AppState;

async fn authenticated_user(
    auth: &AuthService,
    headers: &HeaderMap,
) -> Result<AuthUser, (StatusCode, Json<ErrorResponse>)> {
    let token = extract_bearer(headers).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(e.to_string())),
        )
    })?;
    auth.get_user(&token).await.map_err(|e| match e {
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
    })
}

fn map_registration_error(e: RegistrationError) -> (StatusCode, Json<ErrorResponse>) {
    let message = e.to_string();
    let status = match &e {
        RegistrationError::Validation(_) => StatusCode::BAD_REQUEST,
        RegistrationError::ResubmissionClosed => StatusCode::CONFLICT,
        RegistrationError::Forbidden => StatusCode::FORBIDDEN,
        RegistrationError::NotFound => StatusCode::NOT_FOUND,
        RegistrationError::Upload { .. } | RegistrationError::Storage(_) => {
            error!(error = %message, "registration storage failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        RegistrationError::Db(err) => {
            error!(error = %err, "registration database failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse::new(message)))
}

/// POST /company-registration
pub async fn submit_company_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<RegistrationSubmitResponse>, (StatusCode, Json<ErrorResponse>)> {
    let user = authenticated_user(&state.auth, &headers).await?;

    let mut form: Option<RegistrationForm> = None;
    let mut documents: HashMap<String, DocumentUpload> = HashMap::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!("Malformed form data: {}", e))),
        )
    })? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "registrationData" {
            let text = field.text().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(format!("Malformed form data: {}", e))),
                )
            })?;
            form = Some(serde_json::from_str(&text).map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(format!("Invalid registration data: {}", e))),
                )
            })?);
        } else if DOCUMENT_FIELDS.contains(&name.as_str()) {
            let original_name = field.file_name().unwrap_or("document").to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(format!("Failed to read {}: {}", name, e))),
                )
            })?;
            if !bytes.is_empty() {
                documents.insert(
                    name,
                    DocumentUpload {
                        original_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            }
        } else {
            warn!(field = %name, "ignoring unknown multipart field");
        }
    }

    let Some(form) = form else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing registrationData part")),
        ));
    };

    let receipt = registration::submit(
        &state.db,
        &state.storage,
        &state.config,
        &user,
        form,
        documents,
    )
    .await
    .map_err(map_registration_error)?;

    Ok(Json(RegistrationSubmitResponse {
        success: true,
        registration_id: receipt.registration_id,
        message: "Company registration submitted successfully".to_string(),
        uploaded_documents: receipt.uploaded_documents,
    }))
}

/// GET /company-registration
pub async fn get_company_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ExistingRegistrationResponse>, (StatusCode, Json<ErrorResponse>)> {
    let user = authenticated_user(&state.auth, &headers).await?;

    let registration = registration::check_existing(&state.db, &user.id)
        .await
        .map_err(map_registration_error)?;

    let response = match registration {
        Some(registration) => ExistingRegistrationResponse {
            exists: true,
            registration: Some(registration),
            message: None,
        },
        None => ExistingRegistrationResponse {
            exists: false,
            registration: None,
            message: Some("No company registration found".to_string()),
        },
    };

    Ok(Json(response))
}

/// GET /company-registration/document/{*filename}
pub async fn get_registration_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(filename): Path<String>,
) -> Result<Json<DocumentUrlResponse>, (StatusCode, Json<ErrorResponse>)> {
    let user = authenticated_user(&state.auth, &headers).await?;

    let signed_url = registration::document_url(&state.db, &state.storage, &user.id, &filename)
        .await
        .map_err(map_registration_error)?;

    Ok(Json(DocumentUrlResponse { signed_url }))
}
