//! Marketplace project endpoints
//!
//! Public catalog reads plus the authenticated developer submission route.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use tracing::{error, info, warn};

use crate::models::error::ErrorResponse;
use crate::models::project::{CreateProjectRequest, CreateProjectResponse, Project};
use crate::services::auth::extract_bearer;
use crate::services::kv;
use crate::services::ledger::project_key;
use crate::AppState;

/// GET /projects — all marketplace projects
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<Project>>, (StatusCode, Json<ErrorResponse>)> {
    let rows = kv::get_by_prefix(state.db.as_ref(), "project:").await.map_err(|e| {
        error!(error = %e, "failed to fetch projects");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to fetch projects")),
        )
    })?;

    let mut projects = Vec::with_capacity(rows.len());
    for (key, value) in rows {
        match serde_json::from_value::<Project>(value) {
            Ok(project) => projects.push(project),
            Err(e) => warn!(key, error = %e, "skipping malformed project record"),
        }
    }

    Ok(Json(projects))
}

/// GET /projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, (StatusCode, Json<ErrorResponse>)> {
    let value = kv::get(state.db.as_ref(), &project_key(&id)).await.map_err(|e| {
        error!(error = %e, "failed to fetch project");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to fetch project")),
        )
    })?;

    let Some(value) = value else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Project not found")),
        ));
    };

    let project: Project = serde_json::from_value(value).map_err(|e| {
        error!(error = %e, "malformed project record");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to fetch project")),
        )
    })?;

    Ok(Json(project))
}

/// POST /projects — developer-submitted project, queued for verification
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<Json<CreateProjectResponse>, (StatusCode, Json<ErrorResponse>)> {
    extract_bearer(&headers).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new(e.to_string())),
        )
    })?;

    let (Some(name), Some(location), Some(project_type), Some(price), Some(certification)) = (
        payload.name.clone(),
        payload.location.clone(),
        payload.project_type.clone(),
        payload.price,
        payload.certification.clone(),
    ) else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Missing required project fields")),
        ));
    };

    let now = Utc::now();
    let project = Project {
        id: format!("project:{}", now.timestamp_millis()),
        name: name.clone(),
        location,
        project_type,
        price,
        certification,
        description: payload.description,
        impact: payload.impact,
        credits_available: payload.credits_available.unwrap_or(0),
        co_benefits: payload.co_benefits.unwrap_or_default(),
        created_at: now.to_rfc3339(),
        status: Some("pending_verification".to_string()),
    };

    let value = serde_json::to_value(&project).map_err(|e| {
        error!(error = %e, "failed to serialize project");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to create project")),
        )
    })?;

    kv::set(state.db.as_ref(), &project.id, value).await.map_err(|e| {
        error!(error = %e, "failed to store project");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new("Failed to create project")),
        )
    })?;

    info!(project_id = %project.id, name = %name, "new project created");

    Ok(Json(CreateProjectResponse {
        success: true,
        project,
        message: "Project submitted for verification".to_string(),
    }))
}
