//! Route table for the marketplace API

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{handlers, AppState};

/// Six documents at the 10 MB bucket limit, plus multipart overhead
const MAX_SUBMISSION_BYTES: usize = 64 * 1024 * 1024;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route("/projects/{id}", get(handlers::projects::get_project))
        .route(
            "/purchase-credits",
            post(handlers::purchase::purchase_credits),
        )
        .route(
            "/user-portfolio",
            get(handlers::portfolio::get_user_portfolio),
        )
        .route(
            "/user-purchases",
            get(handlers::portfolio::get_user_purchases),
        )
        .route("/stats", get(handlers::stats::get_platform_stats))
        .route("/contact", post(handlers::contact::submit_contact_form))
        .route(
            "/company-registration",
            post(handlers::registration::submit_company_registration)
                .get(handlers::registration::get_company_registration),
        )
        .route(
            "/company-registration/document/{*filename}",
            get(handlers::registration::get_registration_document),
        )
        .route(
            "/seller-listings",
            post(handlers::listings::create_seller_listing)
                .get(handlers::listings::list_own_listings),
        )
        .route(
            "/seller-listings/active",
            get(handlers::listings::list_active_listings),
        )
        .route(
            "/seller-listings/{id}",
            delete(handlers::listings::delete_seller_listing),
        )
        .layer(DefaultBodyLimit::max(MAX_SUBMISSION_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
