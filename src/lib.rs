// src/lib.rs

use sea_orm::DatabaseConnection;
use services::{auth::AuthService, object_storage::StorageService};
use std::sync::Arc;

// The connection is Arc-wrapped: DatabaseConnection itself stops being
// Clone once the `mock` testing feature is enabled, and axum state must
// stay Clone either way.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub auth: AuthService,
    pub storage: StorageService,
    pub config: AppConfig,
}

/// Runtime configuration resolved once at startup from the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Whether a company may resubmit its registration after approval.
    /// The workflow state machine only defines resubmission out of
    /// `submitted`/`rejected`; post-approval resubmission is an explicit
    /// deployment choice, closed by default.
    pub allow_resubmit_after_approval: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let allow_resubmit_after_approval = std::env::var("ALLOW_RESUBMIT_AFTER_APPROVAL")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        Self {
            allow_resubmit_after_approval,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            allow_resubmit_after_approval: false,
        }
    }
}

pub mod entities {
    pub mod prelude;
    pub mod kv_store;
    pub mod seller_listings;
}

pub mod services {
    pub mod auth;
    pub mod kv;
    pub mod ledger;
    pub mod listings;
    pub mod object_storage;
    pub mod registration;
    pub mod seed;
}

pub mod models {
    pub mod contact;
    pub mod error;
    pub mod listing;
    pub mod portfolio;
    pub mod project;
    pub mod purchase;
    pub mod registration;
    pub mod stats;
}

pub mod handlers {
    pub mod contact;
    pub mod health;
    pub mod listings;
    pub mod portfolio;
    pub mod projects;
    pub mod purchase;
    pub mod registration;
    pub mod stats;
}

pub mod routes;
