//! Blue carbon project records and the developer submission payload

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A verified ecosystem-restoration project generating carbon credits.
///
/// Stored at `project:{id}`; `credits_available` is mutated only by the
/// purchase ledger and never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Full KV key, e.g. "project:1"
    pub id: String,
    pub name: String,
    pub location: String,
    /// Project category (e.g. "Restoration & Protection")
    #[serde(rename = "type")]
    pub project_type: String,
    /// Price per credit in the platform base currency unit
    pub price: Decimal,
    /// Certification label (e.g. "Verified Carbon Standard (VCS)")
    pub certification: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Impact line shown on the marketplace card
    #[serde(default)]
    pub impact: Option<String>,
    pub credits_available: i64,
    #[serde(default)]
    pub co_benefits: Vec<String>,
    pub created_at: String,
    /// "pending_verification" for developer-submitted projects; absent on
    /// seeded marketplace projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Request to submit a new project for verification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "type", default)]
    pub project_type: Option<String>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub credits_available: Option<i64>,
    #[serde(default)]
    pub co_benefits: Option<Vec<String>>,
}

/// Response for project submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectResponse {
    pub success: bool,
    pub project: Project,
    pub message: String,
}
