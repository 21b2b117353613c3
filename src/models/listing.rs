//! Seller listing payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to publish a new credit listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingRequest {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(rename = "type", default)]
    pub listing_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub price_per_credit: Option<Decimal>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub certification: Option<String>,
    #[serde(default)]
    pub co_benefits: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteListingResponse {
    pub success: bool,
    pub message: String,
}
