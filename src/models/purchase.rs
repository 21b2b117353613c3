//! Purchase ledger entries and the checkout request/response payloads

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to purchase credits from a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    #[serde(rename = "projectId", default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>,
}

/// An immutable, append-only purchase record.
///
/// Stored at `purchase:{millis}:{userId}` (time-ordered). The project name
/// and unit price are snapshots taken at purchase time; later price changes
/// never touch past purchases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: String,
    pub user_id: String,
    pub project_id: String,
    pub project_name: String,
    pub credits_purchased: i64,
    pub price_per_credit: Decimal,
    pub total_amount: Decimal,
    pub purchase_date: String,
    /// "completed" is terminal for this flow
    pub status: String,
    pub certificate_id: String,
}

/// Response for a successful purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub success: bool,
    pub purchase: Purchase,
    pub message: String,
}
