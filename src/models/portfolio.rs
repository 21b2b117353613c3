//! Buyer portfolio aggregate

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate holdings for one buyer, stored at `portfolio:{userId}`.
///
/// Created lazily on first purchase and updated by the ledger inside the
/// same transaction as the purchase record. `active_projects` is the count
/// of distinct project ids across the user's purchases, recomputed on every
/// update rather than incremented.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub user_id: String,
    pub total_credits: i64,
    pub total_spent: Decimal,
    /// 1 credit = 1 metric tonne CO2-equivalent
    pub total_co2_offset: i64,
    pub active_projects: usize,
    /// Ordered purchase ids, oldest first
    pub purchases: Vec<String>,
}

impl Portfolio {
    pub fn empty(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            total_credits: 0,
            total_spent: Decimal::ZERO,
            total_co2_offset: 0,
            active_projects: 0,
            purchases: Vec::new(),
        }
    }
}
