//! Platform-wide impact statistics

use serde::{Deserialize, Serialize};

/// Singleton aggregate stored at `platform:stats`.
///
/// Seeded once by the deploy-time seed step; the ledger bumps
/// `total_credits_sold` and `total_co2_offset` on every purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformStats {
    pub total_credits_sold: i64,
    pub total_co2_offset: i64,
    pub active_projects: i64,
    pub countries_covered: i64,
    pub communities_supported: i64,
    pub ecosystems_protected: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl Default for PlatformStats {
    fn default() -> Self {
        Self {
            total_credits_sold: 0,
            total_co2_offset: 0,
            active_projects: 0,
            countries_covered: 0,
            communities_supported: 0,
            ecosystems_protected: 0,
            last_updated: None,
        }
    }
}
