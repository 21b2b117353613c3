//! Credit ledger / purchase engine
//!
//! Executes a purchase against a project's inventory with all-or-nothing
//! semantics. The four mutations (purchase record, project decrement,
//! portfolio upsert, platform stats) run in a single database transaction,
//! and every row the transaction rewrites is read `FOR UPDATE` first, so
//! concurrent purchases serialize on the project (no oversell) and on the
//! portfolio/stats aggregates (no lost increments). The purchase record
//! itself is inserted fresh, never upserted.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use std::collections::HashSet;
use tracing::info;

use crate::models::portfolio::Portfolio;
use crate::models::project::Project;
use crate::models::purchase::Purchase;
use crate::models::stats::PlatformStats;
use crate::services::kv;

#[derive(Debug)]
pub enum LedgerError {
    /// Missing/invalid input, rejected before any inventory check
    Validation(String),
    /// Project does not exist
    NotFound(String),
    /// Requested quantity exceeds the project's available credits
    InsufficientInventory { requested: i64, available: i64 },
    /// A stored record failed to deserialize
    Corrupt(String),
    Db(DbErr),
}

impl std::fmt::Display for LedgerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Validation(msg) => write!(f, "{}", msg),
            LedgerError::NotFound(id) => write!(f, "Project {} not found", id),
            LedgerError::InsufficientInventory {
                requested,
                available,
            } => write!(
                f,
                "Not enough credits available (requested {}, available {})",
                requested, available
            ),
            LedgerError::Corrupt(msg) => write!(f, "Corrupt record: {}", msg),
            LedgerError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for LedgerError {}

impl From<DbErr> for LedgerError {
    fn from(e: DbErr) -> Self {
        LedgerError::Db(e)
    }
}

/// Accept both bare ids ("1") and full keys ("project:1").
pub fn project_key(project_id: &str) -> String {
    if let Some(rest) = project_id.strip_prefix("project:") {
        format!("project:{}", rest)
    } else {
        format!("project:{}", project_id)
    }
}

fn portfolio_key(user_id: &str) -> String {
    format!("portfolio:{}", user_id)
}

const STATS_KEY: &str = "platform:stats";

/// Execute a purchase of `quantity` credits from `project_id` for `user_id`.
///
/// Validation order is fixed: quantity and ids first, project existence
/// second, inventory third; only then does any mutation happen. Returns the
/// immutable purchase record as confirmation.
pub async fn purchase_credits(
    db: &DatabaseConnection,
    project_id: &str,
    quantity: i64,
    user_id: &str,
) -> Result<Purchase, LedgerError> {
    if project_id.trim().is_empty() || user_id.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Missing required fields".to_string(),
        ));
    }
    if quantity <= 0 {
        return Err(LedgerError::Validation(
            "Quantity must be greater than zero".to_string(),
        ));
    }

    let key = project_key(project_id);
    let txn = db.begin().await?;

    // Row lock: a concurrent purchase of the same project blocks here until
    // this transaction commits, then re-reads the decremented inventory.
    let Some(value) = kv::get_for_update(&txn, &key).await? else {
        return Err(LedgerError::NotFound(project_id.to_string()));
    };
    let mut project: Project = serde_json::from_value(value)
        .map_err(|e| LedgerError::Corrupt(format!("project {}: {}", key, e)))?;

    if quantity > project.credits_available {
        return Err(LedgerError::InsufficientInventory {
            requested: quantity,
            available: project.credits_available,
        });
    }

    let now = Utc::now();
    let millis = now.timestamp_millis();
    let purchase_id = format!("purchase:{}:{}", millis, user_id);
    let total_amount = Decimal::from(quantity) * project.price;

    let purchase = Purchase {
        id: purchase_id.clone(),
        user_id: user_id.to_string(),
        project_id: project.id.clone(),
        project_name: project.name.clone(),
        credits_purchased: quantity,
        price_per_credit: project.price,
        total_amount,
        purchase_date: now.to_rfc3339(),
        status: "completed".to_string(),
        certificate_id: format!("cert:{}:{}", millis, user_id),
    };

    // Append-only: a key collision (same user, same millisecond) must fail
    // the transaction, not overwrite the earlier ledger entry.
    kv::insert_new(
        &txn,
        &purchase_id,
        serde_json::to_value(&purchase)
            .map_err(|e| LedgerError::Corrupt(format!("purchase: {}", e)))?,
    )
    .await?;

    project.credits_available -= quantity;
    kv::set(
        &txn,
        &key,
        serde_json::to_value(&project)
            .map_err(|e| LedgerError::Corrupt(format!("project: {}", e)))?,
    )
    .await?;

    // Locked like the project row: a same-user purchase of a different
    // project rewrites this aggregate too.
    let mut portfolio = match kv::get_for_update(&txn, &portfolio_key(user_id)).await? {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| LedgerError::Corrupt(format!("portfolio: {}", e)))?,
        None => Portfolio::empty(user_id),
    };
    portfolio.total_credits += quantity;
    portfolio.total_spent += total_amount;
    portfolio.total_co2_offset += quantity;
    portfolio.purchases.push(purchase_id.clone());
    portfolio.active_projects = distinct_project_count(&txn, user_id).await?;

    kv::set(
        &txn,
        &portfolio_key(user_id),
        serde_json::to_value(&portfolio)
            .map_err(|e| LedgerError::Corrupt(format!("portfolio: {}", e)))?,
    )
    .await?;

    let mut stats: PlatformStats = match kv::get_for_update(&txn, STATS_KEY).await? {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| LedgerError::Corrupt(format!("stats: {}", e)))?,
        None => PlatformStats::default(),
    };
    stats.total_credits_sold += quantity;
    stats.total_co2_offset += quantity;
    stats.last_updated = Some(now.to_rfc3339());

    kv::set(
        &txn,
        STATS_KEY,
        serde_json::to_value(&stats).map_err(|e| LedgerError::Corrupt(format!("stats: {}", e)))?,
    )
    .await?;

    txn.commit().await?;

    info!(
        user_id,
        project_id = %project.id,
        quantity,
        "purchase completed"
    );

    Ok(purchase)
}

/// Distinct project ids across the user's purchases, including any written
/// earlier in the same transaction.
async fn distinct_project_count<C: sea_orm::ConnectionTrait>(
    db: &C,
    user_id: &str,
) -> Result<usize, LedgerError> {
    let rows = kv::get_by_prefix(db, "purchase:").await?;
    let mut projects: HashSet<String> = HashSet::new();
    for (_, value) in rows {
        if value.get("user_id").and_then(|v| v.as_str()) == Some(user_id) {
            if let Some(project_id) = value.get("project_id").and_then(|v| v.as_str()) {
                projects.insert(project_id.to_string());
            }
        }
    }
    Ok(projects.len())
}

/// All purchases made by `user_id`, newest first.
pub async fn purchases_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<Purchase>, LedgerError> {
    let rows = kv::get_by_prefix(db, "purchase:").await?;
    let mut purchases: Vec<Purchase> = Vec::new();
    for (key, value) in rows {
        let purchase: Purchase = serde_json::from_value(value)
            .map_err(|e| LedgerError::Corrupt(format!("purchase {}: {}", key, e)))?;
        if purchase.user_id == user_id {
            purchases.push(purchase);
        }
    }
    purchases.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
    Ok(purchases)
}

/// The user's portfolio, or a zeroed one when they have never purchased.
pub async fn portfolio_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Portfolio, LedgerError> {
    match kv::get(db, &portfolio_key(user_id)).await? {
        Some(value) => serde_json::from_value(value)
            .map_err(|e| LedgerError::Corrupt(format!("portfolio: {}", e))),
        None => Ok(Portfolio::empty(user_id)),
    }
}
