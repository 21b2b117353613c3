//! SeaORM Entity for seller credit listings
//!
//! Owner-scoped rows; deletable only by the owning user (the handler makes
//! that check explicit rather than relying on a backend row policy).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "seller_listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub project_name: String,
    /// Listing category (e.g. "Restoration & Protection")
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub listing_type: String,
    pub location: String,
    /// Asking price per credit in the platform base currency unit
    pub price_per_credit: Decimal,
    /// Credits offered for sale
    pub quantity: i64,
    pub description: Option<String>,
    pub certification: Option<String>,
    /// Co-benefit tags as a JSON string array
    #[sea_orm(column_type = "JsonBinary")]
    pub co_benefits: Option<Json>,
    /// "active" | "sold" | "paused"
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
