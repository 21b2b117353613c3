//! SeaORM Entity for the key-value store
//!
//! Generic jsonb persistence backing projects, purchases, portfolios,
//! platform stats, company registrations and document ownership records.
//! Key convention: `project:{id}`, `purchase:{millis}:{userId}`,
//! `portfolio:{userId}`, `platform:stats`, `company_registration:{userId}`,
//! `contact:{millis}`, `document_owner:{filename}`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "kv_store")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub value: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
