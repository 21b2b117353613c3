//! Seller listing management
//!
//! Owner-scoped CRUD over the `seller_listings` table. Deletion checks the
//! owner explicitly in this layer rather than trusting a backend row policy.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};
use tracing::info;

use crate::entities::{prelude::SellerListings, seller_listings};
use crate::models::listing::CreateListingRequest;

#[derive(Debug)]
pub enum ListingError {
    /// Missing required input; message names the fields
    Validation(String),
    NotFound,
    /// Caller is not the listing owner
    Forbidden,
    Db(DbErr),
}

impl std::fmt::Display for ListingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListingError::Validation(msg) => write!(f, "{}", msg),
            ListingError::NotFound => write!(f, "Listing not found"),
            ListingError::Forbidden => write!(f, "Access denied"),
            ListingError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ListingError {}

impl From<DbErr> for ListingError {
    fn from(e: DbErr) -> Self {
        ListingError::Db(e)
    }
}

fn validate(req: &CreateListingRequest) -> Result<(), ListingError> {
    let mut missing: Vec<&str> = Vec::new();
    if req.project_name.as_deref().is_none_or(|v| v.trim().is_empty()) {
        missing.push("project_name");
    }
    if req.listing_type.as_deref().is_none_or(|v| v.trim().is_empty()) {
        missing.push("type");
    }
    if req.location.as_deref().is_none_or(|v| v.trim().is_empty()) {
        missing.push("location");
    }
    if req.price_per_credit.is_none() {
        missing.push("price_per_credit");
    }
    match req.quantity {
        None => missing.push("quantity"),
        Some(q) if q <= 0 => {
            return Err(ListingError::Validation(
                "Quantity must be greater than zero".to_string(),
            ))
        }
        Some(_) => {}
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ListingError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Publish a new listing owned by `user_id`, status `active`.
pub async fn create_listing(
    db: &DatabaseConnection,
    user_id: &str,
    req: CreateListingRequest,
) -> Result<seller_listings::Model, ListingError> {
    validate(&req)?;

    let model = seller_listings::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        user_id: Set(user_id.to_string()),
        project_name: Set(req.project_name.unwrap_or_default()),
        listing_type: Set(req.listing_type.unwrap_or_default()),
        location: Set(req.location.unwrap_or_default()),
        price_per_credit: Set(req.price_per_credit.unwrap_or_default()),
        quantity: Set(req.quantity.unwrap_or_default()),
        description: Set(req.description),
        certification: Set(req.certification),
        co_benefits: Set(req
            .co_benefits
            .map(|tags| serde_json::json!(tags))),
        status: Set("active".to_string()),
        created_at: Set(Utc::now().into()),
    };

    let listing = model.insert(db).await?;
    info!(listing_id = %listing.id, user_id, "seller listing created");
    Ok(listing)
}

/// The caller's own listings, newest first.
pub async fn listings_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<seller_listings::Model>, ListingError> {
    Ok(SellerListings::find()
        .filter(seller_listings::Column::UserId.eq(user_id))
        .order_by_desc(seller_listings::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Public feed of active listings, newest first.
pub async fn active_listings(
    db: &DatabaseConnection,
) -> Result<Vec<seller_listings::Model>, ListingError> {
    Ok(SellerListings::find()
        .filter(seller_listings::Column::Status.eq("active"))
        .order_by_desc(seller_listings::Column::CreatedAt)
        .all(db)
        .await?)
}

/// Delete one of the caller's listings. Fails with `Forbidden` when the
/// listing belongs to someone else.
pub async fn delete_listing(
    db: &DatabaseConnection,
    user_id: &str,
    listing_id: &str,
) -> Result<(), ListingError> {
    let listing = SellerListings::find_by_id(listing_id)
        .one(db)
        .await?
        .ok_or(ListingError::NotFound)?;

    if listing.user_id != user_id {
        return Err(ListingError::Forbidden);
    }

    SellerListings::delete_by_id(listing_id).exec(db).await?;
    info!(listing_id, user_id, "seller listing deleted");
    Ok(())
}
