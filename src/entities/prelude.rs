pub use super::kv_store::Entity as KvStore;
pub use super::seller_listings::Entity as SellerListings;
