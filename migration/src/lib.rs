pub use sea_orm_migration::prelude::*;

mod m20260810_000001_create_kv_store;
mod m20260810_000002_create_seller_listings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260810_000001_create_kv_store::Migration),
            Box::new(m20260810_000002_create_seller_listings::Migration),
        ]
    }
}
