// src/bin/seed_marketplace.rs
//
// Deploy-time seed step: run once after migrations to create the private
// document bucket, the four sample blue carbon projects and the initial
// platform statistics. Idempotent; safe to re-run.

use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use std::env;

use bluecarbon_backend::services::{object_storage::StorageService, seed};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let db = Database::connect(&database_url).await?;

    println!("Running migrations...");
    migration::Migrator::up(&db, None).await?;

    println!("Ensuring document bucket exists...");
    let storage = StorageService::from_env();
    let created = storage.create_bucket_if_missing().await?;
    if created {
        println!("Created bucket '{}'", storage.bucket());
    } else {
        println!("Bucket '{}' already present", storage.bucket());
    }

    println!("Seeding marketplace data...");
    let report = seed::seed_marketplace(&db).await?;
    println!(
        "Seeded {} projects, stats seeded: {}",
        report.projects_seeded, report.stats_seeded
    );

    Ok(())
}
