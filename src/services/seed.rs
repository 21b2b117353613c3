//! Deploy-time marketplace seeding
//!
//! Idempotent: sample projects are only written when no `project:*` keys
//! exist, platform stats only when the singleton is absent. Runs from the
//! `seed_marketplace` binary, never on the serve path, so concurrently
//! starting server instances cannot race each other into duplicate seeds.

use chrono::Utc;
use rust_decimal_macros::dec;
use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;

use crate::models::project::Project;
use crate::models::stats::PlatformStats;
use crate::services::kv;

#[derive(Debug, Default)]
pub struct SeedReport {
    pub projects_seeded: usize,
    pub stats_seeded: bool,
}

pub fn sample_projects() -> Vec<Project> {
    let created_at = Utc::now().to_rfc3339();
    vec![
        Project {
            id: "project:1".into(),
            name: "Mangrove Restoration - Andhra Pradesh, India".into(),
            location: "Andhra Pradesh, India".into(),
            project_type: "Restoration & Protection".into(),
            price: dec!(17),
            certification: "Verified Carbon Standard (VCS)".into(),
            description: Some(
                "Large-scale mangrove restoration project protecting 5,000 hectares of coastal forest."
                    .into(),
            ),
            impact: Some("1 credit = 1 metric tonne CO₂ removed".into()),
            credits_available: 50_000,
            co_benefits: vec![
                "Biodiversity Protection".into(),
                "Local Fisheries Support".into(),
                "Coastal Defense".into(),
            ],
            created_at: created_at.clone(),
            status: None,
        },
        Project {
            id: "project:2".into(),
            name: "Seagrass Conservation - Great Barrier Reef".into(),
            location: "Queensland, Australia".into(),
            project_type: "Conservation".into(),
            price: dec!(22),
            certification: "Gold Standard".into(),
            description: Some(
                "Protecting and restoring critical seagrass meadows in the Great Barrier Reef Marine Park."
                    .into(),
            ),
            impact: Some("1 credit = 1 metric tonne CO₂ sequestered".into()),
            credits_available: 25_000,
            co_benefits: vec![
                "Marine Biodiversity".into(),
                "Tourism Support".into(),
                "Water Quality Improvement".into(),
            ],
            created_at: created_at.clone(),
            status: None,
        },
        Project {
            id: "project:3".into(),
            name: "Salt Marsh Restoration - Norfolk, UK".into(),
            location: "Norfolk, United Kingdom".into(),
            project_type: "Restoration".into(),
            price: dec!(19),
            certification: "Plan Vivo".into(),
            description: Some(
                "Restoring degraded salt marshes along the Norfolk coast to enhance carbon storage."
                    .into(),
            ),
            impact: Some("1 credit = 1 metric tonne CO₂ stored".into()),
            credits_available: 15_000,
            co_benefits: vec![
                "Flood Protection".into(),
                "Bird Habitat".into(),
                "Research Opportunities".into(),
            ],
            created_at: created_at.clone(),
            status: None,
        },
        Project {
            id: "project:4".into(),
            name: "Blue Carbon Initiative - Philippines".into(),
            location: "Palawan, Philippines".into(),
            project_type: "Community-Based".into(),
            price: dec!(15),
            certification: "Climate Action Reserve".into(),
            description: Some(
                "Community-led mangrove restoration supporting local livelihoods and coastal protection."
                    .into(),
            ),
            impact: Some("1 credit = 1 metric tonne CO₂ avoided".into()),
            credits_available: 30_000,
            co_benefits: vec![
                "Community Employment".into(),
                "Sustainable Fishing".into(),
                "Education Programs".into(),
            ],
            created_at,
            status: None,
        },
    ]
}

pub fn initial_stats() -> PlatformStats {
    PlatformStats {
        total_credits_sold: 125_000,
        total_co2_offset: 125_000,
        active_projects: 150,
        countries_covered: 25,
        communities_supported: 45_000,
        ecosystems_protected: 15_000,
        last_updated: Some(Utc::now().to_rfc3339()),
    }
}

/// Seed sample projects and platform stats when absent.
pub async fn seed_marketplace(db: &DatabaseConnection) -> Result<SeedReport, DbErr> {
    let mut report = SeedReport::default();

    let existing = kv::get_by_prefix(db, "project:").await?;
    if existing.is_empty() {
        for project in sample_projects() {
            let value = serde_json::to_value(&project)
                .map_err(|e| DbErr::Custom(format!("serialize project: {}", e)))?;
            kv::set(db, &project.id, value).await?;
            report.projects_seeded += 1;
        }
        info!(count = report.projects_seeded, "sample projects seeded");
    }

    if kv::get(db, "platform:stats").await?.is_none() {
        let value = serde_json::to_value(initial_stats())
            .map_err(|e| DbErr::Custom(format!("serialize stats: {}", e)))?;
        kv::set(db, "platform:stats", value).await?;
        report.stats_seeded = true;
        info!("platform statistics seeded");
    }

    Ok(report)
}
