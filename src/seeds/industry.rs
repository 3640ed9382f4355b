//! Industry seeding
//!
//! Seeds the industries table with the standard categories the company
//! forms offer. Idempotent: existing names are skipped, so it is safe to
//! run on every deploy.

use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::models::Industry;
use crate::models::industry::Column;
use crate::repositories::{CreateIndustryRequest, IndustryRepository};

const INDUSTRY_NAMES: [&str; 6] = [
    "Technology",
    "Healthcare",
    "Manufacturing",
    "Finance",
    "Energy",
    "Retail",
];

/// Seeds the industries table with the standard categories.
pub async fn seed_industries(db: &DatabaseConnection) -> Result<()> {
    let repo = IndustryRepository::new(db);

    for name in INDUSTRY_NAMES {
        let existing = Industry::find()
            .filter(Column::Name.eq(name))
            .one(db)
            .await?;

        if existing.is_some() {
            tracing::debug!(industry = name, "Industry already seeded, skipping");
            continue;
        }

        repo.create_industry(CreateIndustryRequest {
            name: name.to_string(),
            description: None,
        })
        .await?;
        tracing::info!(industry = name, "Seeded industry");
    }

    Ok(())
}
