//! Database migrations for the CRM data service.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_01_10_000001_create_profiles;
mod m2025_01_10_000002_create_industries;
mod m2025_01_10_000003_create_companies;
mod m2025_01_10_000004_create_people;
mod m2025_01_10_000005_create_tasks;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_01_10_000001_create_profiles::Migration),
            Box::new(m2025_01_10_000002_create_industries::Migration),
            Box::new(m2025_01_10_000003_create_companies::Migration),
            Box::new(m2025_01_10_000004_create_people::Migration),
            Box::new(m2025_01_10_000005_create_tasks::Migration),
        ]
    }
}
