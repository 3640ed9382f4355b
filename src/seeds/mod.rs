//! Database seeding functionality
//!
//! Populates reference data when bootstrapping a fresh environment.

pub mod industry;

pub use industry::seed_industries;
