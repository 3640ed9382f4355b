//! # Data Models
//!
//! This module contains all the data models used throughout the CRM data
//! service: SeaORM entities plus the join views returned by list endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod company;
pub mod industry;
pub mod person;
pub mod profile;
pub mod task;

pub use company::Entity as Company;
pub use industry::Entity as Industry;
pub use person::Entity as Person;
pub use person::{EntityRef, PersonWithCompany};
pub use profile::Entity as Profile;
pub use task::Entity as Task;
pub use task::{TaskPriority, TaskStatus, TaskWithRelations};

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "crm".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
