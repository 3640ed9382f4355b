//! # Repositories
//!
//! Database access for each entity. Every repository borrows the shared
//! connection pool, validates input before touching the store, returns rows
//! in the collection's natural order (name ascending, creation time
//! descending for tasks), and refreshes `updated_at` on every mutation.

pub mod company;
pub mod industry;
pub mod person;
pub mod profile;
pub mod task;

pub use company::{CompanyRepository, CreateCompanyRequest, UpdateCompanyRequest};
pub use industry::{CreateIndustryRequest, IndustryRepository, UpdateIndustryRequest};
pub use person::{CreatePersonRequest, PersonRepository, UpdatePersonRequest};
pub use profile::ProfileRepository;
pub use task::{CreateTaskRequest, TaskRepository, UpdateTaskRequest};

/// Deserializes a doubly-optional field so partial updates can distinguish
/// "leave unchanged" (absent) from "clear" (explicit null).
pub(crate) mod double_option {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}
