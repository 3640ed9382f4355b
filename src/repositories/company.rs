//! # Company Repository
//!
//! CRUD for companies. The `industry` column is a denormalized industry
//! name, compared by string equality everywhere; it is validated as
//! non-empty but never checked against the industries table.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder,
    Set,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::company::{
    ActiveModel as CompanyActiveModel, Column, Entity as Company, Model as CompanyModel,
};

const DEFAULT_LOGO_COLOR: &str = "blue";

/// Request data for creating a company
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    pub name: String,
    /// Industry name (denormalized, not a foreign key)
    pub industry: String,
    pub description: Option<String>,
    pub employees: Option<i32>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo_color: Option<String>,
}

/// Partial update for a company. Absent fields are left unchanged; nullable
/// fields accept an explicit null to clear them.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub industry: Option<String>,
    #[serde(default, with = "super::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "super::double_option")]
    pub employees: Option<Option<i32>>,
    #[serde(default, with = "super::double_option")]
    pub website: Option<Option<String>>,
    #[serde(default, with = "super::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "super::double_option")]
    pub address: Option<Option<String>>,
    pub logo_color: Option<String>,
}

/// Repository for company database operations
pub struct CompanyRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new company
    pub async fn create_company(
        &self,
        request: CreateCompanyRequest,
    ) -> Result<CompanyModel, RepositoryError> {
        validate_name(&request.name)?;
        validate_industry(&request.industry)?;

        let now = Utc::now();
        let company = CompanyActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            industry: Set(request.industry.trim().to_string()),
            description: Set(request.description),
            employees: Set(request.employees),
            website: Set(request.website),
            phone: Set(request.phone),
            address: Set(request.address),
            logo_color: Set(request
                .logo_color
                .unwrap_or_else(|| DEFAULT_LOGO_COLOR.to_string())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        company
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Get a company by ID
    pub async fn get_company_by_id(
        &self,
        company_id: Uuid,
    ) -> Result<Option<CompanyModel>, RepositoryError> {
        Company::find_by_id(company_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// List all companies ordered by name
    pub async fn list_companies(&self) -> Result<Vec<CompanyModel>, RepositoryError> {
        Company::find()
            .order_by_asc(Column::Name)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Apply a partial update. `updated_at` is always set to now, ignoring
    /// any caller-supplied value.
    pub async fn update_company(
        &self,
        company_id: Uuid,
        request: UpdateCompanyRequest,
    ) -> Result<CompanyModel, RepositoryError> {
        if let Some(name) = &request.name {
            validate_name(name)?;
        }
        if let Some(industry) = &request.industry {
            validate_industry(industry)?;
        }

        let company = self
            .get_company_by_id(company_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Company not found".to_string()))?;

        let mut active = company.into_active_model();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(industry) = request.industry {
            active.industry = Set(industry.trim().to_string());
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        if let Some(employees) = request.employees {
            active.employees = Set(employees);
        }
        if let Some(website) = request.website {
            active.website = Set(website);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = request.address {
            active.address = Set(address);
        }
        if let Some(logo_color) = request.logo_color {
            active.logo_color = Set(logo_color);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Delete a company. Dependent people and tasks keep running with their
    /// reference cleared by the store.
    pub async fn delete_company(&self, company_id: Uuid) -> Result<(), RepositoryError> {
        let company = self
            .get_company_by_id(company_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Company not found".to_string()))?;

        company
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), RepositoryError> {
    if name.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            "Company name cannot be empty",
        ));
    }
    if name.len() > 255 {
        return Err(RepositoryError::validation_error(
            "Company name cannot exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_industry(industry: &str) -> Result<(), RepositoryError> {
    if industry.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            "Industry cannot be empty",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use super::*;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    fn create_request(name: &str, industry: &str) -> CreateCompanyRequest {
        CreateCompanyRequest {
            name: name.to_string(),
            industry: industry.to_string(),
            description: None,
            employees: None,
            website: None,
            phone: None,
            address: None,
            logo_color: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_company() {
        let db = setup_test_db().await;
        let repo = CompanyRepository::new(&db);

        let created = repo
            .create_company(create_request("Acme", "Technology"))
            .await
            .unwrap();
        assert_eq!(created.name, "Acme");
        assert_eq!(created.industry, "Technology");
        assert_eq!(created.logo_color, "blue");

        let fetched = repo.get_company_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_company_validation() {
        let db = setup_test_db().await;
        let repo = CompanyRepository::new(&db);

        let result = repo.create_company(create_request("  ", "Technology")).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));

        let result = repo.create_company(create_request("Acme", "")).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_companies_ordered_by_name() {
        let db = setup_test_db().await;
        let repo = CompanyRepository::new(&db);

        repo.create_company(create_request("Gamma", "Energy"))
            .await
            .unwrap();
        repo.create_company(create_request("Acme", "Technology"))
            .await
            .unwrap();

        let names: Vec<_> = repo
            .list_companies()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Acme", "Gamma"]);
    }

    #[tokio::test]
    async fn test_partial_update_refreshes_timestamp() {
        let db = setup_test_db().await;
        let repo = CompanyRepository::new(&db);

        let created = repo
            .create_company(create_request("Acme", "Technology"))
            .await
            .unwrap();

        let updated = repo
            .update_company(
                created.id,
                UpdateCompanyRequest {
                    description: Some(Some("widgets".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Acme");
        assert_eq!(updated.description.as_deref(), Some("widgets"));
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_can_clear_nullable_field() {
        let db = setup_test_db().await;
        let repo = CompanyRepository::new(&db);

        let mut request = create_request("Acme", "Technology");
        request.website = Some("https://acme.test".to_string());
        let created = repo.create_company(request).await.unwrap();

        let updated = repo
            .update_company(
                created.id,
                UpdateCompanyRequest {
                    website: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.website.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_company_is_not_found() {
        let db = setup_test_db().await;
        let repo = CompanyRepository::new(&db);

        let result = repo.delete_company(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
