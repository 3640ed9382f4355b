//! # Industry Repository
//!
//! CRUD for industries. Companies reference industries by name, not id, so
//! renaming or deleting an industry never cascades; dependent companies
//! keep the old name string.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder,
    Set,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::industry::{
    ActiveModel as IndustryActiveModel, Column, Entity as Industry, Model as IndustryModel,
};

/// Request data for creating an industry
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateIndustryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// Partial update for an industry
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateIndustryRequest {
    pub name: Option<String>,
    #[serde(default, with = "super::double_option")]
    pub description: Option<Option<String>>,
}

/// Repository for industry database operations
pub struct IndustryRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> IndustryRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_industry(
        &self,
        request: CreateIndustryRequest,
    ) -> Result<IndustryModel, RepositoryError> {
        validate_name(&request.name)?;

        let now = Utc::now();
        let industry = IndustryActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            description: Set(request.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        industry
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get_industry_by_id(
        &self,
        industry_id: Uuid,
    ) -> Result<Option<IndustryModel>, RepositoryError> {
        Industry::find_by_id(industry_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// List all industries ordered by name
    pub async fn list_industries(&self) -> Result<Vec<IndustryModel>, RepositoryError> {
        Industry::find()
            .order_by_asc(Column::Name)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Rename or re-describe an industry. Companies carrying the old name
    /// are left untouched.
    pub async fn update_industry(
        &self,
        industry_id: Uuid,
        request: UpdateIndustryRequest,
    ) -> Result<IndustryModel, RepositoryError> {
        if let Some(name) = &request.name {
            validate_name(name)?;
        }

        let industry = self
            .get_industry_by_id(industry_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Industry not found".to_string()))?;

        let mut active = industry.into_active_model();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(description) = request.description {
            active.description = Set(description);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn delete_industry(&self, industry_id: Uuid) -> Result<(), RepositoryError> {
        let industry = self
            .get_industry_by_id(industry_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound("Industry not found".to_string()))?;

        industry
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}

fn validate_name(name: &str) -> Result<(), RepositoryError> {
    if name.trim().is_empty() {
        return Err(RepositoryError::validation_error(
            "Industry name cannot be empty",
        ));
    }
    if name.len() > 255 {
        return Err(RepositoryError::validation_error(
            "Industry name cannot exceed 255 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::Database;

    use super::*;
    use crate::repositories::company::{CompanyRepository, CreateCompanyRequest};

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_empty_name_rejected() {
        let db = setup_test_db().await;
        let repo = IndustryRepository::new(&db);

        let result = repo
            .create_industry(CreateIndustryRequest {
                name: "   ".to_string(),
                description: None,
            })
            .await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_ordered_by_name() {
        let db = setup_test_db().await;
        let repo = IndustryRepository::new(&db);

        for name in ["Retail", "Energy", "Finance"] {
            repo.create_industry(CreateIndustryRequest {
                name: name.to_string(),
                description: None,
            })
            .await
            .unwrap();
        }

        let names: Vec<_> = repo
            .list_industries()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Energy", "Finance", "Retail"]);
    }

    #[tokio::test]
    async fn test_rename_does_not_touch_companies() {
        let db = setup_test_db().await;
        let industries = IndustryRepository::new(&db);
        let companies = CompanyRepository::new(&db);

        let industry = industries
            .create_industry(CreateIndustryRequest {
                name: "Technology".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let company = companies
            .create_company(CreateCompanyRequest {
                name: "Acme".to_string(),
                industry: "Technology".to_string(),
                description: None,
                employees: None,
                website: None,
                phone: None,
                address: None,
                logo_color: None,
            })
            .await
            .unwrap();

        industries
            .update_industry(
                industry.id,
                UpdateIndustryRequest {
                    name: Some("Tech".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        // The company keeps the now-orphaned name string.
        let company = companies.get_company_by_id(company.id).await.unwrap().unwrap();
        assert_eq!(company.industry, "Technology");
    }

    #[tokio::test]
    async fn test_delete_industry() {
        let db = setup_test_db().await;
        let repo = IndustryRepository::new(&db);

        let industry = repo
            .create_industry(CreateIndustryRequest {
                name: "Finance".to_string(),
                description: None,
            })
            .await
            .unwrap();

        repo.delete_industry(industry.id).await.unwrap();
        assert!(repo.get_industry_by_id(industry.id).await.unwrap().is_none());
    }
}
