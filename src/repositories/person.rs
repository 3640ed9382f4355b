//! # Person Repository
//!
//! CRUD for people. List and get return the person joined with its company
//! as a [`PersonWithCompany`], since the filter layer and the UI both work
//! with the company *name* rather than its id.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, QueryOrder,
    Set,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::RepositoryError;
use crate::models::person::{
    ActiveModel as PersonActiveModel, Column, Entity as Person, Model as PersonModel,
};
use crate::models::{Company, EntityRef, PersonWithCompany};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

const DEFAULT_AVATAR_COLOR: &str = "blue";

/// Request data for creating a person
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePersonRequest {
    pub name: String,
    pub position: Option<String>,
    pub company_id: Option<Uuid>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub avatar_color: Option<String>,
}

/// Partial update for a person. Absent fields are left unchanged; nullable
/// fields accept an explicit null to clear them.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePersonRequest {
    pub name: Option<String>,
    #[serde(default, with = "super::double_option")]
    pub position: Option<Option<String>>,
    #[serde(default, with = "super::double_option")]
    pub company_id: Option<Option<Uuid>>,
    #[serde(default, with = "super::double_option")]
    pub email: Option<Option<String>>,
    #[serde(default, with = "super::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, with = "super::double_option")]
    pub department: Option<Option<String>>,
    #[serde(default, with = "super::double_option")]
    pub location: Option<Option<String>>,
    pub avatar_color: Option<String>,
}

/// Repository for person database operations
pub struct PersonRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PersonRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create_person(
        &self,
        request: CreatePersonRequest,
    ) -> Result<PersonModel, RepositoryError> {
        validate_name(&request.name)?;
        if let Some(email) = &request.email {
            validate_email(email)?;
        }

        let now = Utc::now();
        let person = PersonActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name.trim().to_string()),
            position: Set(request.position),
            company_id: Set(request.company_id),
            email: Set(request.email),
            phone: Set(request.phone),
            department: Set(request.department),
            location: Set(request.location),
            avatar_color: Set(request
                .avatar_color
                .unwrap_or_else(|| DEFAULT_AVATAR_COLOR.to_string())),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        person
            .insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get_person_by_id(
        &self,
        person_id: Uuid,
    ) -> Result<Option<PersonWithCompany>, RepositoryError> {
        let row = Person::find_by_id(person_id)
            .find_also_related(Company)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(row.map(join_company))
    }

    /// List all people ordered by name, joined with their companies.
    pub async fn list_people(&self) -> Result<Vec<PersonWithCompany>, RepositoryError> {
        let rows = Person::find()
            .find_also_related(Company)
            .order_by_asc(Column::Name)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(rows.into_iter().map(join_company).collect())
    }

    /// Apply a partial update. `updated_at` is always set to now.
    pub async fn update_person(
        &self,
        person_id: Uuid,
        request: UpdatePersonRequest,
    ) -> Result<PersonModel, RepositoryError> {
        if let Some(name) = &request.name {
            validate_name(name)?;
        }
        if let Some(Some(email)) = &request.email {
            validate_email(email)?;
        }

        let person = Person::find_by_id(person_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Person not found".to_string()))?;

        let mut active = person.into_active_model();
        if let Some(name) = request.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(position) = request.position {
            active.position = Set(position);
        }
        if let Some(company_id) = request.company_id {
            active.company_id = Set(company_id);
        }
        if let Some(email) = request.email {
            active.email = Set(email);
        }
        if let Some(phone) = request.phone {
            active.phone = Set(phone);
        }
        if let Some(department) = request.department {
            active.department = Set(department);
        }
        if let Some(location) = request.location {
            active.location = Set(location);
        }
        if let Some(avatar_color) = request.avatar_color {
            active.avatar_color = Set(avatar_color);
        }
        active.updated_at = Set(Utc::now().into());

        active
            .update(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn delete_person(&self, person_id: Uuid) -> Result<(), RepositoryError> {
        let person = Person::find_by_id(person_id)
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::NotFound("Person not found".to_string()))?;

        person
            .delete(self.db)
            .await
            .map_err(RepositoryError::database_error)?;

        Ok(())
    }
}

fn join_company(
    (person, company): (PersonModel, Option<crate::models::company::Model>),
) -> PersonWithCompany {
    PersonWithCompany {
        person,
        company: company.map(|company| EntityRef {
            id: company.id,
            name: company.name,
        }),
    }
}

fn validate_name(name: &str) -> Result<(), RepositoryError> {
    if name.trim().is_empty() {
        return Err(RepositoryError::validation_error("Name cannot be empty"));
    }
    if name.len() > 255 {
        return Err(RepositoryError::validation_error(
            "Name cannot exceed 255 characters",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), RepositoryError> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(RepositoryError::validation_error("Invalid email address"));
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

    fn create_request(name: &str) -> CreatePersonRequest {
        CreatePersonRequest {
            name: name.to_string(),
            position: None,
            company_id: None,
            email: None,
            phone: None,
            department: None,
            location: None,
            avatar_color: None,
        }
    }

    async fn create_company(db: &DatabaseConnection, name: &str) -> Uuid {
        CompanyRepository::new(db)
            .create_company(CreateCompanyRequest {
                name: name.to_string(),
                industry: "Technology".to_string(),
                description: None,
                employees: None,
                website: None,
                phone: None,
                address: None,
                logo_color: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_list_people_joins_company_name() {
        let db = setup_test_db().await;
        let company_id = create_company(&db, "Acme").await;

        let repo = PersonRepository::new(&db);
        let mut request = create_request("John Doe");
        request.company_id = Some(company_id);
        repo.create_person(request).await.unwrap();
        repo.create_person(create_request("Ada")).await.unwrap();

        let people = repo.list_people().await.unwrap();
        // Ordered by name.
        assert_eq!(people[0].person.name, "Ada");
        assert_eq!(people[0].company_name(), None);
        assert_eq!(people[1].person.name, "John Doe");
        assert_eq!(people[1].company_name(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected_before_store() {
        let db = setup_test_db().await;
        let repo = PersonRepository::new(&db);

        let mut request = create_request("John");
        request.email = Some("not-an-email".to_string());
        let result = repo.create_person(request).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_can_detach_company() {
        let db = setup_test_db().await;
        let company_id = create_company(&db, "Acme").await;

        let repo = PersonRepository::new(&db);
        let mut request = create_request("John");
        request.company_id = Some(company_id);
        let person = repo.create_person(request).await.unwrap();

        repo.update_person(
            person.id,
            UpdatePersonRequest {
                company_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let fetched = repo.get_person_by_id(person.id).await.unwrap().unwrap();
        assert!(fetched.company.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_person_is_not_found() {
        let db = setup_test_db().await;
        let repo = PersonRepository::new(&db);

        let result = repo
            .update_person(Uuid::new_v4(), UpdatePersonRequest::default())
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }
}
