//! Charity CRUD domain logic.
use crate::db::DbConnection;
use crate::domain::models::Charity;
use crate::error::{AppError, AppResult};
use crate::storage::sqlite::CharityRepository;
use crate::storage::traits::CharityStorage;

/// Input for creating or fully replacing a charity.
#[derive(Debug, Clone)]
pub struct CharityInput {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub logo: Option<String>,
}

#[derive(Clone)]
pub struct CharityService {
    charities: CharityRepository,
}

impl CharityService {
    pub fn new(connection: DbConnection) -> Self {
        Self {
            charities: CharityRepository::new(connection),
        }
    }

    fn validate(input: &CharityInput) -> AppResult<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("Charity name must not be empty."));
        }
        Ok(())
    }

    pub async fn create_charity(&self, input: CharityInput) -> AppResult<Charity> {
        Self::validate(&input)?;

        let charity = Charity {
            id: uuid::Uuid::new_v4().to_string(),
            name: input.name,
            description: input.description,
            website: input.website,
            logo: input.logo,
        };
        self.charities.store_charity(&charity).await?;
        tracing::info!(charity_id = %charity.id, "created charity {}", charity.name);
        Ok(charity)
    }

    pub async fn get_charity(&self, id: &str) -> AppResult<Charity> {
        self.charities
            .get_charity(id)
            .await?
            .ok_or(AppError::NotFound("charity"))
    }

    pub async fn list_charities(&self) -> AppResult<Vec<Charity>> {
        Ok(self.charities.list_charities().await?)
    }

    pub async fn update_charity(&self, id: &str, input: CharityInput) -> AppResult<Charity> {
        Self::validate(&input)?;

        let charity = Charity {
            id: id.to_string(),
            name: input.name,
            description: input.description,
            website: input.website,
            logo: input.logo,
        };
        if !self.charities.update_charity(&charity).await? {
            return Err(AppError::NotFound("charity"));
        }
        Ok(charity)
    }

    /// Delete a charity. The store cascades the delete to its donations.
    pub async fn delete_charity(&self, id: &str) -> AppResult<()> {
        if !self.charities.delete_charity(id).await? {
            return Err(AppError::NotFound("charity"));
        }
        tracing::info!(charity_id = %id, "deleted charity");
        Ok(())
    }
}
