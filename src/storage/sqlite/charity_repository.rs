use anyhow::Result;
use async_trait::async_trait;
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::Charity;
use crate::storage::traits::CharityStorage;

/// SQLite-backed charity repository.
#[derive(Clone)]
pub struct CharityRepository {
    connection: DbConnection,
}

impl CharityRepository {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn row_to_charity(row: &sqlx::sqlite::SqliteRow) -> Charity {
        Charity {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            website: row.get("website"),
            logo: row.get("logo"),
        }
    }
}

#[async_trait]
impl CharityStorage for CharityRepository {
    async fn store_charity(&self, charity: &Charity) -> Result<()> {
        sqlx::query(
            "INSERT INTO charities (id, name, description, website, logo) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&charity.id)
        .bind(&charity.name)
        .bind(&charity.description)
        .bind(&charity.website)
        .bind(&charity.logo)
        .execute(self.connection.pool())
        .await?;
        Ok(())
    }

    async fn get_charity(&self, id: &str) -> Result<Option<Charity>> {
        let row = sqlx::query("SELECT * FROM charities WHERE id = ?")
            .bind(id)
            .fetch_optional(self.connection.pool())
            .await?;
        Ok(row.as_ref().map(Self::row_to_charity))
    }

    async fn list_charities(&self) -> Result<Vec<Charity>> {
        let rows = sqlx::query("SELECT * FROM charities ORDER BY name")
            .fetch_all(self.connection.pool())
            .await?;
        Ok(rows.iter().map(Self::row_to_charity).collect())
    }

    async fn update_charity(&self, charity: &Charity) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE charities SET name = ?, description = ?, website = ?, logo = ? WHERE id = ?",
        )
        .bind(&charity.name)
        .bind(&charity.description)
        .bind(&charity.website)
        .bind(&charity.logo)
        .bind(&charity.id)
        .execute(self.connection.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_charity(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM charities WHERE id = ?")
            .bind(id)
            .execute(self.connection.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_charity(id: &str, name: &str) -> Charity {
        Charity {
            id: id.to_string(),
            name: name.to_string(),
            description: "A charity for testing.".to_string(),
            website: Some("https://example.org".to_string()),
            logo: None,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_charity() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CharityRepository::new(db);

        let charity = sample_charity("c1", "Water Aid");
        repo.store_charity(&charity).await.unwrap();

        let fetched = repo.get_charity("c1").await.unwrap();
        assert_eq!(fetched, Some(charity));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CharityRepository::new(db);

        repo.store_charity(&sample_charity("c1", "Shelter"))
            .await
            .unwrap();
        repo.store_charity(&sample_charity("c2", "Animal Rescue"))
            .await
            .unwrap();

        let names: Vec<String> = repo
            .list_charities()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Animal Rescue", "Shelter"]);
    }

    #[tokio::test]
    async fn test_update_unknown_charity_returns_false() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CharityRepository::new(db);

        let updated = repo
            .update_charity(&sample_charity("missing", "Nobody"))
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_delete_charity() {
        let db = DbConnection::init_test().await.unwrap();
        let repo = CharityRepository::new(db);

        repo.store_charity(&sample_charity("c1", "Water Aid"))
            .await
            .unwrap();
        assert!(repo.delete_charity("c1").await.unwrap());
        assert!(repo.get_charity("c1").await.unwrap().is_none());
        assert!(!repo.delete_charity("c1").await.unwrap());
    }
}
