use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::Admin;
use crate::storage::traits::AdminStorage;

/// SQLite-backed administrator account repository.
#[derive(Clone)]
pub struct AdminRepository {
    connection: DbConnection,
}

impl AdminRepository {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl AdminStorage for AdminRepository {
    async fn store_admin(&self, admin: &Admin) -> Result<()> {
        sqlx::query(
            "INSERT INTO admins (id, username, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&admin.id)
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .execute(self.connection.pool())
        .await?;
        Ok(())
    }

    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>> {
        let row = sqlx::query("SELECT * FROM admins WHERE username = ?")
            .bind(username)
            .fetch_optional(self.connection.pool())
            .await?;

        Ok(row.map(|row| Admin {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        }))
    }
}
