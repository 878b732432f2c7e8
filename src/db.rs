use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// DbConnection manages the SQLite pool and the schema.
///
/// Foreign keys are enabled on every connection; the charity -> donation
/// cascade relies on it.
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if necessary) the database at `url` and set up the schema.
    pub async fn new(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Open a uniquely named shared in-memory database. Used by tests so each
    /// test gets an isolated store.
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().simple().to_string();
        let url = format!("sqlite:file:memdb_{test_id}?mode=memory&cache=shared");
        Self::new(&url).await
    }

    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS charities (
                id          TEXT PRIMARY KEY,
                name        TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                website     TEXT,
                logo        TEXT
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS donations (
                id          TEXT PRIMARY KEY,
                user_id     TEXT,
                charity_id  TEXT NOT NULL REFERENCES charities(id) ON DELETE CASCADE,
                donor_name  TEXT NOT NULL,
                donor_email TEXT NOT NULL,
                amount      TEXT NOT NULL,
                message     TEXT NOT NULL DEFAULT '',
                status      TEXT NOT NULL DEFAULT 'pending',
                created_at  TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_donations_status ON donations(status)")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS admins (
                id            TEXT PRIMARY KEY,
                username      TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at    TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Get the underlying SQLite pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    #[tokio::test]
    async fn test_schema_created() {
        let db = DbConnection::init_test().await.expect("init test db");

        let tables: Vec<String> =
            sqlx::query("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(db.pool())
                .await
                .expect("list tables")
                .iter()
                .map(|row| row.get("name"))
                .collect();

        assert!(tables.contains(&"charities".to_string()));
        assert!(tables.contains(&"donations".to_string()));
        assert!(tables.contains(&"admins".to_string()));
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let db = DbConnection::init_test().await.expect("init test db");

        let row = sqlx::query("PRAGMA foreign_keys")
            .fetch_one(db.pool())
            .await
            .expect("pragma");
        let enabled: i64 = row.get(0);
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_databases_are_isolated() {
        let a = DbConnection::init_test().await.expect("init a");
        let b = DbConnection::init_test().await.expect("init b");

        sqlx::query("INSERT INTO charities (id, name) VALUES ('c1', 'Water Aid')")
            .execute(a.pool())
            .await
            .expect("insert");

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM charities")
            .fetch_one(b.pool())
            .await
            .expect("count")
            .get("n");
        assert_eq!(count, 0);
    }
}
