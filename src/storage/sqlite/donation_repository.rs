use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::{ConfirmedDonation, Donation, DonationStatus};
use crate::storage::traits::DonationStorage;

/// SQLite-backed donation repository.
///
/// SQLite has no decimal column type, so amounts are stored as canonical
/// decimal text and parsed back here. Parsing at the storage layer keeps the
/// domain working with `Decimal` only.
#[derive(Clone)]
pub struct DonationRepository {
    connection: DbConnection,
}

impl DonationRepository {
    pub fn new(connection: DbConnection) -> Self {
        Self { connection }
    }

    fn parse_amount(raw: &str) -> Result<Decimal> {
        Decimal::from_str(raw).with_context(|| format!("invalid stored amount: {raw}"))
    }

    fn parse_status(raw: &str) -> Result<DonationStatus> {
        DonationStatus::parse(raw).with_context(|| format!("invalid stored status: {raw}"))
    }

    fn row_to_donation(row: &sqlx::sqlite::SqliteRow) -> Result<Donation> {
        Ok(Donation {
            id: row.get("id"),
            user: row.get("user_id"),
            charity: row.get("charity_id"),
            donor_name: row.get("donor_name"),
            donor_email: row.get("donor_email"),
            amount: Self::parse_amount(row.get("amount"))?,
            message: row.get("message"),
            status: Self::parse_status(row.get("status"))?,
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
            updated_at: row.get::<DateTime<Utc>, _>("updated_at"),
        })
    }
}

#[async_trait]
impl DonationStorage for DonationRepository {
    async fn store_donation(&self, donation: &Donation) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO donations
                (id, user_id, charity_id, donor_name, donor_email, amount, message, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&donation.id)
        .bind(&donation.user)
        .bind(&donation.charity)
        .bind(&donation.donor_name)
        .bind(&donation.donor_email)
        .bind(donation.amount.to_string())
        .bind(&donation.message)
        .bind(donation.status.as_str())
        .bind(donation.created_at)
        .bind(donation.updated_at)
        .execute(self.connection.pool())
        .await?;
        Ok(())
    }

    async fn get_donation(&self, id: &str) -> Result<Option<Donation>> {
        let row = sqlx::query("SELECT * FROM donations WHERE id = ?")
            .bind(id)
            .fetch_optional(self.connection.pool())
            .await?;
        row.as_ref().map(Self::row_to_donation).transpose()
    }

    async fn list_donations(&self) -> Result<Vec<Donation>> {
        let rows = sqlx::query("SELECT * FROM donations ORDER BY created_at DESC, id")
            .fetch_all(self.connection.pool())
            .await?;
        rows.iter().map(Self::row_to_donation).collect()
    }

    async fn update_donation(&self, donation: &Donation) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE donations
            SET charity_id = ?, donor_name = ?, donor_email = ?, amount = ?, message = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&donation.charity)
        .bind(&donation.donor_name)
        .bind(&donation.donor_email)
        .bind(donation.amount.to_string())
        .bind(&donation.message)
        .bind(donation.updated_at)
        .bind(&donation.id)
        .execute(self.connection.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_donation(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM donations WHERE id = ?")
            .bind(id)
            .execute(self.connection.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_status(
        &self,
        id: &str,
        status: DonationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE donations SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(updated_at)
            .bind(id)
            .execute(self.connection.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_confirmed(&self) -> Result<Vec<ConfirmedDonation>> {
        let rows = sqlx::query(
            r#"
            SELECT d.amount, d.charity_id, c.name AS charity_name, d.created_at
            FROM donations d
            JOIN charities c ON c.id = d.charity_id
            WHERE d.status = 'confirmed'
            ORDER BY d.created_at, d.id
            "#,
        )
        .fetch_all(self.connection.pool())
        .await?;

        rows.iter()
            .map(|row| {
                Ok(ConfirmedDonation {
                    amount: Self::parse_amount(row.get("amount"))?,
                    charity_id: row.get("charity_id"),
                    charity_name: row.get("charity_name"),
                    created_at: row.get::<DateTime<Utc>, _>("created_at"),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Charity;
    use crate::storage::sqlite::CharityRepository;
    use crate::storage::traits::CharityStorage;

    async fn setup() -> (DonationRepository, CharityRepository) {
        let db = DbConnection::init_test().await.unwrap();
        let charities = CharityRepository::new(db.clone());
        charities
            .store_charity(&Charity {
                id: "c1".to_string(),
                name: "Test Charity".to_string(),
                description: String::new(),
                website: None,
                logo: None,
            })
            .await
            .unwrap();
        (DonationRepository::new(db), charities)
    }

    fn sample_donation(id: &str, amount: &str, status: DonationStatus) -> Donation {
        let now = Utc::now();
        Donation {
            id: id.to_string(),
            user: None,
            charity: "c1".to_string(),
            donor_name: "John Doe".to_string(),
            donor_email: "john@example.com".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            message: "Great cause!".to_string(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_store_and_get_donation() {
        let (repo, _charities) = setup().await;

        let donation = sample_donation("d1", "50.00", DonationStatus::Pending);
        repo.store_donation(&donation).await.unwrap();

        let fetched = repo.get_donation("d1").await.unwrap().unwrap();
        assert_eq!(fetched.amount, Decimal::from_str("50.00").unwrap());
        assert_eq!(fetched.status, DonationStatus::Pending);
        assert_eq!(fetched.donor_name, "John Doe");
    }

    #[tokio::test]
    async fn test_set_status() {
        let (repo, _charities) = setup().await;

        repo.store_donation(&sample_donation("d1", "10", DonationStatus::Pending))
            .await
            .unwrap();

        assert!(repo
            .set_status("d1", DonationStatus::Confirmed, Utc::now())
            .await
            .unwrap());
        let fetched = repo.get_donation("d1").await.unwrap().unwrap();
        assert_eq!(fetched.status, DonationStatus::Confirmed);

        assert!(!repo
            .set_status("missing", DonationStatus::Failed, Utc::now())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_list_confirmed_joins_charity_name() {
        let (repo, _charities) = setup().await;

        repo.store_donation(&sample_donation("d1", "25.50", DonationStatus::Confirmed))
            .await
            .unwrap();
        repo.store_donation(&sample_donation("d2", "10", DonationStatus::Pending))
            .await
            .unwrap();

        let confirmed = repo.list_confirmed().await.unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].charity_name, "Test Charity");
        assert_eq!(confirmed[0].amount, Decimal::from_str("25.50").unwrap());
    }

    #[tokio::test]
    async fn test_charity_delete_cascades_to_donations() {
        let (repo, charities) = setup().await;

        repo.store_donation(&sample_donation("d1", "10", DonationStatus::Pending))
            .await
            .unwrap();
        repo.store_donation(&sample_donation("d2", "20", DonationStatus::Confirmed))
            .await
            .unwrap();

        assert!(charities.delete_charity("c1").await.unwrap());
        assert!(repo.get_donation("d1").await.unwrap().is_none());
        assert!(repo.get_donation("d2").await.unwrap().is_none());
    }
}
