//! # Storage Traits
//!
//! Storage abstraction traits that keep the domain layer independent of the
//! concrete store. The SQLite repositories in [`super::sqlite`] are the only
//! implementation today.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::models::{Admin, Charity, ConfirmedDonation, Donation, DonationStatus};

/// Interface for charity storage operations.
#[async_trait]
pub trait CharityStorage: Send + Sync {
    /// Store a new charity.
    async fn store_charity(&self, charity: &Charity) -> Result<()>;

    /// Retrieve a specific charity by id.
    async fn get_charity(&self, id: &str) -> Result<Option<Charity>>;

    /// List all charities ordered by name.
    async fn list_charities(&self) -> Result<Vec<Charity>>;

    /// Update an existing charity. Returns false when the id is unknown.
    async fn update_charity(&self, charity: &Charity) -> Result<bool>;

    /// Delete a charity by id, cascading to its donations.
    /// Returns false when the id is unknown.
    async fn delete_charity(&self, id: &str) -> Result<bool>;
}

/// Interface for donation storage operations.
#[async_trait]
pub trait DonationStorage: Send + Sync {
    /// Store a new donation.
    async fn store_donation(&self, donation: &Donation) -> Result<()>;

    /// Retrieve a specific donation by id.
    async fn get_donation(&self, id: &str) -> Result<Option<Donation>>;

    /// List all donations ordered by creation time descending (newest first).
    async fn list_donations(&self) -> Result<Vec<Donation>>;

    /// Update the mutable fields of an existing donation and bump
    /// `updated_at`. Returns false when the id is unknown.
    async fn update_donation(&self, donation: &Donation) -> Result<bool>;

    /// Delete a single donation. Returns false when the id is unknown.
    async fn delete_donation(&self, id: &str) -> Result<bool>;

    /// Set the status of a donation and bump `updated_at`.
    /// Returns false when the id is unknown.
    async fn set_status(
        &self,
        id: &str,
        status: DonationStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// List confirmed donations joined with their charity name, in
    /// chronological order. This is the reporting feed.
    async fn list_confirmed(&self) -> Result<Vec<ConfirmedDonation>>;
}

/// Interface for administrator account storage operations.
#[async_trait]
pub trait AdminStorage: Send + Sync {
    /// Store a new administrator account.
    async fn store_admin(&self, admin: &Admin) -> Result<()>;

    /// Look up an administrator by username.
    async fn get_admin_by_username(&self, username: &str) -> Result<Option<Admin>>;
}
