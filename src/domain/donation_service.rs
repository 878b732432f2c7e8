//! Donation lifecycle domain logic.
//!
//! Creation always starts a donation at `pending`; only the explicit admin
//! confirm/fail actions move the status. Confirm and fail set the status
//! unconditionally, so repeating an action is a no-op success and an admin can
//! flip a donation between confirmed and failed.
use chrono::Utc;
use rust_decimal::Decimal;

use crate::db::DbConnection;
use crate::domain::models::{Donation, DonationStatus};
use crate::error::{AppError, AppResult};
use crate::storage::sqlite::{CharityRepository, DonationRepository};
use crate::storage::traits::{CharityStorage, DonationStorage};

/// Input for creating a donation. `user` is only populated when the caller
/// presented a valid session; guests donate anonymously.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_name: String,
    pub donor_email: String,
    pub amount: Decimal,
    pub message: String,
    pub charity: String,
    pub user: Option<String>,
}

/// Partial update of a donation's mutable fields. `None` leaves a field
/// untouched; a full PUT sets every field.
#[derive(Debug, Clone, Default)]
pub struct DonationUpdate {
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub amount: Option<Decimal>,
    pub message: Option<String>,
    pub charity: Option<String>,
}

#[derive(Clone)]
pub struct DonationService {
    donations: DonationRepository,
    charities: CharityRepository,
}

impl DonationService {
    pub fn new(connection: DbConnection) -> Self {
        Self {
            donations: DonationRepository::new(connection.clone()),
            charities: CharityRepository::new(connection),
        }
    }

    fn validate_amount(amount: Decimal) -> AppResult<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation(
                "Donation amount must be greater than zero.",
            ));
        }
        Ok(())
    }

    fn validate_donor(name: &str, email: &str) -> AppResult<()> {
        if name.trim().is_empty() {
            return Err(AppError::validation("Donor name must not be empty."));
        }
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::validation("Donor email must not be empty."));
        }
        if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
            return Err(AppError::validation("Donor email is not a valid address."));
        }
        Ok(())
    }

    async fn require_charity(&self, charity_id: &str) -> AppResult<()> {
        if self.charities.get_charity(charity_id).await?.is_none() {
            return Err(AppError::validation(format!(
                "Charity {charity_id} does not exist."
            )));
        }
        Ok(())
    }

    /// Create a donation with status forced to `pending`, whatever the caller
    /// may have supplied.
    pub async fn create_donation(&self, input: NewDonation) -> AppResult<Donation> {
        Self::validate_amount(input.amount)?;
        Self::validate_donor(&input.donor_name, &input.donor_email)?;
        self.require_charity(&input.charity).await?;

        let now = Utc::now();
        let donation = Donation {
            id: uuid::Uuid::new_v4().to_string(),
            user: input.user,
            charity: input.charity,
            donor_name: input.donor_name,
            donor_email: input.donor_email,
            amount: input.amount,
            message: input.message,
            status: DonationStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.donations.store_donation(&donation).await?;
        tracing::info!(donation_id = %donation.id, amount = %donation.amount, "created donation");
        Ok(donation)
    }

    pub async fn get_donation(&self, id: &str) -> AppResult<Donation> {
        self.donations
            .get_donation(id)
            .await?
            .ok_or(AppError::NotFound("donation"))
    }

    pub async fn list_donations(&self) -> AppResult<Vec<Donation>> {
        Ok(self.donations.list_donations().await?)
    }

    /// Apply a partial or full update to the mutable fields and re-validate.
    pub async fn update_donation(&self, id: &str, update: DonationUpdate) -> AppResult<Donation> {
        let mut donation = self.get_donation(id).await?;

        if let Some(donor_name) = update.donor_name {
            donation.donor_name = donor_name;
        }
        if let Some(donor_email) = update.donor_email {
            donation.donor_email = donor_email;
        }
        if let Some(amount) = update.amount {
            donation.amount = amount;
        }
        if let Some(message) = update.message {
            donation.message = message;
        }
        if let Some(charity) = update.charity {
            self.require_charity(&charity).await?;
            donation.charity = charity;
        }

        Self::validate_amount(donation.amount)?;
        Self::validate_donor(&donation.donor_name, &donation.donor_email)?;

        donation.updated_at = Utc::now();
        if !self.donations.update_donation(&donation).await? {
            return Err(AppError::NotFound("donation"));
        }
        Ok(donation)
    }

    pub async fn delete_donation(&self, id: &str) -> AppResult<()> {
        if !self.donations.delete_donation(id).await? {
            return Err(AppError::NotFound("donation"));
        }
        tracing::info!(donation_id = %id, "deleted donation");
        Ok(())
    }

    /// Admin action: mark the donation confirmed.
    pub async fn confirm_donation(&self, id: &str) -> AppResult<Donation> {
        self.transition(id, DonationStatus::Confirmed).await
    }

    /// Admin action: mark the donation failed.
    pub async fn fail_donation(&self, id: &str) -> AppResult<Donation> {
        self.transition(id, DonationStatus::Failed).await
    }

    async fn transition(&self, id: &str, status: DonationStatus) -> AppResult<Donation> {
        let now = Utc::now();
        if !self.donations.set_status(id, status, now).await? {
            return Err(AppError::NotFound("donation"));
        }
        tracing::info!(donation_id = %id, status = status.as_str(), "donation status updated");
        self.get_donation(id).await
    }
}
